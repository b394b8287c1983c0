// ==========================================
// Ready 文件转换管道 - 转换驱动
// ==========================================
// 流程: 路由 → 读取 → (表头改写) → 逐行转换 → 缓冲 → 原子落盘
// 约束:
// - 单线程顺序执行,一个文件处理完毕才落盘
// - 缓冲区落盘后清空,可在同一轮中复用
// - 转换中途失败不产生部分输出文件
// ==========================================

use crate::config::RunConfig;
use crate::domain::record::ReadyRecord;
use crate::domain::types::VariantKind;
use crate::engine::error::{ConvertError, ConvertResult};
use crate::engine::part_grades::PartGradeCache;
use crate::engine::router::{classify, output_file_name};
use crate::engine::variant::{ConversionContext, Variant};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

/// 行计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowCounts {
    pub rows_read: usize,
    pub rows_written: usize,
    pub rows_dropped: usize,
}

/// 单个文件的转换结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub file_name: String,
    pub variant: VariantKind,
    #[serde(flatten)]
    pub counts: RowCounts,
    pub output_path: PathBuf,
}

// ==========================================
// ReadyFileConverter - 转换驱动
// ==========================================
pub struct ReadyFileConverter<'a> {
    config: &'a RunConfig,
    part_grades: &'a PartGradeCache,
    buffer: Vec<String>,
}

impl<'a> ReadyFileConverter<'a> {
    /// 创建转换驱动
    ///
    /// # 参数
    /// - config: 本轮运行配置
    /// - part_grades: 已加载的零件材质缓存 (只读)
    pub fn new(config: &'a RunConfig, part_grades: &'a PartGradeCache) -> Self {
        Self {
            config,
            part_grades,
            buffer: Vec::new(),
        }
    }

    fn context(&self) -> ConversionContext<'a> {
        ConversionContext {
            test_id: self.config.test_id,
            regenerate_description: self.config.regenerate_description,
            dialect: self.config.stock_dialect,
            part_grades: self.part_grades,
        }
    }

    /// 当前缓冲的输出行数
    pub fn buffered_lines(&self) -> usize {
        self.buffer.len()
    }

    /// 转换输入目录中的单个文件
    #[instrument(skip(self))]
    pub fn process(&mut self, file_name: &str) -> ConvertResult<ConversionReport> {
        let kind = classify(file_name)?;
        info!(variant = %kind, "文件路由完成");

        let input_path = self.config.input_dir.join(file_name);
        let content = fs::read_to_string(&input_path).map_err(|e| ConvertError::FileRead {
            path: input_path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut lines = content.lines();
        let header = if kind.has_header() {
            lines.next().map(ReadyRecord::parse_line)
        } else {
            None
        };
        let rows: Vec<ReadyRecord> = lines.map(ReadyRecord::parse_line).collect();

        let counts = self.convert_rows(kind, header, rows)?;
        let output_path = self.flush(&output_file_name(file_name))?;

        info!(
            rows_read = counts.rows_read,
            rows_written = counts.rows_written,
            rows_dropped = counts.rows_dropped,
            output = %output_path.display(),
            "文件转换完成"
        );

        Ok(ConversionReport {
            file_name: file_name.to_string(),
            variant: kind,
            counts,
            output_path,
        })
    }

    /// 转换内存中的行 (表格适配器入口)
    ///
    /// 输出追加到缓冲区,需调用 `flush` 落盘。
    /// 任一行失败时丢弃本次调用产生的全部缓冲行。
    pub fn convert_rows(
        &mut self,
        kind: VariantKind,
        header: Option<ReadyRecord>,
        rows: Vec<ReadyRecord>,
    ) -> ConvertResult<RowCounts> {
        let variant = Variant::for_kind(kind, self.context());
        let start = self.buffer.len();
        let mut counts = RowCounts::default();

        // 行号从 1 开始,表头占第 1 行
        let mut row_number = 0;
        if let Some(header) = header {
            row_number += 1;
            let header = variant.convert_header(header);
            self.buffer.push(header.to_line());
        }

        for row in rows {
            row_number += 1;
            counts.rows_read += 1;

            match variant.convert_row(row, row_number) {
                Ok(Some(converted)) => {
                    self.buffer.push(converted.to_line());
                    counts.rows_written += 1;
                }
                Ok(None) => counts.rows_dropped += 1,
                Err(e) => {
                    warn!(row = row_number, error = %e, "行转换失败,放弃本文件输出");
                    self.buffer.truncate(start);
                    return Err(e);
                }
            }
        }

        debug!(variant = %kind, ?counts, "行转换完成");
        Ok(counts)
    }

    /// 缓冲区原子写入输出目录并清空
    pub fn flush(&mut self, output_name: &str) -> ConvertResult<PathBuf> {
        let output_dir = self.config.output_dir.clone();
        let target = output_dir.join(output_name);
        write_atomic(&output_dir, &target, &self.buffer)?;
        self.buffer.clear();
        Ok(target)
    }

    /// 转换输入目录中的全部文件 (按文件名排序)
    ///
    /// 任一文件名无法路由即终止整轮运行
    pub fn process_dir(&mut self) -> ConvertResult<Vec<ConversionReport>> {
        let input_dir = self.config.input_dir.clone();
        let read_err = |e: std::io::Error| ConvertError::FileRead {
            path: input_dir.display().to_string(),
            message: e.to_string(),
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(&input_dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            if entry.file_type().map_err(read_err)?.is_file() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        names.sort();

        info!(files = names.len(), input = %input_dir.display(), "开始批量转换");
        names.iter().map(|name| self.process(name)).collect()
    }
}

/// 临时文件写入后整体替换目标文件
fn write_atomic(dir: &Path, target: &Path, lines: &[String]) -> ConvertResult<()> {
    let write_err = |message: String| ConvertError::FileWrite {
        path: target.display().to_string(),
        message,
    };

    fs::create_dir_all(dir).map_err(|e| write_err(e.to_string()))?;
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;
    for line in lines {
        temp.write_all(line.as_bytes())
            .map_err(|e| write_err(e.to_string()))?;
    }
    temp.flush().map_err(|e| write_err(e.to_string()))?;
    temp.persist(target).map_err(|e| write_err(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(root: &TempDir) -> RunConfig {
        RunConfig {
            input_dir: root.path().join("input"),
            output_dir: root.path().join("output"),
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_convert_rows_counts_and_buffer() {
        let root = TempDir::new().unwrap();
        let config = test_config(&root);
        let cache = PartGradeCache::new();
        let mut converter = ReadyFileConverter::new(&config, &cache);

        let rows = vec![
            ReadyRecord::from(vec!["P1", "50W-0108", "144", "IN2"]),
            ReadyRecord::from(vec!["P1", "50W-0108", "12", "LIN"]),
        ];
        let counts = converter
            .convert_rows(VariantKind::ConeBom, None, rows)
            .unwrap();

        assert_eq!(
            counts,
            RowCounts {
                rows_read: 2,
                rows_written: 1,
                rows_dropped: 1
            }
        );
        assert_eq!(converter.buffered_lines(), 1);
    }

    #[test]
    fn test_failed_rows_leave_buffer_untouched() {
        let root = TempDir::new().unwrap();
        let config = test_config(&root);
        let cache = PartGradeCache::new();
        let mut converter = ReadyFileConverter::new(&config, &cache);

        converter
            .convert_rows(
                VariantKind::ConeBom,
                None,
                vec![ReadyRecord::from(vec!["P1", "50W-0108", "1", "FT2"])],
            )
            .unwrap();

        let result = converter.convert_rows(
            VariantKind::ConeBom,
            None,
            vec![
                ReadyRecord::from(vec!["P2", "50W-0108", "1", "FT2"]),
                ReadyRecord::from(vec!["P3", "50W-0108", "bad", "IN2"]),
            ],
        );
        assert!(result.is_err());
        assert_eq!(converter.buffered_lines(), 1);
    }

    #[test]
    fn test_flush_writes_and_clears() {
        let root = TempDir::new().unwrap();
        let config = test_config(&root);
        let cache = PartGradeCache::new();
        let mut converter = ReadyFileConverter::new(&config, &cache);

        converter
            .convert_rows(
                VariantKind::ConeBom,
                None,
                vec![ReadyRecord::from(vec!["P1", "50W-0108", "144", "IN2"])],
            )
            .unwrap();
        let path = converter.flush("out_Conv.ready").unwrap();

        assert_eq!(converter.buffered_lines(), 0);
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "P1\t50W-T1.5000\t1.0\tFT2\n"
        );
    }
}
