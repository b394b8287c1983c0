// ==========================================
// Ready 文件转换管道 - 零件材质缓存
// ==========================================
// 键: JOB-MARK (大写)
// 值: (规范, 等级, 冲击测试)
// 来源:
// 1) 持久化 CSV (Mark,Specification,Grade,ImpactTest)
// 2) 三层外部遍历重建 (结构 → 发运 → BOM 行)
// 约束: 查询从不报错,缺失返回全空三元组
//       转换期间只读,仅重建时写入
// ==========================================

use crate::domain::types::GradeTriple;
use crate::engine::error::{ConvertError, ConvertResult};
use crate::repository::bom_source::{BomLine, BomSource};
use crate::repository::error::RepositoryResult;
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

/// 缓存文件表头
pub const CACHE_HEADER: [&str; 4] = ["Mark", "Specification", "Grade", "ImpactTest"];

/// 参与缓存的商品类别
const COMMODITY_ALLOW_LIST: &[&str] = &["PL", "MISC", "SHEET"];

/// 整体折叠为 TYPE4 的规范字面量
const TYPE4_SPEC_LITERAL: &str = "A606 Type 4";

/// 耐候冲击等级前缀
const WEATHERING_IMPACT_PREFIX: &str = "HPS";

/// 重建统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RebuildSummary {
    pub structures: usize,
    pub shipments: usize,
    pub failed_shipments: usize,
    pub entries_written: usize,
}

/// 零件材质缓存
#[derive(Debug, Clone, Default)]
pub struct PartGradeCache {
    entries: BTreeMap<String, GradeTriple>,
}

impl PartGradeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 规范化缓存键
    pub fn normalize_key(key: &str) -> String {
        key.trim().to_uppercase()
    }

    /// 查询三元组,缺失返回全空
    pub fn get_or_default(&self, key: &str) -> GradeTriple {
        self.entries
            .get(&Self::normalize_key(key))
            .cloned()
            .unwrap_or_default()
    }

    pub fn insert(&mut self, key: &str, triple: GradeTriple) {
        self.entries.insert(Self::normalize_key(key), triple);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ==========================================
    // CSV 持久化
    // ==========================================

    /// 从 CSV 加载缓存 (首行为表头)
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_csv<P: AsRef<Path>>(path: P) -> ConvertResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ConvertError::FileRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let mut cache = Self::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let mark = record.get(0).unwrap_or("").trim();
            if mark.is_empty() {
                return Err(ConvertError::CacheFormat {
                    row: idx + 2,
                    message: "Mark 为空".to_string(),
                });
            }

            cache.insert(
                mark,
                GradeTriple::new(record.get(1), record.get(2), record.get(3)),
            );
        }

        info!(entries = cache.len(), "零件材质缓存加载完成");
        Ok(cache)
    }

    /// 写回 CSV (临时文件 + 原子替换)
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> ConvertResult<()> {
        let path = path.as_ref();
        let write_err = |message: String| ConvertError::FileWrite {
            path: path.display().to_string(),
            message,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;

        {
            let mut writer = WriterBuilder::new().from_writer(temp.as_file_mut());
            writer.write_record(CACHE_HEADER)?;
            for (mark, triple) in &self.entries {
                let [spec, grade, test] = triple.to_fields();
                writer.write_record([mark.as_str(), spec.as_str(), grade.as_str(), test.as_str()])?;
            }
            writer.flush().map_err(|e| write_err(e.to_string()))?;
        }

        temp.persist(path).map_err(|e| write_err(e.to_string()))?;
        info!(entries = self.len(), "零件材质缓存已写回");
        Ok(())
    }

    // ==========================================
    // 外部遍历重建
    // ==========================================

    /// 三层遍历重建缓存
    ///
    /// # 参数
    /// - source: BOM 数据源
    /// - project_floor: 项目号下限 (项目号 < 下限的结构跳过)
    ///
    /// # 容错
    /// - 单个发运批次读取失败: 记录 job / 发运号 / 结构 ID 后跳过
    /// - 结构 / 发运列表读取失败: 上抛
    #[instrument(skip(self, source))]
    pub fn rebuild(
        &mut self,
        source: &dyn BomSource,
        project_floor: u64,
    ) -> RepositoryResult<RebuildSummary> {
        let mut summary = RebuildSummary::default();

        let structures: Vec<_> = source
            .structures()?
            .into_iter()
            .filter(|s| match s.project.trim().parse::<u64>() {
                Ok(project) => project >= project_floor,
                Err(_) => {
                    warn!(project = %s.project, structure = %s.structure, "项目号非数值,跳过");
                    false
                }
            })
            .collect();

        info!(structures = structures.len(), "开始读取工程结构 BOM");

        for structure in &structures {
            summary.structures += 1;
            let job = structure.structure.as_str();
            let shipments = source.shipments(structure.struct_id)?;
            debug!(job = %job, shipments = shipments.len(), "读取发运批次");

            for ship_no in shipments {
                summary.shipments += 1;
                match source.bom_lines(job, ship_no) {
                    Ok(lines) => {
                        for line in lines {
                            if let Some((key, triple)) = part_grade_entry(job, &line) {
                                self.entries.insert(key, triple);
                                summary.entries_written += 1;
                            }
                        }
                    }
                    Err(e) => {
                        summary.failed_shipments += 1;
                        warn!(
                            job = %job,
                            ship_no = ship_no,
                            struct_id = structure.struct_id,
                            error = %e,
                            "读取 BOM 数据失败,跳过该发运批次"
                        );
                    }
                }
            }
        }

        info!(
            structures = summary.structures,
            shipments = summary.shipments,
            failed = summary.failed_shipments,
            entries = self.len(),
            "零件材质缓存重建完成"
        );
        Ok(summary)
    }
}

/// 单行 BOM → 缓存条目 (商品类别不在白名单时返回 None)
fn part_grade_entry(job: &str, line: &BomLine) -> Option<(String, GradeTriple)> {
    if !COMMODITY_ALLOW_LIST.contains(&line.commodity.trim()) {
        return None;
    }

    let key = PartGradeCache::normalize_key(&format!("{}-{}", job, line.piecemark));
    let spec = line.specification.as_deref().map(str::trim);

    if spec == Some(TYPE4_SPEC_LITERAL) {
        return Some((key, GradeTriple::new(Some("A606"), Some("TYPE4"), None)));
    }

    let grade = line.grade.as_deref().map(str::trim).unwrap_or("");
    let test = line
        .impact_test
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            if grade.starts_with(WEATHERING_IMPACT_PREFIX) {
                format!("{}3", t)
            } else {
                format!("{}2", t)
            }
        });

    Some((key, GradeTriple::new(spec, Some(grade), test.as_deref())))
}
