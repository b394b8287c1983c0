// ==========================================
// Ready 文件转换管道 - 运行汇总
// ==========================================
// 每轮运行生成 run_summary.json 写入输出目录
// ==========================================

use crate::engine::converter::ConversionReport;
use crate::engine::error::{ConvertError, ConvertResult};
use crate::engine::part_grades::RebuildSummary;
use crate::importer::adapter::AdapterReport;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// 汇总文件名
pub const RUN_SUMMARY_FILE: &str = "run_summary.json";

/// 单轮运行汇总
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub test_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rebuild: Option<RebuildSummary>,
    pub conversions: Vec<ConversionReport>,
    pub adapters: Vec<AdapterReport>,
}

impl RunSummary {
    pub fn start(test_id: Option<u32>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            test_id,
            rebuild: None,
            conversions: Vec::new(),
            adapters: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// 写出 (输出目录不存在时创建)
    pub fn write_to(&self, output_dir: &Path) -> ConvertResult<PathBuf> {
        let path = output_dir.join(RUN_SUMMARY_FILE);
        let write_err = |message: String| ConvertError::FileWrite {
            path: path.display().to_string(),
            message,
        };

        fs::create_dir_all(output_dir).map_err(|e| write_err(e.to_string()))?;
        let json = serde_json::to_string_pretty(self).map_err(|e| write_err(e.to_string()))?;
        fs::write(&path, json).map_err(|e| write_err(e.to_string()))?;
        Ok(path)
    }
}
