// ==========================================
// Ready 文件转换管道 - 运行配置
// ==========================================
// 来源: JSON 配置文件 (可选) + 命令行覆写
// 作用域: 单轮运行
// ==========================================

use crate::domain::types::StockDialect;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 项目号位数 (下限不足位数时右侧补零)
pub const PROJECT_NUMBER_DIGITS: usize = 7;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },
}

/// 运行配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// 测试编号 (编码替换目标,未配置则不替换)
    #[serde(default)]
    pub test_id: Option<u32>,

    /// 是否重新生成 Cone MAT 描述
    #[serde(default = "default_true")]
    pub regenerate_description: bool,

    /// 缓存重建的项目号下限
    #[serde(default)]
    pub project_floor: u64,

    /// 库存编码方言
    #[serde(default)]
    pub stock_dialect: StockDialect,

    /// 输入目录
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// 输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// 零件材质缓存文件
    #[serde(default = "default_part_grades_path")]
    pub part_grades_path: PathBuf,
}

fn default_true() -> bool {
    true
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("conversion").join("input")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("conversion").join("output")
}

fn default_part_grades_path() -> PathBuf {
    PathBuf::from("part_grades.csv")
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            test_id: None,
            regenerate_description: true,
            project_floor: 0,
            stock_dialect: StockDialect::default(),
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            part_grades_path: default_part_grades_path(),
        }
    }
}

impl RunConfig {
    /// 从 JSON 文件加载,缺失的键取默认值
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::from_json(&raw).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// 从 JSON 字符串解析
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// 规范化后的项目号下限
    ///
    /// 非零下限右侧补零到 7 位: 123 → 1230000
    pub fn normalized_project_floor(&self) -> u64 {
        normalize_project_floor(self.project_floor)
    }
}

/// 项目号下限补零
pub fn normalize_project_floor(floor: u64) -> u64 {
    if floor == 0 {
        return 0;
    }

    let digits = floor.to_string();
    if digits.len() >= PROJECT_NUMBER_DIGITS {
        return floor;
    }

    let padded = format!("{:0<width$}", digits, width = PROJECT_NUMBER_DIGITS);
    padded.parse().unwrap_or(floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.test_id, None);
        assert!(config.regenerate_description);
        assert_eq!(config.stock_dialect, StockDialect::FixedDecimal);
        assert_eq!(config.part_grades_path, PathBuf::from("part_grades.csv"));
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = RunConfig::from_json(r#"{"test_id": 5, "stock_dialect": "fraction_trim"}"#)
            .unwrap();
        assert_eq!(config.test_id, Some(5));
        assert_eq!(config.stock_dialect, StockDialect::FractionTrim);
        assert!(config.regenerate_description);
        assert_eq!(config.input_dir, default_input_dir());
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"{{"regenerate_description": false, "project_floor": 123}}"#
        )
        .unwrap();

        let config = RunConfig::load(temp_file.path()).unwrap();
        assert!(!config.regenerate_description);
        assert_eq!(config.normalized_project_floor(), 1_230_000);
    }

    #[test]
    fn test_load_invalid_json() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "not json").unwrap();
        assert!(matches!(
            RunConfig::load(temp_file.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_normalize_project_floor() {
        assert_eq!(normalize_project_floor(0), 0);
        assert_eq!(normalize_project_floor(12), 1_200_000);
        assert_eq!(normalize_project_floor(1234567), 1_234_567);
        assert_eq!(normalize_project_floor(12345678), 12_345_678);
    }
}
