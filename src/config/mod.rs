// ==========================================
// Ready 文件转换管道 - 配置层
// ==========================================
// 职责: 运行配置加载 (JSON 文件 + 命令行覆写)
// ==========================================

pub mod run_config;

// 重导出核心配置
pub use run_config::{normalize_project_floor, ConfigError, RunConfig};
