// ==========================================
// Ready 文件转换管道 - 核心库
// ==========================================
// 职责: ERP 与套料系统之间的 Ready 文件 (制表符分隔) 转换
// 技术栈: Rust + SQLite (BOM 数据源) + Excel/CSV 表格导入
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与类型
pub mod domain;

// 数据仓储层 - 外部 BOM 数据
pub mod repository;

// 引擎层 - 路由与变体转换
pub mod engine;

// 导入层 - 外部表格
pub mod importer;

// 配置层 - 运行配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 运行汇总
pub mod report;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{GradeTriple, ReadyRecord, StockDialect, VariantKind};

// 引擎
pub use engine::{
    classify, format_inches, parse_grade, ConversionReport, ConvertError, PartGradeCache,
    ReadyFileConverter,
};

// 配置与汇总
pub use config::RunConfig;
pub use report::RunSummary;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Ready 文件转换管道";
