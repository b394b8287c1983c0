// ==========================================
// Ready 文件转换管道 - 领域模型层
// ==========================================
// 职责: 定义 Ready 记录、变体类型、材质三元组
// 红线: 不含文件读写,不含转换逻辑
// ==========================================

pub mod record;
pub mod types;

// 重导出核心类型
pub use record::ReadyRecord;
pub use types::{GradeTriple, StockDialect, VariantKind};
