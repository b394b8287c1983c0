// ==========================================
// Ready 文件转换管道 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供外部 BOM 数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod bom_source;
pub mod error;

// 重导出核心仓储
pub use bom_source::{BomLine, BomSource, EngStructure, SqliteBomSource};
pub use error::{RepositoryError, RepositoryResult};
