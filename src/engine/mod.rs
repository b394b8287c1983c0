// ==========================================
// Ready 文件转换管道 - 引擎层
// ==========================================
// 职责: 文件路由、编码规范化、变体转换、零件材质缓存
// 红线: Engine 不拼 SQL, 外部数据经 BomSource 获取
// ==========================================

pub mod converter;
pub mod error;
pub mod format;
pub mod grade;
pub mod identifier;
pub mod part_grades;
pub mod router;
pub mod variant;

// 重导出核心引擎
pub use converter::{ConversionReport, ReadyFileConverter, RowCounts};
pub use error::{ConvertError, ConvertResult};
pub use format::{describe_plate, format_inches};
pub use grade::parse_grade;
pub use identifier::canonicalize;
pub use part_grades::{PartGradeCache, RebuildSummary};
pub use router::{classify, output_file_name};
pub use variant::{ConversionContext, PartKey, Variant};
