// ==========================================
// Ready 文件转换管道 - 表格导入层
// ==========================================
// 职责: 外部导出表格 → 变体列布局 → Ready 转换输出
// 支持: Excel (.xlsx), CSV
// ==========================================

// 模块声明
pub mod adapter;
pub mod conflict_handler;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod part_list;
pub mod plate_text;
pub mod purchase_order;

// 重导出核心类型
pub use adapter::{ingest_workbook, select_adapter, AdapterReport, SheetAdapter};
pub use conflict_handler::{Admission, ConflictHandler};
pub use error::{ImportError, ImportResult};
pub use field_mapper::ColumnMap;
pub use file_parser::{read_workbook, SheetTable};
pub use part_list::PartListAdapter;
pub use plate_text::{parse_plate_text, PlateDims};
pub use purchase_order::PurchaseOrderAdapter;
