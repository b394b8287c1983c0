// ==========================================
// Ready 文件转换管道 - 表格导入错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::engine::error::ConvertError;
use thiserror::Error;

/// 表格导入错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 适配器错误 =====
    #[error("无法识别的工作簿: `{0}`（名称不含 ME2J / PARTLIST）")]
    UnknownWorkbook(String),

    #[error("表头缺少列 `{column}` (工作簿 {workbook})")]
    MissingHeader { workbook: String, column: String },

    // ===== 转换错误 =====
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
