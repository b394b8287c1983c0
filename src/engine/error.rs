// ==========================================
// Ready 文件转换管道 - 转换引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 转换引擎错误类型
#[derive(Error, Debug)]
pub enum ConvertError {
    // ===== 路由错误 =====
    #[error("无法识别的文件名: `{0}`（不匹配 ConeBOM / ConeMAT / MM 任一变体）")]
    UnroutableFilename(String),

    // ===== 数据错误 =====
    #[error("数值字段无法解析 (行 {row}, 列 {column}): `{value}`")]
    InvalidNumber {
        row: usize,
        column: usize,
        value: String,
    },

    // ===== 缓存错误 =====
    #[error("零件材质缓存格式错误 (行 {row}): {message}")]
    CacheFormat { row: usize, message: String },

    #[error("CSV 读写失败: {0}")]
    Csv(String),

    // ===== 文件错误 =====
    #[error("文件读取失败 ({path}): {message}")]
    FileRead { path: String, message: String },

    #[error("文件写入失败 ({path}): {message}")]
    FileWrite { path: String, message: String },
}

impl From<csv::Error> for ConvertError {
    fn from(err: csv::Error) -> Self {
        ConvertError::Csv(err.to_string())
    }
}

/// Result 类型别名
pub type ConvertResult<T> = Result<T, ConvertError>;
