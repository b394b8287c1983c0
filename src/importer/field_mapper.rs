// ==========================================
// Ready 文件转换管道 - 表头列映射
// ==========================================
// 职责: 表头标签 → 列序号,适配器按标签取值
// 约束: 标签需完全一致 (忽略首尾空白)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;

/// 已解析的列映射
#[derive(Debug, Clone)]
pub struct ColumnMap {
    positions: HashMap<String, usize>,
}

impl ColumnMap {
    /// 解析表头,校验必需列
    ///
    /// # 参数
    /// - workbook: 工作簿名 (用于错误信息)
    /// - headers: 表头行
    /// - required: 必需列标签
    pub fn resolve(workbook: &str, headers: &[String], required: &[&str]) -> ImportResult<Self> {
        let mut positions = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            // 重复标签取第一次出现
            positions.entry(header.trim().to_string()).or_insert(idx);
        }

        if let Some(missing) = required.iter().find(|name| !positions.contains_key(**name)) {
            return Err(ImportError::MissingHeader {
                workbook: workbook.to_string(),
                column: missing.to_string(),
            });
        }

        Ok(Self { positions })
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    /// 取单元格值 (列不存在或行过短返回空串)
    pub fn get<'r>(&self, row: &'r [String], column: &str) -> &'r str {
        self.position(column)
            .and_then(|idx| row.get(idx))
            .map(|v| v.trim())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        vec!["Material".to_string(), " Short Text ".to_string(), "Order Quantity".to_string()]
    }

    #[test]
    fn test_resolve_and_get() {
        let map = ColumnMap::resolve("ME2J.xlsx", &headers(), &["Material", "Short Text"]).unwrap();
        let row = vec!["M1".to_string(), " PL 1/2 x 12 x 96 ".to_string()];

        assert_eq!(map.position("Short Text"), Some(1));
        assert_eq!(map.get(&row, "Short Text"), "PL 1/2 x 12 x 96");
        // 行过短
        assert_eq!(map.get(&row, "Order Quantity"), "");
        // 未知列
        assert_eq!(map.get(&row, "Plant"), "");
    }

    #[test]
    fn test_missing_required_header() {
        let err = ColumnMap::resolve("ME2J.xlsx", &headers(), &["Material", "Order Unit"])
            .unwrap_err();
        assert!(matches!(
            err,
            ImportError::MissingHeader { ref column, .. } if column == "Order Unit"
        ));
    }
}
