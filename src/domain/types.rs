// ==========================================
// Ready 文件转换管道 - 领域类型定义
// ==========================================
// 变体类型 / 库存编码方言 / 材质三元组
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 变体类型 (Variant Kind)
// ==========================================
// 由文件名唯一确定,封闭集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantKind {
    ConeBom,   // ConeBOM_*.ready
    ConeMat,   // ConeMAT_*.ready
    ProjectMm, // *-MM.ready
}

impl VariantKind {
    /// 该变体的输入文件是否带表头行
    pub fn has_header(&self) -> bool {
        matches!(self, VariantKind::ProjectMm)
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantKind::ConeBom => write!(f, "CONE_BOM"),
            VariantKind::ConeMat => write!(f, "CONE_MAT"),
            VariantKind::ProjectMm => write!(f, "PROJECT_MM"),
        }
    }
}

// ==========================================
// 库存编码方言 (Stock Dialect)
// ==========================================
// FixedDecimal: 新方言,固定 4 位小数
// FractionTrim: 旧方言,3 位小数并去除尾随零
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockDialect {
    #[default]
    FixedDecimal,
    FractionTrim,
}

impl fmt::Display for StockDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockDialect::FixedDecimal => write!(f, "fixed_decimal"),
            StockDialect::FractionTrim => write!(f, "fraction_trim"),
        }
    }
}

// ==========================================
// 材质三元组 (Spec, Grade, Test)
// ==========================================
// 缺失值一律为 None,查找失败返回全空三元组
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GradeTriple {
    pub spec: Option<String>,
    pub grade: Option<String>,
    pub test: Option<String>,
}

impl GradeTriple {
    /// 构造三元组,空字符串视为 None
    pub fn new(spec: Option<&str>, grade: Option<&str>, test: Option<&str>) -> Self {
        fn non_empty(v: Option<&str>) -> Option<String> {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        }

        Self {
            spec: non_empty(spec),
            grade: non_empty(grade),
            test: non_empty(test),
        }
    }

    /// 全空三元组
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.spec.is_none() && self.grade.is_none() && self.test.is_none()
    }

    /// 还原复合材质编码 `SPEC-GRADE[TEST]`
    ///
    /// 全空时返回 None
    pub fn to_code(&self) -> Option<String> {
        match (&self.spec, &self.grade) {
            (Some(spec), Some(grade)) => Some(format!(
                "{}-{}{}",
                spec,
                grade,
                self.test.as_deref().unwrap_or("")
            )),
            _ => None,
        }
    }

    /// 按列顺序输出 (空值写为空串)
    pub fn to_fields(&self) -> [String; 3] {
        [
            self.spec.clone().unwrap_or_default(),
            self.grade.clone().unwrap_or_default(),
            self.test.clone().unwrap_or_default(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_header() {
        assert!(VariantKind::ProjectMm.has_header());
        assert!(!VariantKind::ConeBom.has_header());
        assert!(!VariantKind::ConeMat.has_header());
    }

    #[test]
    fn test_grade_triple_empty_strings() {
        let triple = GradeTriple::new(Some("A709"), Some("50W"), Some(""));
        assert_eq!(triple.test, None);
        assert_eq!(triple.to_code(), Some("A709-50W".to_string()));
        assert!(GradeTriple::empty().is_empty());
        assert_eq!(GradeTriple::empty().to_code(), None);
    }

    #[test]
    fn test_stock_dialect_serde() {
        let dialect: StockDialect = serde_json::from_str("\"fraction_trim\"").unwrap();
        assert_eq!(dialect, StockDialect::FractionTrim);
        assert_eq!(StockDialect::default(), StockDialect::FixedDecimal);
    }
}
