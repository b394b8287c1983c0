// ==========================================
// Ready 文件转换管道 - Cone MAT 变体
// ==========================================
// 列: 0 原材料编码 / 1 描述 / 2 类型 / 3 长 / 4 宽 / 5 厚
//     6 面积重量 / 7 单位 / 8 材质编码 / 12-14 规范·等级·冲击
// 规则:
// - 仅保留 RawWeb / RawFlange / RawDetail
// - 补齐至 15 列,材质编码拆分写入末尾 3 列
// - 原材料编码规范化 + 测试编号替换
// - IN2 → FT2 (厚 × 40.8333,保留 3 位)
// - 可选: 按厚/宽/长重新生成描述
// ==========================================

use super::parse_number;
use crate::domain::record::ReadyRecord;
use crate::domain::types::StockDialect;
use crate::engine::error::ConvertResult;
use crate::engine::format::{describe_plate, format_number, round_to, PLATE_PREFIX};
use crate::engine::grade::parse_grade;
use crate::engine::identifier::canonicalize;
use tracing::debug;

pub const COL_RAW_MM: usize = 0;
pub const COL_DESCRIPTION: usize = 1;
pub const COL_TYPE: usize = 2;
pub const COL_LENGTH: usize = 3;
pub const COL_WIDTH: usize = 4;
pub const COL_THICKNESS: usize = 5;
pub const COL_AREA_WEIGHT: usize = 6;
pub const COL_UNIT: usize = 7;
pub const COL_GRADE_CODE: usize = 8;
pub const COL_SPEC: usize = 12;
pub const COL_GRADE: usize = 13;
pub const COL_TEST: usize = 14;

/// 输出宽度
pub const CONE_MAT_WIDTH: usize = 15;

const ADMITTED_TYPES: &[&str] = &["RawWeb", "RawFlange", "RawDetail"];

/// 每英寸厚钢板的单位面积重量 (lb/ft²)
const LB_PER_SQ_FT_PER_INCH: f64 = 40.8333;

pub struct ConeMatConverter {
    test_id: Option<u32>,
    dialect: StockDialect,
    regenerate_description: bool,
}

impl ConeMatConverter {
    pub fn new(test_id: Option<u32>, dialect: StockDialect, regenerate_description: bool) -> Self {
        Self {
            test_id,
            dialect,
            regenerate_description,
        }
    }

    pub fn convert_row(
        &self,
        mut record: ReadyRecord,
        row_number: usize,
    ) -> ConvertResult<Option<ReadyRecord>> {
        if !ADMITTED_TYPES.contains(&record.get(COL_TYPE)) {
            debug!(row = row_number, kind = %record.get(COL_TYPE), "非原材料类型,丢弃");
            return Ok(None);
        }

        record.pad_to(CONE_MAT_WIDTH);
        record.truncate(CONE_MAT_WIDTH);

        let triple = parse_grade(record.get(COL_GRADE_CODE));
        let [spec, grade, test] = triple.to_fields();
        record.set(COL_SPEC, spec);
        record.set(COL_GRADE, grade);
        record.set(COL_TEST, test);

        let raw_mm = canonicalize(record.get(COL_RAW_MM), self.test_id, self.dialect);
        record.set(COL_RAW_MM, raw_mm);

        if let Some(id) = self.test_id {
            record.substitute_first_zero(COL_RAW_MM, id);
        }

        if record.get(COL_UNIT) == "IN2" {
            let thickness = parse_number(&record, COL_THICKNESS, row_number)?;
            record.set(
                COL_AREA_WEIGHT,
                format_number(round_to(thickness * LB_PER_SQ_FT_PER_INCH, 3)),
            );
            record.set(COL_UNIT, "FT2");
        }

        if self.regenerate_description {
            let length = parse_number(&record, COL_LENGTH, row_number)?;
            let width = parse_number(&record, COL_WIDTH, row_number)?;
            let thickness = parse_number(&record, COL_THICKNESS, row_number)?;
            let prefix = description_prefix(record.get(COL_DESCRIPTION));

            let description = describe_plate(
                &prefix,
                thickness,
                width,
                length,
                triple.grade.as_deref(),
                triple.test.as_deref(),
            );
            record.set(COL_DESCRIPTION, description);
        }

        Ok(Some(record))
    }
}

/// 保留非标准描述前缀,否则使用 `PL`
fn description_prefix(existing: &str) -> String {
    match existing.split_whitespace().next() {
        Some(token) if token != PLATE_PREFIX => token.to_string(),
        _ => PLATE_PREFIX.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::ConvertError;

    fn mat_row(kind: &str, unit: &str, grade: &str) -> ReadyRecord {
        ReadyRecord::from(vec![
            "1234567A01-01234",
            "PL 1/2 x 12 x 96",
            kind,
            "96",
            "12",
            "0.5",
            "8",
            unit,
            grade,
        ])
    }

    #[test]
    fn test_non_raw_types_dropped() {
        let converter = ConeMatConverter::new(None, StockDialect::FixedDecimal, true);
        for kind in ["Part", "Assembly", ""] {
            assert!(converter
                .convert_row(mat_row(kind, "FT2", "A709-50W"), 1)
                .unwrap()
                .is_none());
        }
    }

    #[test]
    fn test_pads_and_writes_grade_columns() {
        let converter = ConeMatConverter::new(None, StockDialect::FixedDecimal, false);
        let out = converter
            .convert_row(mat_row("RawWeb", "FT2", "A709-50WT2"), 1)
            .unwrap()
            .unwrap();

        assert_eq!(out.len(), CONE_MAT_WIDTH);
        assert_eq!(out.get(0), "1234567A01-91234");
        assert_eq!(out.get(12), "A709");
        assert_eq!(out.get(13), "50W");
        assert_eq!(out.get(14), "T2");
        // 未开启描述重建
        assert_eq!(out.get(1), "PL 1/2 x 12 x 96");
        assert_eq!(out.get(6), "8");
    }

    #[test]
    fn test_unparsable_grade_leaves_empty_columns() {
        let converter = ConeMatConverter::new(None, StockDialect::FixedDecimal, false);
        let out = converter
            .convert_row(mat_row("RawDetail", "FT2", "UNKNOWN"), 1)
            .unwrap()
            .unwrap();

        assert_eq!(out.get(12), "");
        assert_eq!(out.get(13), "");
        assert_eq!(out.get(14), "");
    }

    #[test]
    fn test_in2_recomputes_area_weight() {
        let converter = ConeMatConverter::new(None, StockDialect::FixedDecimal, false);
        let out = converter
            .convert_row(mat_row("RawFlange", "IN2", "A709-50W"), 1)
            .unwrap()
            .unwrap();

        assert_eq!(out.get(6), "20.417");
        assert_eq!(out.get(7), "FT2");
    }

    #[test]
    fn test_in2_area_weight_near_half_thousandth() {
        let converter = ConeMatConverter::new(None, StockDialect::FixedDecimal, false);
        let mut row = mat_row("RawDetail", "IN2", "A709-50W");
        row.set(5, "25");

        let out = converter.convert_row(row, 1).unwrap().unwrap();
        assert_eq!(out.get(6), "1020.832");
    }

    #[test]
    fn test_regenerates_description() {
        let converter = ConeMatConverter::new(None, StockDialect::FixedDecimal, true);
        let out = converter
            .convert_row(mat_row("RawWeb", "FT2", "A709-50WF2"), 1)
            .unwrap()
            .unwrap();

        assert_eq!(out.get(1), "PL 1/2 x 12 x 96 50WF2");
    }

    #[test]
    fn test_non_standard_description_prefix_kept() {
        let converter = ConeMatConverter::new(None, StockDialect::FixedDecimal, true);
        let mut row = mat_row("RawWeb", "FT2", "A709-50W");
        row.set(1, "SHT 1/2 x 12 x 96");

        let out = converter.convert_row(row, 1).unwrap().unwrap();
        assert_eq!(out.get(1), "SHT 1/2 x 12 x 96 50W");
    }

    #[test]
    fn test_wide_rows_truncated_to_grade_columns() {
        let converter = ConeMatConverter::new(None, StockDialect::FixedDecimal, false);
        let mut row = mat_row("RawWeb", "FT2", "A709-50W");
        row.pad_to(18);
        row.set(17, "stale");

        let out = converter.convert_row(row, 1).unwrap().unwrap();
        assert_eq!(out.len(), CONE_MAT_WIDTH);
    }

    #[test]
    fn test_test_id_on_identifier() {
        let converter = ConeMatConverter::new(Some(3), StockDialect::FixedDecimal, false);
        let mut row = mat_row("RawWeb", "FT2", "A709-50W");
        row.set(0, "XYZ-ABCD");

        let out = converter.convert_row(row, 1).unwrap().unwrap();
        // 回退替换第 4 个字符,其后无 '0'
        assert_eq!(out.get(0), "XYZ3ABCD");
    }

    #[test]
    fn test_malformed_dimension_is_fatal() {
        let converter = ConeMatConverter::new(None, StockDialect::FixedDecimal, true);
        let mut row = mat_row("RawWeb", "FT2", "A709-50W");
        row.set(4, "wide");

        let err = converter.convert_row(row, 9).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidNumber { row: 9, column: 4, .. }));
    }
}
