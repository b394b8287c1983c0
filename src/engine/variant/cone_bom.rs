// ==========================================
// Ready 文件转换管道 - Cone BOM 变体
// ==========================================
// 列: 0 父件 / 1 原材料编码 / 2 数量(面积) / 3 单位
// 规则:
// - 仅保留面积单位 IN2 / FT2,线性单位行丢弃
// - 原材料编码规范化
// - IN2 → FT2 (÷144,保留 3 位)
// - 测试编号: 前两列各替换首个 '0'
// ==========================================

use super::parse_number;
use crate::domain::record::ReadyRecord;
use crate::domain::types::StockDialect;
use crate::engine::error::ConvertResult;
use crate::engine::format::{format_number, round_to};
use crate::engine::identifier::canonicalize;
use tracing::debug;

const COL_PARENT: usize = 0;
const COL_RAW_MM: usize = 1;
const COL_QUANTITY: usize = 2;
const COL_UNIT: usize = 3;

const ADMITTED_UNITS: &[&str] = &["IN2", "FT2"];
const SQ_IN_PER_SQ_FT: f64 = 144.0;

pub struct ConeBomConverter {
    test_id: Option<u32>,
    dialect: StockDialect,
}

impl ConeBomConverter {
    pub fn new(test_id: Option<u32>, dialect: StockDialect) -> Self {
        Self { test_id, dialect }
    }

    pub fn convert_row(
        &self,
        mut record: ReadyRecord,
        row_number: usize,
    ) -> ConvertResult<Option<ReadyRecord>> {
        let unit = record.get(COL_UNIT).to_string();
        if !ADMITTED_UNITS.contains(&unit.as_str()) {
            debug!(row = row_number, unit = %unit, "非面积单位,丢弃");
            return Ok(None);
        }

        let raw_mm = canonicalize(record.get(COL_RAW_MM), self.test_id, self.dialect);
        record.set(COL_RAW_MM, raw_mm);

        if unit == "IN2" {
            let area = parse_number(&record, COL_QUANTITY, row_number)?;
            record.set(
                COL_QUANTITY,
                format_number(round_to(area / SQ_IN_PER_SQ_FT, 3)),
            );
            record.set(COL_UNIT, "FT2");
        }

        if let Some(id) = self.test_id {
            record.substitute_first_zero(COL_PARENT, id);
            record.substitute_first_zero(COL_RAW_MM, id);
        }

        Ok(Some(record))
    }
}
