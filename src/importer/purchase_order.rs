// ==========================================
// Ready 文件转换管道 - 采购订单适配器 (ME2J)
// ==========================================
// 列: Material / Short Text / Order Quantity / Order Unit
// 准入: 单位 EA/PC + 短文本以 "PL " 开头 + 物料未导出
// 延后: 短文本缺尺寸的行在首轮结束后重试一次,
//       借用同物料其他行的尺寸,仍缺失则丢弃
// 输出: Cone MAT 布局 (RawDetail / IN2) → ConeMAT_{job}_Conv.ready
// ==========================================

use crate::domain::record::ReadyRecord;
use crate::domain::types::VariantKind;
use crate::engine::converter::ReadyFileConverter;
use crate::engine::format::format_number;
use crate::engine::router::output_file_name;
use crate::engine::variant::cone_mat::{
    CONE_MAT_WIDTH, COL_DESCRIPTION, COL_GRADE_CODE, COL_LENGTH, COL_RAW_MM, COL_THICKNESS,
    COL_TYPE, COL_UNIT, COL_WIDTH,
};
use crate::importer::adapter::{leading_job, AdapterReport, SheetAdapter};
use crate::importer::conflict_handler::ConflictHandler;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::ColumnMap;
use crate::importer::file_parser::SheetTable;
use crate::importer::plate_text::{parse_plate_text, PlateDims, PLATE_TEXT_PREFIX};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

const MATERIAL: &str = "Material";
const SHORT_TEXT: &str = "Short Text";
const ORDER_QUANTITY: &str = "Order Quantity";
const ORDER_UNIT: &str = "Order Unit";

const ADMITTED_UNITS: &[&str] = &["EA", "PC"];

/// 写入行的原材料类型与单位
const RAW_TYPE: &str = "RawDetail";
const RAW_UNIT: &str = "IN2";

/// 数量写入 Cone MAT 第 10 列
const COL_QUANTITY: usize = 9;

static MATERIAL_JOB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{7}[A-Z]\d{2})-").unwrap());

/// 采购行
#[derive(Debug, Clone)]
struct PurchaseLine {
    material: String,
    text: String,
    quantity: String,
}

pub struct PurchaseOrderAdapter;

impl PurchaseOrderAdapter {
    pub const NAME_FRAGMENT: &'static str = "ME2J";

    fn reshape(line: &PurchaseLine, dims: &PlateDims) -> ReadyRecord {
        let mut record = ReadyRecord::new(vec![String::new(); CONE_MAT_WIDTH]);
        record.set(COL_RAW_MM, line.material.as_str());
        record.set(COL_DESCRIPTION, line.text.as_str());
        record.set(COL_TYPE, RAW_TYPE);
        record.set(COL_LENGTH, format_number(dims.length));
        record.set(COL_WIDTH, format_number(dims.width));
        record.set(COL_THICKNESS, format_number(dims.thickness));
        record.set(COL_UNIT, RAW_UNIT);
        record.set(COL_GRADE_CODE, dims.grade_code.as_str());
        record.set(COL_QUANTITY, line.quantity.as_str());
        record
    }

    fn output_name(table: &SheetTable, first_material: Option<&str>) -> String {
        let job = first_material
            .and_then(|m| leading_job(&MATERIAL_JOB, m))
            .unwrap_or_else(|| table.workbook_stem().to_string());
        output_file_name(&format!("ConeMAT_{}.ready", job))
    }
}

impl SheetAdapter for PurchaseOrderAdapter {
    fn name(&self) -> &'static str {
        "purchase_order"
    }

    fn ingest(
        &self,
        table: &SheetTable,
        converter: &mut ReadyFileConverter<'_>,
        exported: &mut HashSet<String>,
    ) -> ImportResult<AdapterReport> {
        let columns = ColumnMap::resolve(
            &table.workbook_name,
            &table.headers,
            &[MATERIAL, SHORT_TEXT, ORDER_QUANTITY, ORDER_UNIT],
        )?;
        let mut report = AdapterReport::new(self.name(), &table.workbook_name);
        let mut handler = ConflictHandler::new(exported);

        let mut ready: Vec<(PurchaseLine, PlateDims)> = Vec::new();
        let mut deferred: Vec<PurchaseLine> = Vec::new();
        let mut known_dims: HashMap<String, PlateDims> = HashMap::new();

        // ===== 首轮 =====
        for (idx, row) in table.rows.iter().enumerate() {
            let line = PurchaseLine {
                material: columns.get(row, MATERIAL).to_string(),
                text: columns.get(row, SHORT_TEXT).to_string(),
                quantity: columns.get(row, ORDER_QUANTITY).to_string(),
            };
            let unit = columns.get(row, ORDER_UNIT).to_uppercase();

            if line.material.is_empty()
                || !ADMITTED_UNITS.contains(&unit.as_str())
                || !line.text.starts_with(PLATE_TEXT_PREFIX)
            {
                debug!(row = idx + 2, material = %line.material, unit = %unit, "准入过滤拒绝");
                report.skipped += 1;
                continue;
            }

            if handler.is_exported(&line.material) {
                debug!(row = idx + 2, material = %line.material, "物料已导出,跳过");
                report.duplicates += 1;
                continue;
            }

            match parse_plate_text(&line.text) {
                Some(dims) => {
                    known_dims
                        .entry(line.material.clone())
                        .or_insert_with(|| dims.clone());
                    ready.push((line, dims));
                }
                None => {
                    debug!(row = idx + 2, material = %line.material, text = %line.text, "短文本缺尺寸,延后处理");
                    report.deferred += 1;
                    deferred.push(line);
                }
            }
        }

        // ===== 二次处理 (仅一次) =====
        for line in deferred {
            match known_dims.get(&line.material) {
                Some(dims) => {
                    report.retried += 1;
                    let dims = dims.clone();
                    ready.push((line, dims));
                }
                None => {
                    warn!(material = %line.material, text = %line.text, "延后行仍缺尺寸,丢弃");
                    report.dropped += 1;
                }
            }
        }

        report.admitted = ready.len();
        if ready.is_empty() {
            info!(workbook = %table.workbook_name, "无可导出的采购行");
            return Ok(report);
        }

        for (line, _) in &ready {
            handler.admit_repeatable(&line.material);
        }

        let name = Self::output_name(table, ready.first().map(|(line, _)| line.material.as_str()));
        let rows = ready
            .iter()
            .map(|(line, dims)| Self::reshape(line, dims))
            .collect();

        let counts = converter.convert_rows(VariantKind::ConeMat, None, rows)?;
        let path = converter.flush(&name)?;
        let newly_exported = handler.commit();

        info!(
            admitted = report.admitted,
            deferred = report.deferred,
            retried = report.retried,
            dropped = report.dropped,
            exported = newly_exported,
            output = %path.display(),
            "采购订单导入完成"
        );

        report.rows_written = counts.rows_written;
        report.output_path = Some(path);
        Ok(report)
    }
}
