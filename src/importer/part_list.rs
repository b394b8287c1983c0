// ==========================================
// Ready 文件转换管道 - 零件清单适配器 (PARTLIST)
// ==========================================
// 列: Part Name / Part Type / Quantity / Drawing / Shipment
// 准入: 类型 WEB/FLANGE/PART (大小写不敏感) + 零件名 (大写) 未导出且批内不重复
// 输出: Project MM 17 列布局 + 补足表头 → {job}-MM_Conv.ready
// ==========================================

use crate::domain::record::ReadyRecord;
use crate::domain::types::VariantKind;
use crate::engine::converter::ReadyFileConverter;
use crate::engine::part_grades::PartGradeCache;
use crate::engine::router::output_file_name;
use crate::engine::variant::project_mm::{
    COL_DOCUMENT, COL_KIND, COL_PART_NAME, MM_ORIGINAL_HEADER_LEN,
};
use crate::importer::adapter::{leading_job, AdapterReport, SheetAdapter};
use crate::importer::conflict_handler::{Admission, ConflictHandler};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::ColumnMap;
use crate::importer::file_parser::SheetTable;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, info};

const PART_NAME: &str = "Part Name";
const PART_TYPE: &str = "Part Type";
const QUANTITY: &str = "Quantity";
const DRAWING: &str = "Drawing";
const SHIPMENT: &str = "Shipment";

const ADMITTED_TYPES: &[&str] = &["WEB", "FLANGE", "PART"];

const COL_QUANTITY: usize = 2;
const COL_JOB: usize = 3;
const COL_SHIPMENT: usize = 4;

/// Project MM 标准表头 (17 列)
pub const MM_STANDARD_HEADER: [&str; MM_ORIGINAL_HEADER_LEN] = [
    "TYPE", "PARTNAME", "QTY", "JOB", "SHIPMENT", "THICKNESS", "WIDTH", "LENGTH", "MATERIAL",
    "REMARK1", "REMARK2", "REMARK3", "DWGNO", "PRIORITY", "DUEDATE", "ROUTING", "COMMENTS",
];

static PART_JOB: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{7}[A-Z])[-_]").unwrap());

pub struct PartListAdapter;

impl PartListAdapter {
    pub const NAME_FRAGMENT: &'static str = "PARTLIST";

    fn header() -> ReadyRecord {
        ReadyRecord::from(MM_STANDARD_HEADER.to_vec())
    }

    fn reshape(columns: &ColumnMap, row: &[String], kind: &str, part_name: &str) -> ReadyRecord {
        let mut record = ReadyRecord::new(vec![String::new(); MM_ORIGINAL_HEADER_LEN]);
        record.set(COL_KIND, kind);
        record.set(COL_PART_NAME, part_name);
        record.set(COL_QUANTITY, columns.get(row, QUANTITY));
        record.set(
            COL_JOB,
            leading_job(&PART_JOB, part_name).unwrap_or_default(),
        );
        record.set(COL_SHIPMENT, columns.get(row, SHIPMENT));
        record.set(COL_DOCUMENT, columns.get(row, DRAWING));
        record
    }

    fn output_name(table: &SheetTable, first_part: Option<&str>) -> String {
        let job = first_part
            .and_then(|p| leading_job(&PART_JOB, p))
            .unwrap_or_else(|| table.workbook_stem().to_string());
        output_file_name(&format!("{}-MM.ready", job))
    }
}

impl SheetAdapter for PartListAdapter {
    fn name(&self) -> &'static str {
        "part_list"
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
            &[PART_NAME, PART_TYPE, QUANTITY, DRAWING, SHIPMENT],
        )?;
        let mut report = AdapterReport::new(self.name(), &table.workbook_name);
        let mut handler = ConflictHandler::new(exported);
        let mut rows = Vec::new();
        let mut first_part: Option<String> = None;

        for (idx, row) in table.rows.iter().enumerate() {
            let part_name = columns.get(row, PART_NAME);
            let kind = columns.get(row, PART_TYPE).to_uppercase();

            if part_name.is_empty() || !ADMITTED_TYPES.contains(&kind.as_str()) {
                debug!(row = idx + 2, part = %part_name, kind = %kind, "准入过滤拒绝");
                report.skipped += 1;
                continue;
            }

            // 与材质缓存键一致,按大写判重
            match handler.admit(&PartGradeCache::normalize_key(part_name)) {
                Admission::New => {}
                admission => {
                    debug!(row = idx + 2, part = %part_name, ?admission, "重复零件,跳过");
                    report.duplicates += 1;
                    continue;
                }
            }

            first_part.get_or_insert_with(|| part_name.to_string());
            rows.push(Self::reshape(&columns, row, &kind, part_name));
        }

        report.admitted = rows.len();
        if rows.is_empty() {
            info!(workbook = %table.workbook_name, "无可导出的零件");
            return Ok(report);
        }

        let name = Self::output_name(table, first_part.as_deref());
        let counts = converter.convert_rows(VariantKind::ProjectMm, Some(Self::header()), rows)?;
        let path = converter.flush(&name)?;
        let newly_exported = handler.commit();

        info!(
            admitted = report.admitted,
            duplicates = report.duplicates,
            exported = newly_exported,
            output = %path.display(),
            "零件清单导入完成"
        );

        report.rows_written = counts.rows_written;
        report.output_path = Some(path);
        Ok(report)
    }
}
