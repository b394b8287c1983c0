// ==========================================
// Ready 文件转换管道 - 表格适配器接口
// ==========================================
// 流程: 读表 → 按工作簿名选择适配器 → 列映射 → 准入过滤
//       → 重排为变体列布局 → 变体逐行转换 → 落盘
// ==========================================

use crate::engine::converter::ReadyFileConverter;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{read_workbook, SheetTable};
use crate::importer::part_list::PartListAdapter;
use crate::importer::purchase_order::PurchaseOrderAdapter;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// 适配器执行结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdapterReport {
    pub adapter: String,
    pub workbook: String,
    /// 通过准入并交给变体转换的行
    pub admitted: usize,
    /// 准入过滤拒绝的行 (单位/类型/前缀不符)
    pub skipped: usize,
    /// 首轮缺少尺寸而延后的行
    pub deferred: usize,
    /// 延后行二次处理成功的数量
    pub retried: usize,
    /// 二次处理仍失败而丢弃的行
    pub dropped: usize,
    /// 已导出或同批次重复
    pub duplicates: usize,
    pub rows_written: usize,
    pub output_path: Option<PathBuf>,
}

impl AdapterReport {
    pub fn new(adapter: &str, workbook: &str) -> Self {
        Self {
            adapter: adapter.to_string(),
            workbook: workbook.to_string(),
            ..Self::default()
        }
    }
}

// ==========================================
// SheetAdapter Trait
// ==========================================
// 实现者: PurchaseOrderAdapter (ME2J), PartListAdapter (PARTLIST)
pub trait SheetAdapter {
    fn name(&self) -> &'static str;

    /// 处理整张表并写出转换结果
    ///
    /// # 参数
    /// - table: 已读取的表格
    /// - converter: 转换驱动 (提供变体与输出目录)
    /// - exported: 已导出标识集合,本次新导出的标识在落盘后并入
    fn ingest(
        &self,
        table: &SheetTable,
        converter: &mut ReadyFileConverter<'_>,
        exported: &mut HashSet<String>,
    ) -> ImportResult<AdapterReport>;
}

/// 按工作簿名片段选择适配器 (大小写不敏感)
pub fn select_adapter(workbook_name: &str) -> ImportResult<Box<dyn SheetAdapter>> {
    let upper = workbook_name.to_uppercase();
    if upper.contains(PurchaseOrderAdapter::NAME_FRAGMENT) {
        Ok(Box::new(PurchaseOrderAdapter))
    } else if upper.contains(PartListAdapter::NAME_FRAGMENT) {
        Ok(Box::new(PartListAdapter))
    } else {
        Err(ImportError::UnknownWorkbook(workbook_name.to_string()))
    }
}

/// 读取工作簿并交给匹配的适配器
pub fn ingest_workbook<P: AsRef<Path>>(
    path: P,
    converter: &mut ReadyFileConverter<'_>,
    exported: &mut HashSet<String>,
) -> ImportResult<AdapterReport> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    // 先选适配器,名称不符时不必读文件
    let adapter = select_adapter(&file_name)?;
    let table = read_workbook(path)?;
    info!(adapter = adapter.name(), workbook = %table.workbook_name, rows = table.rows.len(), "开始表格导入");

    adapter.ingest(&table, converter, exported)
}

/// 从标识前缀提取项目号,无匹配时返回 None
pub(crate) fn leading_job(pattern: &regex::Regex, id: &str) -> Option<String> {
    pattern
        .captures(id)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_adapter_by_name_fragment() {
        assert_eq!(select_adapter("ME2J_2024.xlsx").unwrap().name(), "purchase_order");
        assert_eq!(select_adapter("export_me2j.csv").unwrap().name(), "purchase_order");
        assert_eq!(select_adapter("PartList-1234567A.xlsx").unwrap().name(), "part_list");
    }

    #[test]
    fn test_select_adapter_unknown() {
        assert!(matches!(
            select_adapter("export.xlsx"),
            Err(ImportError::UnknownWorkbook(name)) if name == "export.xlsx"
        ));
    }
}
