// ==========================================
// Ready 文件转换管道 - 表格读取
// ==========================================
// 支持: Excel (.xlsx, 读取第一个工作表) / CSV (.csv)
// 输出: SheetTable (表头 + 按列序的数据行)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// 内存中的表格
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetTable {
    /// 工作簿文件名 (适配器按名称片段选择)
    pub workbook_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    pub fn new(workbook_name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            workbook_name: workbook_name.into(),
            headers,
            rows,
        }
    }

    /// 工作簿名去掉扩展名
    pub fn workbook_stem(&self) -> &str {
        Path::new(&self.workbook_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.workbook_name)
    }
}

/// 按扩展名读取表格
pub fn read_workbook<P: AsRef<Path>>(path: P) -> ImportResult<SheetTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let workbook_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let (headers, rows) = match ext.as_str() {
        "xlsx" => read_xlsx(path)?,
        "csv" => read_csv(path)?,
        _ => return Err(ImportError::UnsupportedFormat(ext)),
    };

    debug!(workbook = %workbook_name, rows = rows.len(), "表格读取完成");
    Ok(SheetTable::new(workbook_name, headers, rows))
}

fn read_xlsx(path: &Path) -> ImportResult<(Vec<String>, Vec<Vec<String>>)> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;
    let headers = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let data = rows
        .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
        .filter(|row: &Vec<String>| !is_blank(row))
        .collect();

    Ok((headers, data))
}

fn read_csv(path: &Path) -> ImportResult<(Vec<String>, Vec<Vec<String>>)> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut data = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();
        if !is_blank(&row) {
            data.push(row);
        }
    }

    Ok((headers, data))
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|v| v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_read_csv_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ME2J_export.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "Material, Short Text ,Order Quantity").unwrap();
        writeln!(file, "1234567A01-01234,PL 1/2 x 12 x 96 50W,2").unwrap();
        writeln!(file, ",,").unwrap();
        writeln!(file, "1234567A01-01235,PL 3/4 x 10 x 48 50W,1").unwrap();

        let table = read_workbook(&path).unwrap();
        assert_eq!(table.workbook_name, "ME2J_export.csv");
        assert_eq!(table.workbook_stem(), "ME2J_export");
        assert_eq!(table.headers[1], "Short Text");
        // 空白行跳过
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][0], "1234567A01-01235");
    }

    #[test]
    fn test_missing_file() {
        let result = read_workbook("non_existent.xlsx");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.txt");
        File::create(&path).unwrap();

        assert!(matches!(
            read_workbook(&path),
            Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn test_legacy_xls_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ME2J_export.xls");
        File::create(&path).unwrap();

        let err = read_workbook(&path).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(ref ext) if ext == "xls"));
        assert!(err.to_string().contains("仅支持 .xlsx/.csv"));
    }
}
