// ==========================================
// 表格适配器集成测试
// ==========================================
// 测试目标: 导出表格 → 适配器准入/重排 → 变体转换 → 输出
// 表格使用 CSV 形式,与 xlsx 共享同一解析结果结构
// ==========================================


use ready_convert::domain::GradeTriple;
use ready_convert::engine::{PartGradeCache, ReadyFileConverter};
use ready_convert::importer::{ingest_workbook, ImportError};
use ready_convert::logging;
use std::collections::HashSet;
use test_helpers::TestWorkspace;

const ME2J_CSV: &str = "\
Material,Short Text,Order Quantity,Order Unit
1234567A01-01234,PL 1/2 x 12 x 96 50WT2,2,EA
1234567A01-01234,PL 1/2 50WT2,1,EA
1234567A01-05555,PL 3/4,1,PC
1234567A01-01236,PL 1 x 10 x 48 M270-50W,1,LB
1234567A01-01237,BAR 1 x 2,1,EA
1234567A01-09999,PL 1 x 10 x 48 50W,1,EA
";

const PART_LIST_CSV: &str = "\
Part Name,Part Type,Quantity,Drawing,Shipment
1234567A-G12A,web,4,D-101,3
1234567A-G12A,WEB,4,D-101,3
1234567A-B1,bolt,10,D-102,3
1234567A-P7,Part,1,D-103,3
";

#[test]
fn test_purchase_order_admission_and_deferred_retry() {
    logging::init_test();
    let ws = TestWorkspace::new();
    let workbook = ws.write_file("ME2J_export.csv", ME2J_CSV);

    let cache = PartGradeCache::new();
    let mut converter = ReadyFileConverter::new(&ws.config, &cache);
    let mut exported: HashSet<String> = ["1234567A01-09999".to_string()].into_iter().collect();

    let report = ingest_workbook(&workbook, &mut converter, &mut exported).unwrap();

    assert_eq!(report.adapter, "purchase_order");
    assert_eq!(report.admitted, 2);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.deferred, 2);
    assert_eq!(report.retried, 1);
    assert_eq!(report.dropped, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.rows_written, 2);
    assert_eq!(
        report.output_path,
        Some(ws.output_path("ConeMAT_1234567A01_Conv.ready"))
    );

    let rows = ws.read_output("ConeMAT_1234567A01_Conv.ready");
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.len(), 15);
        assert_eq!(row[0], "1234567A01-91234");
        assert_eq!(row[1], "PL 1/2 x 12 x 96 50WT2");
        assert_eq!(row[2], "RawDetail");
        assert_eq!(row[6], "20.417");
        assert_eq!(row[7], "FT2");
        assert_eq!(&row[12..], &["A709", "50W", "T2"]);
    }
    // 二次处理的行保留自身数量
    assert_eq!(rows[0][9], "2");
    assert_eq!(rows[1][9], "1");

    // 仅实际写出的物料记入已导出集合
    assert!(exported.contains("1234567A01-01234"));
    assert!(!exported.contains("1234567A01-05555"));
}

#[test]
fn test_purchase_order_rerun_skips_exported_materials() {
    let ws = TestWorkspace::new();
    let workbook = ws.write_file("ME2J_export.csv", ME2J_CSV);

    let cache = PartGradeCache::new();
    let mut converter = ReadyFileConverter::new(&ws.config, &cache);
    let mut exported = HashSet::new();

    let first = ingest_workbook(&workbook, &mut converter, &mut exported).unwrap();
    assert_eq!(first.admitted, 3);

    let second = ingest_workbook(&workbook, &mut converter, &mut exported).unwrap();
    assert_eq!(second.admitted, 0);
    assert_eq!(second.duplicates, 3);
    assert_eq!(second.output_path, None);
}

#[test]
fn test_part_list_admission_and_enrichment() {
    logging::init_test();
    let ws = TestWorkspace::new();
    let workbook = ws.write_file("PartList_1234567A.csv", PART_LIST_CSV);

    let mut cache = PartGradeCache::new();
    cache.insert(
        "1234567A-G12A",
        GradeTriple::new(Some("A709"), Some("50W"), Some("T2")),
    );
    let mut converter = ReadyFileConverter::new(&ws.config, &cache);
    let mut exported = HashSet::new();

    let report = ingest_workbook(&workbook, &mut converter, &mut exported).unwrap();
    assert_eq!(report.adapter, "part_list");
    assert_eq!(report.admitted, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.deferred, 0);

    let rows = ws.read_output("1234567A-MM_Conv.ready");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].len(), 22);
    assert_eq!(rows[0][0], "TYPE");
    assert_eq!(rows[0][21], "DOCNO");

    let web = &rows[1];
    assert_eq!(web[0], "WEB");
    assert_eq!(web[1], "1234567A-G12A");
    assert_eq!(web[2], "4");
    assert_eq!(web[3], "1234567A");
    assert_eq!(web[4], "3");
    assert_eq!(web[12], "1234567A_G12A");
    assert_eq!(web[21], "D-101");
    assert_eq!(&web[17..20], &["A709", "50W", "T2"]);

    let part = &rows[2];
    assert_eq!(part[0], "PART");
    assert_eq!(&part[17..20], &["", "", ""]);

    assert!(exported.contains("1234567A-G12A"));
    assert!(exported.contains("1234567A-P7"));
    assert!(!exported.contains("1234567A-B1"));
}

#[test]
fn test_part_list_dedup_ignores_case() {
    let ws = TestWorkspace::new();
    let workbook = ws.write_file(
        "PartList_1234567A.csv",
        "\
Part Name,Part Type,Quantity,Drawing,Shipment
1234567A-g12a,WEB,4,D-101,3
1234567A-G12A,WEB,4,D-101,3
1234567A-f2,FLANGE,2,D-104,3
",
    );

    let cache = PartGradeCache::new();
    let mut converter = ReadyFileConverter::new(&ws.config, &cache);
    let mut exported: HashSet<String> = ["1234567A-F2".to_string()].into_iter().collect();

    let report = ingest_workbook(&workbook, &mut converter, &mut exported).unwrap();
    assert_eq!(report.admitted, 1);
    assert_eq!(report.duplicates, 2);

    let rows = ws.read_output("1234567A-MM_Conv.ready");
    assert_eq!(rows.len(), 2);
    // 写出行保留原始大小写
    assert_eq!(rows[1][1], "1234567A-g12a");
    assert!(exported.contains("1234567A-G12A"));
    assert!(!exported.contains("1234567A-g12a"));
}

#[test]
fn test_unknown_workbook_rejected() {
    let ws = TestWorkspace::new();
    let workbook = ws.write_file("export.csv", PART_LIST_CSV);

    let cache = PartGradeCache::new();
    let mut converter = ReadyFileConverter::new(&ws.config, &cache);
    let mut exported = HashSet::new();

    let err = ingest_workbook(&workbook, &mut converter, &mut exported).unwrap_err();
    assert!(matches!(err, ImportError::UnknownWorkbook(ref name) if name == "export.csv"));
}

#[test]
fn test_missing_header_rejected() {
    let ws = TestWorkspace::new();
    let workbook = ws.write_file(
        "me2j_short.csv",
        "Material,Short Text,Order Quantity\n1234567A01-01234,PL 1/2 x 12 x 96 50W,1\n",
    );

    let cache = PartGradeCache::new();
    let mut converter = ReadyFileConverter::new(&ws.config, &cache);
    let mut exported = HashSet::new();

    let err = ingest_workbook(&workbook, &mut converter, &mut exported).unwrap_err();
    assert!(matches!(
        err,
        ImportError::MissingHeader { ref column, .. } if column == "Order Unit"
    ));
    assert!(exported.is_empty());
}
