// ==========================================
// Ready 文件转换管道 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一 BOM 数据源连接的 PRAGMA 行为
// - 统一 busy_timeout,避免与导出工具并发时的偶发 busy 错误
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 创建 BOM 数据源表结构 (幂等)
///
/// 三层结构:
/// - eng_structure: 工程结构 (项目号 / 结构号 / 结构 ID)
/// - eng_shipment: 结构下的发运批次
/// - bom_line: 发运批次下的物料清单行
pub fn init_bom_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS eng_structure (
            struct_id INTEGER PRIMARY KEY,
            project TEXT NOT NULL,
            structure TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS eng_shipment (
            struct_id INTEGER NOT NULL REFERENCES eng_structure(struct_id),
            ship_no INTEGER NOT NULL,
            PRIMARY KEY (struct_id, ship_no)
        );

        CREATE TABLE IF NOT EXISTS bom_line (
            job TEXT NOT NULL,
            ship_no INTEGER NOT NULL,
            piecemark TEXT NOT NULL,
            commodity TEXT NOT NULL,
            specification TEXT,
            grade TEXT,
            impact_test TEXT
        );
        "#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_bom_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_bom_schema(&conn).unwrap();
        init_bom_schema(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('eng_structure','eng_shipment','bom_line')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 3);
    }
}
