// ==========================================
// Ready 文件转换管道 - BOM 数据源仓储
// ==========================================
// 三层遍历: 工程结构 → 发运批次 → 物料清单行
// 红线: Repository 不含业务逻辑 (商品过滤 / 材质规则在缓存重建中完成)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};

/// 工程结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngStructure {
    /// 项目号 (数值比较用于下限过滤)
    pub project: String,
    /// 结构号 (即 job)
    pub structure: String,
    pub struct_id: i64,
}

/// 物料清单行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BomLine {
    pub piecemark: String,
    pub commodity: String,
    pub specification: Option<String>,
    pub grade: Option<String>,
    pub impact_test: Option<String>,
}

// ==========================================
// BomSource Trait
// ==========================================
// 用途: 零件材质缓存重建所需的外部数据接口
// 实现者: SqliteBomSource
pub trait BomSource {
    /// 读取全部工程结构
    fn structures(&self) -> RepositoryResult<Vec<EngStructure>>;

    /// 读取结构下的发运批次号
    fn shipments(&self, struct_id: i64) -> RepositoryResult<Vec<i64>>;

    /// 读取某 job 某发运批次的物料清单行
    fn bom_lines(&self, job: &str, ship_no: i64) -> RepositoryResult<Vec<BomLine>>;
}

// ==========================================
// SqliteBomSource - SQLite 实现
// ==========================================
pub struct SqliteBomSource {
    conn: Connection,
}

impl SqliteBomSource {
    /// 打开 BOM 数据库
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(format!("{}: {}", db_path, e)))?;
        Ok(Self { conn })
    }

    /// 从已有连接创建数据源
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl BomSource for SqliteBomSource {
    fn structures(&self) -> RepositoryResult<Vec<EngStructure>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT project, structure, struct_id
            FROM eng_structure
            ORDER BY struct_id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(EngStructure {
                project: row.get(0)?,
                structure: row.get(1)?,
                struct_id: row.get(2)?,
            })
        })?;

        let mut structures = Vec::new();
        for row in rows {
            structures.push(row?);
        }
        Ok(structures)
    }

    fn shipments(&self, struct_id: i64) -> RepositoryResult<Vec<i64>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT ship_no
            FROM eng_shipment
            WHERE struct_id = ?1
            ORDER BY ship_no
            "#,
        )?;

        let rows = stmt.query_map(params![struct_id], |row| row.get::<_, i64>(0))?;
        let mut shipments = Vec::new();
        for row in rows {
            shipments.push(row?);
        }
        Ok(shipments)
    }

    fn bom_lines(&self, job: &str, ship_no: i64) -> RepositoryResult<Vec<BomLine>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT piecemark, commodity, specification, grade, impact_test
            FROM bom_line
            WHERE job = ?1 AND ship_no = ?2
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map(params![job, ship_no], |row| {
            Ok(BomLine {
                piecemark: row.get(0)?,
                commodity: row.get(1)?,
                specification: row.get(2)?,
                grade: row.get(3)?,
                impact_test: row.get(4)?,
            })
        })?;

        let mut lines = Vec::new();
        for row in rows {
            lines.push(row?);
        }
        Ok(lines)
    }
}
