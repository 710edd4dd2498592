// ============================================================================
// 数据库模块：SQLite 连接提供者与事务边界
// 使用 rusqlite 直接操作 SQLite，不引入 ORM，也不做连接池：
// 每次数据访问都打开自己的连接，用完即释放
// ============================================================================

pub mod project_dao;

use rusqlite::{Connection, Transaction};

use crate::config::DatabaseConfig;
use crate::utils::error::{AppError, AppResult};

pub use project_dao::ProjectDao;

/// 表结构
///
/// 小数列以 TEXT 存储，避免 SQLite 数值亲和性把 "10.50" 转成 10.5。
/// 删除项目时，材料、步骤与分类关联由外键级联删除。
const SCHEMA_SQL: &str = "
    -- 项目表
    CREATE TABLE IF NOT EXISTS project (
        project_id INTEGER PRIMARY KEY AUTOINCREMENT,
        project_name TEXT NOT NULL,
        estimated_hours TEXT,
        actual_hours TEXT,
        difficulty INTEGER,
        notes TEXT
    );

    -- 分类表
    CREATE TABLE IF NOT EXISTS category (
        category_id INTEGER PRIMARY KEY AUTOINCREMENT,
        category_name TEXT NOT NULL UNIQUE
    );

    -- 材料表
    CREATE TABLE IF NOT EXISTS material (
        material_id INTEGER PRIMARY KEY AUTOINCREMENT,
        project_id INTEGER NOT NULL,
        material_name TEXT NOT NULL,
        num_required INTEGER,
        cost TEXT,
        FOREIGN KEY (project_id) REFERENCES project(project_id) ON DELETE CASCADE
    );

    -- 步骤表
    CREATE TABLE IF NOT EXISTS step (
        step_id INTEGER PRIMARY KEY AUTOINCREMENT,
        project_id INTEGER NOT NULL,
        step_text TEXT NOT NULL,
        step_order INTEGER NOT NULL,
        FOREIGN KEY (project_id) REFERENCES project(project_id) ON DELETE CASCADE
    );

    -- 项目-分类关联表（多对多）
    CREATE TABLE IF NOT EXISTS project_category (
        project_id INTEGER NOT NULL,
        category_id INTEGER NOT NULL,
        PRIMARY KEY (project_id, category_id),
        FOREIGN KEY (project_id) REFERENCES project(project_id) ON DELETE CASCADE,
        FOREIGN KEY (category_id) REFERENCES category(category_id) ON DELETE CASCADE
    );
";

// ============================================================================
// 连接提供者
// ============================================================================

/// 按固定配置为每次操作打开一个新连接
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    config: DatabaseConfig,
}

impl ConnectionProvider {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// 打开一个新的数据库连接并启用外键约束
    ///
    /// 不会创建数据目录；目录或文件无法打开时返回 `ConnectionError`。
    pub fn get_connection(&self) -> AppResult<Connection> {
        let db_path = self.config.database_path();

        let conn = Connection::open(&db_path).map_err(|e| {
            log::error!("无法打开数据库 {}: {}", db_path.display(), e);
            AppError::ConnectionError(e)
        })?;

        // SQLite 默认关闭外键支持，级联删除依赖它
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(AppError::ConnectionError)?;

        log::debug!("数据库连接成功：{}", db_path.display());
        Ok(conn)
    }

    /// 首次运行时创建数据目录和表（已存在则跳过）
    pub fn init_schema(&self) -> AppResult<()> {
        std::fs::create_dir_all(&self.config.data_dir)?;

        let mut conn = self.get_connection()?;
        in_transaction(&mut conn, |tx| tx.execute_batch(SCHEMA_SQL))?;

        log::info!("数据库表结构就绪：{}", self.config.database_path().display());
        Ok(())
    }
}

// ============================================================================
// 事务边界
// ============================================================================

/// 在显式事务中执行 `op`
///
/// 成功则提交；`op` 返回错误时先回滚再以 `PersistenceError` 向上传递。
pub fn in_transaction<T, F>(conn: &mut Connection, op: F) -> AppResult<T>
where
    F: FnOnce(&Transaction<'_>) -> rusqlite::Result<T>,
{
    let tx = conn.transaction().map_err(AppError::PersistenceError)?;
    log::debug!("事务开始");

    match op(&tx) {
        Ok(value) => {
            tx.commit().map_err(AppError::PersistenceError)?;
            log::debug!("事务已提交");
            Ok(value)
        }
        Err(e) => {
            log::warn!("SQL 执行失败，回滚事务：{}", e);
            if let Err(rollback_err) = tx.rollback() {
                log::error!("事务回滚失败：{}", rollback_err);
            }
            Err(AppError::PersistenceError(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn provider_in(dir: &TempDir) -> ConnectionProvider {
        ConnectionProvider::new(DatabaseConfig::new(dir.path(), "projects"))
    }

    #[test]
    fn test_init_schema_creates_file_and_tables() {
        let dir = TempDir::new().unwrap();
        let provider = provider_in(&dir);
        provider.init_schema().unwrap();

        assert!(dir.path().join("projects.db").exists());

        let conn = provider.get_connection().unwrap();
        let table_names: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert_eq!(
            table_names,
            vec!["category", "material", "project", "project_category", "step"]
        );
    }

    #[test]
    fn test_init_schema_idempotent() {
        let dir = TempDir::new().unwrap();
        let provider = provider_in(&dir);
        provider.init_schema().unwrap();
        provider.init_schema().unwrap();
    }

    #[test]
    fn test_init_schema_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let provider = ConnectionProvider::new(DatabaseConfig::new(&nested, "projects"));

        provider.init_schema().unwrap();
        assert!(nested.join("projects.db").exists());
    }

    #[test]
    fn test_connection_enables_foreign_keys() {
        let dir = TempDir::new().unwrap();
        let provider = provider_in(&dir);

        let conn = provider.get_connection().unwrap();
        let fk_enabled: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk_enabled, 1);
    }

    #[test]
    fn test_connection_error_when_directory_missing() {
        let dir = TempDir::new().unwrap();
        let provider = ConnectionProvider::new(DatabaseConfig::new(
            dir.path().join("does").join("not").join("exist"),
            "projects",
        ));

        let err = provider.get_connection().unwrap_err();
        assert!(matches!(err, AppError::ConnectionError(_)));
    }

    #[test]
    fn test_in_transaction_commits_on_success() {
        let dir = TempDir::new().unwrap();
        let provider = provider_in(&dir);
        provider.init_schema().unwrap();

        let mut conn = provider.get_connection().unwrap();
        in_transaction(&mut conn, |tx| {
            tx.execute("INSERT INTO category (category_name) VALUES ('Garden')", [])
        })
        .unwrap();

        let count: i64 = provider
            .get_connection()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM category", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_in_transaction_rolls_back_on_error() {
        let dir = TempDir::new().unwrap();
        let provider = provider_in(&dir);
        provider.init_schema().unwrap();

        let mut conn = provider.get_connection().unwrap();
        let err = in_transaction(&mut conn, |tx| {
            tx.execute("INSERT INTO category (category_name) VALUES ('Garden')", [])?;
            // 违反 UNIQUE 约束
            tx.execute("INSERT INTO category (category_name) VALUES ('Garden')", [])
        })
        .unwrap_err();
        assert!(matches!(err, AppError::PersistenceError(_)));

        let count: i64 = provider
            .get_connection()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM category", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
