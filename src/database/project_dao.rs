// ============================================================================
// 项目数据访问层
// 每个操作：获取连接 → 开启事务 → 执行参数化 SQL → 提交（失败则回滚）
// "不存在"以 Option / bool 表达，不在本层抛错
// ============================================================================

use rusqlite::types::{Type, ValueRef};
use rusqlite::{named_params, params, OptionalExtension, Row, Transaction};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::{in_transaction, ConnectionProvider};
use crate::models::{normalize_decimal, Category, Material, Project, Step};
use crate::utils::error::AppResult;

const CATEGORY_TABLE: &str = "category";
const MATERIAL_TABLE: &str = "material";
const PROJECT_TABLE: &str = "project";
const PROJECT_CATEGORY_TABLE: &str = "project_category";
const STEP_TABLE: &str = "step";

/// 项目数据访问对象
#[derive(Debug, Clone)]
pub struct ProjectDao {
    provider: ConnectionProvider,
}

impl ProjectDao {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    // ========================================================================
    // 写操作
    // ========================================================================

    /// 插入项目，返回带有数据库生成 ID 的实体
    ///
    /// 小数字段在写入前规范化为两位小数，返回值与落库的行一致。
    pub fn insert_project(&self, project: Project) -> AppResult<Project> {
        let sql = format!(
            "INSERT INTO {PROJECT_TABLE} \
             (project_name, estimated_hours, actual_hours, difficulty, notes) \
             VALUES (:name, :estimated_hours, :actual_hours, :difficulty, :notes)"
        );

        let mut project = project;
        project.estimated_hours = project.estimated_hours.map(normalize_decimal);
        project.actual_hours = project.actual_hours.map(normalize_decimal);

        let mut conn = self.provider.get_connection()?;
        let id = in_transaction(&mut conn, |tx| {
            tx.execute(
                &sql,
                named_params! {
                    ":name": project.name,
                    ":estimated_hours": decimal_param(project.estimated_hours),
                    ":actual_hours": decimal_param(project.actual_hours),
                    ":difficulty": project.difficulty,
                    ":notes": project.notes,
                },
            )?;
            Ok(tx.last_insert_rowid())
        })?;

        log::info!("项目已创建：id={}, name={}", id, project.name);
        Ok(project.with_id(id))
    }

    /// 按 ID 整体更新项目的可变列
    ///
    /// 恰好影响一行时返回 `true`；`false` 表示 ID 不存在。
    /// 从未持久化的项目（无 ID）不会访问数据库，直接返回 `false`。
    pub fn modify_project_details(&self, project: &Project) -> AppResult<bool> {
        let Some(id) = project.id() else {
            return Ok(false);
        };

        let sql = format!(
            "UPDATE {PROJECT_TABLE} SET \
             project_name = :name, \
             estimated_hours = :estimated_hours, \
             actual_hours = :actual_hours, \
             difficulty = :difficulty, \
             notes = :notes \
             WHERE project_id = :id"
        );

        let mut conn = self.provider.get_connection()?;
        let rows_affected = in_transaction(&mut conn, |tx| {
            tx.execute(
                &sql,
                named_params! {
                    ":name": project.name,
                    ":estimated_hours": decimal_param(project.estimated_hours.map(normalize_decimal)),
                    ":actual_hours": decimal_param(project.actual_hours.map(normalize_decimal)),
                    ":difficulty": project.difficulty,
                    ":notes": project.notes,
                    ":id": id,
                },
            )
        })?;

        log::debug!("更新项目 id={}，影响行数 {}", id, rows_affected);
        Ok(rows_affected == 1)
    }

    /// 按 ID 删除项目
    ///
    /// 材料、步骤与分类关联由外键 ON DELETE CASCADE 清理。
    /// 恰好影响一行时返回 `true`。
    pub fn delete_project(&self, project_id: i64) -> AppResult<bool> {
        let sql = format!("DELETE FROM {PROJECT_TABLE} WHERE project_id = ?1");

        let mut conn = self.provider.get_connection()?;
        let rows_affected =
            in_transaction(&mut conn, |tx| tx.execute(&sql, params![project_id]))?;

        log::debug!("删除项目 id={}，影响行数 {}", project_id, rows_affected);
        Ok(rows_affected == 1)
    }

    // ========================================================================
    // 读操作
    // ========================================================================

    /// 查询所有项目，按名称升序
    ///
    /// 列表只包含项目自身的列，材料、步骤、分类保持为空。
    pub fn fetch_all_projects(&self) -> AppResult<Vec<Project>> {
        let sql = format!("SELECT * FROM {PROJECT_TABLE} ORDER BY project_name");

        let mut conn = self.provider.get_connection()?;
        in_transaction(&mut conn, |tx| {
            let mut stmt = tx.prepare(&sql)?;
            let projects = stmt
                .query_map([], project_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(projects)
        })
    }

    /// 按 ID 查询项目，并在同一事务内加载材料、步骤和分类
    ///
    /// ID 不存在时返回 `Ok(None)`，由调用方决定如何处理。
    pub fn fetch_project_by_id(&self, project_id: i64) -> AppResult<Option<Project>> {
        let sql = format!("SELECT * FROM {PROJECT_TABLE} WHERE project_id = ?1");

        let mut conn = self.provider.get_connection()?;
        in_transaction(&mut conn, |tx| {
            let project = tx
                .query_row(&sql, params![project_id], project_from_row)
                .optional()?;

            let Some(mut project) = project else {
                return Ok(None);
            };

            project.materials = fetch_project_materials(tx, project_id)?;
            project.steps = fetch_project_steps(tx, project_id)?;
            project.categories = fetch_project_categories(tx, project_id)?;

            Ok(Some(project))
        })
    }
}

// ============================================================================
// 关联数据查询（复用调用方的事务）
// ============================================================================

fn fetch_project_materials(
    tx: &Transaction<'_>,
    project_id: i64,
) -> rusqlite::Result<Vec<Material>> {
    let sql = format!(
        "SELECT m.* FROM {MATERIAL_TABLE} m WHERE m.project_id = ?1 ORDER BY m.material_id"
    );

    let mut stmt = tx.prepare(&sql)?;
    let materials = stmt
        .query_map(params![project_id], material_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(materials)
}

fn fetch_project_steps(tx: &Transaction<'_>, project_id: i64) -> rusqlite::Result<Vec<Step>> {
    let sql = format!(
        "SELECT s.* FROM {STEP_TABLE} s WHERE s.project_id = ?1 ORDER BY s.step_order, s.step_id"
    );

    let mut stmt = tx.prepare(&sql)?;
    let steps = stmt
        .query_map(params![project_id], step_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(steps)
}

fn fetch_project_categories(
    tx: &Transaction<'_>,
    project_id: i64,
) -> rusqlite::Result<Vec<Category>> {
    let sql = format!(
        "SELECT c.* FROM {CATEGORY_TABLE} c \
         JOIN {PROJECT_CATEGORY_TABLE} pc USING (category_id) \
         WHERE pc.project_id = ?1 \
         ORDER BY c.category_name"
    );

    let mut stmt = tx.prepare(&sql)?;
    let categories = stmt
        .query_map(params![project_id], category_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(categories)
}

// ============================================================================
// 行 → 实体映射（按列名读取）
// ============================================================================

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    let id: i64 = row.get("project_id")?;
    let mut project = Project::new(row.get::<_, String>("project_name")?).with_id(id);
    project.estimated_hours = decimal_column(row, "estimated_hours")?;
    project.actual_hours = decimal_column(row, "actual_hours")?;
    project.difficulty = row.get("difficulty")?;
    project.notes = row.get("notes")?;
    Ok(project)
}

fn material_from_row(row: &Row<'_>) -> rusqlite::Result<Material> {
    Ok(Material {
        id: row.get("material_id")?,
        project_id: row.get("project_id")?,
        name: row.get("material_name")?,
        num_required: row.get("num_required")?,
        cost: decimal_column(row, "cost")?,
    })
}

fn step_from_row(row: &Row<'_>) -> rusqlite::Result<Step> {
    Ok(Step {
        id: row.get("step_id")?,
        project_id: row.get("project_id")?,
        text: row.get("step_text")?,
        order: row.get("step_order")?,
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get("category_id")?,
        name: row.get("category_name")?,
    })
}

// ============================================================================
// 小数列读写
// ============================================================================

/// 小数以规范化后的文本写入，如 "10.50"
fn decimal_param(value: Option<Decimal>) -> Option<String> {
    value.map(|d| d.to_string())
}

/// 读取小数列并规范化为两位小数
///
/// 兼容外部写入的 INTEGER / REAL 值。
fn decimal_column(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<Decimal>> {
    let idx = row.as_ref().column_index(column)?;

    let conversion_error = |err: Box<dyn std::error::Error + Send + Sync>| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, err)
    };

    let value = match row.get_ref(idx)? {
        ValueRef::Null => return Ok(None),
        ValueRef::Integer(i) => Decimal::from(i),
        ValueRef::Real(f) => Decimal::try_from(f).map_err(|e| conversion_error(e.into()))?,
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|e| conversion_error(e.into()))?;
            Decimal::from_str(text.trim()).map_err(|e| conversion_error(e.into()))?
        }
        ValueRef::Blob(_) => {
            return Err(rusqlite::Error::InvalidColumnType(
                idx,
                column.to_string(),
                Type::Blob,
            ));
        }
    };

    Ok(Some(normalize_decimal(value)))
}
