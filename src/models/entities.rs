// ============================================================================
// 实体定义
// 与数据库表一一对应的内存记录，仅包含字段、构造和展示
// ⛔ 禁止：包含 SQL 或业务逻辑
// ============================================================================

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 小数字段统一保留的位数（对应 DECIMAL(7,2)）
pub const DECIMAL_SCALE: u32 = 2;

/// 将小数规范化为两位小数：先四舍五入，再补齐到固定精度
///
/// `3.1` → `3.10`，`10.555` → `10.56`
pub fn normalize_decimal(value: Decimal) -> Decimal {
    let mut normalized =
        value.round_dp_with_strategy(DECIMAL_SCALE, RoundingStrategy::MidpointAwayFromZero);
    normalized.rescale(DECIMAL_SCALE);
    normalized
}

/// 项目
///
/// `id` 由数据库在插入时生成，之后不可修改，因此不对外暴露写入口。
/// `materials` / `steps` / `categories` 只有按 ID 查询时才会被填充。
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Project {
    id: Option<i64>,
    pub name: String,
    pub estimated_hours: Option<Decimal>,
    pub actual_hours: Option<Decimal>,
    /// 难度 1-5
    pub difficulty: Option<i32>,
    pub notes: Option<String>,
    pub materials: Vec<Material>,
    pub steps: Vec<Step>,
    pub categories: Vec<Category>,
}

impl Project {
    /// 创建一个尚未持久化的项目
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 数据库生成的 ID，未插入前为 `None`
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// 仅供数据访问层在插入或读取行之后设置
    pub(crate) fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id.map_or_else(|| "-".to_string(), |id| id.to_string());
        writeln!(f, "   ID={}", id)?;
        writeln!(f, "   name={}", self.name)?;
        writeln!(f, "   estimatedHours={}", display_opt(&self.estimated_hours))?;
        writeln!(f, "   actualHours={}", display_opt(&self.actual_hours))?;
        writeln!(f, "   difficulty={}", display_opt(&self.difficulty))?;
        write!(f, "   notes={}", display_opt(&self.notes))?;

        if !self.materials.is_empty() {
            write!(f, "\n   Materials:")?;
            for material in &self.materials {
                write!(f, "\n      {}", material)?;
            }
        }

        if !self.steps.is_empty() {
            write!(f, "\n   Steps:")?;
            for step in &self.steps {
                write!(f, "\n      {}", step)?;
            }
        }

        if !self.categories.is_empty() {
            write!(f, "\n   Categories:")?;
            for category in &self.categories {
                write!(f, "\n      {}", category)?;
            }
        }

        Ok(())
    }
}

/// 项目分类，通过 project_category 与项目多对多关联
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID={}, name={}", self.id, self.name)
    }
}

/// 项目所需材料
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Material {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub num_required: Option<i32>,
    pub cost: Option<Decimal>,
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID={}, name={}, numRequired={}, cost={}",
            self.id,
            self.name,
            display_opt(&self.num_required),
            display_opt(&self.cost)
        )
    }
}

/// 项目步骤
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Step {
    pub id: i64,
    pub project_id: i64,
    pub text: String,
    pub order: i32,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID={}, order={}, text={}", self.id, self.order, self.text)
    }
}

fn display_opt<T: fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "null".to_string(),
    }
}
