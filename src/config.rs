// ============================================================================
// 配置：数据库位置
// 默认值可通过环境变量覆盖，便于在不同机器或测试中切换数据文件
// ============================================================================

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
}

/// 数据库配置
///
/// 数据库文件位于 `<data_dir>/<schema>.db`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 数据目录（默认 "data"）
    pub data_dir: PathBuf,
    /// 库名，同时作为数据库文件名（默认 "projects"）
    pub schema: String,
}

impl DatabaseConfig {
    pub fn new(data_dir: impl Into<PathBuf>, schema: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            schema: schema.into(),
        }
    }

    /// 数据库文件完整路径
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.db", self.schema))
    }
}

impl Default for DatabaseConfig {
    /// 读取 PROJECTS_DATA_DIR / PROJECTS_SCHEMA，未设置时使用默认值
    fn default() -> Self {
        Self {
            data_dir: std::env::var("PROJECTS_DATA_DIR")
                .unwrap_or_else(|_| "data".to_string())
                .into(),
            schema: std::env::var("PROJECTS_SCHEMA").unwrap_or_else(|_| "projects".to_string()),
        }
    }
}
