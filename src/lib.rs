// ============================================================================
// [总线] 程序的组装车间
// ✅ 只能做：pub mod 暴露子模块、读取配置、组装 Service 并启动菜单
// ⛔ 禁止：直接实现业务逻辑或 SQL
// ============================================================================

pub mod commands;
pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

use commands::{ProjectsApp, RustylinePrompt};
use config::AppConfig;
use database::{ConnectionProvider, ProjectDao};
use services::ProjectService;
use utils::error::AppResult;

// ============================================================================
// 应用入口
// ============================================================================

/// 读取配置、准备数据库并运行控制台菜单
pub fn run() -> AppResult<()> {
    let config = AppConfig::default();
    let provider = ConnectionProvider::new(config.database);

    provider.init_schema()?;
    log::info!(
        "使用数据库：{}",
        provider.config().database_path().display()
    );

    let service = ProjectService::new(ProjectDao::new(provider));
    let prompt = RustylinePrompt::new()?;

    ProjectsApp::new(service, prompt).run()
}
