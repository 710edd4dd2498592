// 控制台入口：初始化日志后启动菜单

use tracing_subscriber::EnvFilter;

fn main() {
    // log 记录经 tracing-log 桥接输出，默认只显示 warn 及以上
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = projects_console::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
