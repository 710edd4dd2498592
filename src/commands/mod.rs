// ============================================================================
// 控制台交互层
// 作为用户与业务层之间的薄接口层，仅负责：
// 1. 读取并转换用户输入
// 2. 调用 ProjectService
// 3. 打印结果或错误
// ⛔ 禁止：直接访问数据库
// ============================================================================

pub mod input;
pub mod menu;

pub use input::{Prompt, RustylinePrompt};
pub use menu::ProjectsApp;
