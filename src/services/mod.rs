// ============================================================================
// 业务层：在数据访问层之上把"不存在"转换为领域错误
// ✅ 特点：不依赖终端 IO，方便写 #[test]
// ⛔ 禁止：在这里拼 SQL 或打印输出
// ============================================================================

pub mod project_service;

pub use project_service::ProjectService;
