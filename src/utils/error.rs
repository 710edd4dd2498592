// ============================================================================
// 统一错误类型定义
// 使用 thiserror 派生宏，底层驱动错误通过 #[source] 保留
// ============================================================================

use thiserror::Error;

/// 应用统一错误枚举
///
/// 数据访问层只产生 `ConnectionError` / `PersistenceError`，
/// `NotFoundError` 只由业务层根据"影响行数为 0 / 查询为空"转换得到。
#[derive(Debug, Error)]
pub enum AppError {
    /// 无法建立数据库连接（数据库文件无法打开等）
    #[error("数据库连接失败：{0}")]
    ConnectionError(#[source] rusqlite::Error),

    /// SQL 执行失败，事务已回滚
    #[error("数据库操作失败：{0}")]
    PersistenceError(#[source] rusqlite::Error),

    /// 按 ID 操作的项目不存在
    #[error("Project with id={0} does not exist")]
    NotFoundError(i64),

    /// 输入类型转换失败，或提交了尚未持久化的项目
    #[error("验证失败：{0}")]
    ValidationError(String),

    /// 文件系统 IO 错误（如数据目录创建失败）
    #[error("IO 错误：{0}")]
    IoError(#[from] std::io::Error),

    /// 终端输入读取失败
    #[error("输入读取失败：{0}")]
    InputError(String),
}

/// 便捷类型别名，统一项目内的 Result 签名
pub type AppResult<T> = Result<T, AppError>;

impl From<rustyline::error::ReadlineError> for AppError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        AppError::InputError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_not_found_message() {
        let err = AppError::NotFoundError(42);
        assert_eq!(err.to_string(), "Project with id=42 does not exist");
    }

    #[test]
    fn test_persistence_error_keeps_source() {
        let err = AppError::PersistenceError(rusqlite::Error::QueryReturnedNoRows);
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("数据库操作失败："));
    }
}
