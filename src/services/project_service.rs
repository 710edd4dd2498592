// ============================================================================
// 项目业务服务
// 透传数据访问层结果；查询为空、影响行数为 0 时返回 NotFoundError
// ============================================================================

use crate::database::ProjectDao;
use crate::models::Project;
use crate::utils::error::{AppError, AppResult};

/// 项目服务
#[derive(Debug, Clone)]
pub struct ProjectService {
    dao: ProjectDao,
}

impl ProjectService {
    pub fn new(dao: ProjectDao) -> Self {
        Self { dao }
    }

    /// 新增项目
    pub fn add_project(&self, project: Project) -> AppResult<Project> {
        self.dao.insert_project(project)
    }

    /// 查询所有项目（按名称升序，不含关联数据）
    pub fn fetch_all_projects(&self) -> AppResult<Vec<Project>> {
        self.dao.fetch_all_projects()
    }

    /// 按 ID 查询项目（含材料、步骤、分类）
    ///
    /// # 返回
    /// - `Err(AppError::NotFoundError)`: ID 不存在
    pub fn fetch_project_by_id(&self, project_id: i64) -> AppResult<Project> {
        self.dao
            .fetch_project_by_id(project_id)?
            .ok_or(AppError::NotFoundError(project_id))
    }

    /// 更新项目详情
    ///
    /// # 返回
    /// - `Err(AppError::ValidationError)`: 项目尚未持久化，没有 ID
    /// - `Err(AppError::NotFoundError)`: ID 对应的行不存在
    pub fn modify_project_details(&self, project: &Project) -> AppResult<()> {
        let project_id = project
            .id()
            .ok_or_else(|| AppError::ValidationError("项目尚未保存，无法更新".to_string()))?;

        if !self.dao.modify_project_details(project)? {
            return Err(AppError::NotFoundError(project_id));
        }

        Ok(())
    }

    /// 删除项目
    ///
    /// # 返回
    /// - `Err(AppError::NotFoundError)`: ID 不存在
    pub fn delete_project(&self, project_id: i64) -> AppResult<()> {
        if !self.dao.delete_project(project_id)? {
            return Err(AppError::NotFoundError(project_id));
        }

        Ok(())
    }
}
