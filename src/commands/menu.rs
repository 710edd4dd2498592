// ============================================================================
// 主菜单循环
// 当前选中的项目只保存在这里，业务层本身无状态
// ============================================================================

use crate::commands::input::{read_decimal, read_i32, read_int, read_string, Prompt};
use crate::models::Project;
use crate::services::ProjectService;
use crate::utils::error::{AppError, AppResult};

/// 菜单项
const OPERATIONS: &[&str] = &[
    "1) 新增项目",
    "2) 列出项目",
    "3) 选择项目",
    "4) 更新当前项目详情",
    "5) 删除项目",
];

/// 控制台应用
pub struct ProjectsApp<P: Prompt> {
    service: ProjectService,
    prompt: P,
    current: Option<Project>,
}

impl<P: Prompt> ProjectsApp<P> {
    pub fn new(service: ProjectService, prompt: P) -> Self {
        Self {
            service,
            prompt,
            current: None,
        }
    }

    /// 当前选中的项目
    pub fn current_project(&self) -> Option<&Project> {
        self.current.as_ref()
    }

    /// 循环处理用户选择，直到输入空行或输入结束
    ///
    /// 单次操作的错误只打印不退出；终端本身无法读取时返回错误。
    pub fn run(&mut self) -> AppResult<()> {
        loop {
            match self.process_next_selection() {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e @ AppError::InputError(_)) => return Err(e),
                Err(e) => {
                    log::debug!("菜单操作失败：{:?}", e);
                    println!("\n错误：{}", e);
                }
            }
        }
    }

    /// 处理一次菜单选择，返回是否退出
    fn process_next_selection(&mut self) -> AppResult<bool> {
        self.print_operations();

        let Some(selection) = read_int(&mut self.prompt, "\n请输入菜单编号")? else {
            println!("\n退出菜单。");
            return Ok(true);
        };

        match selection {
            1 => self.create_project()?,
            2 => self.list_projects()?,
            3 => self.select_project()?,
            4 => self.update_project_details()?,
            5 => self.delete_project()?,
            other => println!("\n{} 不是有效的选项，请重试。", other),
        }

        Ok(false)
    }

    fn create_project(&mut self) -> AppResult<()> {
        let name = read_string(&mut self.prompt, "输入项目名称")?
            .ok_or_else(|| AppError::ValidationError("项目名称不能为空".to_string()))?;

        let mut project = Project::new(name);
        project.estimated_hours = read_decimal(&mut self.prompt, "输入预估工时")?;
        project.actual_hours = read_decimal(&mut self.prompt, "输入实际工时")?;
        project.difficulty = read_i32(&mut self.prompt, "输入项目难度 (1-5)")?;
        project.notes = read_string(&mut self.prompt, "输入项目备注")?;

        let db_project = self.service.add_project(project)?;
        println!("项目创建成功：\n{}", db_project);
        Ok(())
    }

    fn list_projects(&mut self) -> AppResult<()> {
        let projects = self.service.fetch_all_projects()?;

        println!("\n项目列表：");
        for project in &projects {
            if let Some(id) = project.id() {
                println!("   {}: {}", id, project.name);
            }
        }
        Ok(())
    }

    fn select_project(&mut self) -> AppResult<()> {
        self.list_projects()?;
        let Some(project_id) = read_int(&mut self.prompt, "输入要选择的项目 ID")? else {
            println!("\n未选择项目。");
            return Ok(());
        };

        // 查询失败时不保留上一次的选择
        self.current = None;
        self.current = Some(self.service.fetch_project_by_id(project_id)?);
        Ok(())
    }

    /// 逐项提示当前值，空输入保留原值
    fn update_project_details(&mut self) -> AppResult<()> {
        let Some(current) = self.current.as_ref() else {
            println!("\n请先选择一个项目。");
            return Ok(());
        };
        let mut project = current.clone();

        let label = format!("输入项目名称 [{}]", project.name);
        if let Some(name) = read_string(&mut self.prompt, &label)? {
            project.name = name;
        }

        let label = format!("输入预估工时 [{}]", show(&project.estimated_hours));
        if let Some(hours) = read_decimal(&mut self.prompt, &label)? {
            project.estimated_hours = Some(hours);
        }

        let label = format!("输入实际工时 [{}]", show(&project.actual_hours));
        if let Some(hours) = read_decimal(&mut self.prompt, &label)? {
            project.actual_hours = Some(hours);
        }

        let label = format!("输入项目难度 (1-5) [{}]", show(&project.difficulty));
        if let Some(difficulty) = read_i32(&mut self.prompt, &label)? {
            project.difficulty = Some(difficulty);
        }

        let label = format!("输入项目备注 [{}]", show(&project.notes));
        if let Some(notes) = read_string(&mut self.prompt, &label)? {
            project.notes = Some(notes);
        }

        self.service.modify_project_details(&project)?;

        if let Some(project_id) = project.id() {
            self.current = Some(self.service.fetch_project_by_id(project_id)?);
        }
        println!("项目已更新。");
        Ok(())
    }

    fn delete_project(&mut self) -> AppResult<()> {
        self.list_projects()?;
        let Some(project_id) = read_int(&mut self.prompt, "输入要删除的项目 ID")? else {
            println!("\n未删除任何项目。");
            return Ok(());
        };

        self.service.delete_project(project_id)?;
        println!("项目 {} 已删除。", project_id);

        if self.current.as_ref().and_then(Project::id) == Some(project_id) {
            self.current = None;
        }
        Ok(())
    }

    fn print_operations(&self) {
        println!("\n可用操作如下，直接按回车退出：");
        for line in OPERATIONS {
            println!("   {}", line);
        }

        match &self.current {
            Some(project) => println!("\n当前项目：\n{}", project),
            None => println!("\n当前没有选中的项目。"),
        }
    }
}

fn show<T: std::fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map_or_else(String::new, |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::database::{ConnectionProvider, ProjectDao};
    use std::collections::VecDeque;
    use tempfile::TempDir;

    fn setup() -> (ProjectService, TempDir) {
        let dir = TempDir::new().unwrap();
        let provider = ConnectionProvider::new(DatabaseConfig::new(dir.path(), "projects"));
        provider.init_schema().unwrap();
        (ProjectService::new(ProjectDao::new(provider)), dir)
    }

    fn app(service: &ProjectService, lines: &[&str]) -> ProjectsApp<VecDeque<String>> {
        let input = lines.iter().map(|s| s.to_string()).collect();
        ProjectsApp::new(service.clone(), input)
    }

    #[test]
    fn test_blank_input_exits() {
        let (service, _dir) = setup();
        let mut app = app(&service, &[""]);
        app.run().unwrap();
        assert!(app.current_project().is_none());
    }

    #[test]
    fn test_end_of_input_exits() {
        let (service, _dir) = setup();
        let mut app = app(&service, &[]);
        app.run().unwrap();
    }

    #[test]
    fn test_add_then_select_project() {
        let (service, _dir) = setup();
        let mut app = app(
            &service,
            &["1", "Deck", "10.5", "", "3", "build deck", "2", "3", "1", ""],
        );
        app.run().unwrap();

        let current = app.current_project().unwrap();
        assert_eq!(current.id(), Some(1));
        assert_eq!(current.name, "Deck");
        assert_eq!(current.estimated_hours.unwrap().to_string(), "10.50");
        assert_eq!(current.actual_hours, None);
        assert_eq!(current.notes.as_deref(), Some("build deck"));
    }

    #[test]
    fn test_invalid_input_reports_and_continues() {
        let (service, _dir) = setup();
        // 非法菜单编号、非法菜单输入、非法工时，随后仍可正常新增
        let mut app = app(
            &service,
            &["9", "abc", "1", "Shed", "lots", "1", "Shed", "", "", "", "", ""],
        );
        app.run().unwrap();

        let projects = service.fetch_all_projects().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Shed");
        assert_eq!(projects[0].estimated_hours, None);
    }

    #[test]
    fn test_select_missing_project_clears_current() {
        let (service, _dir) = setup();
        service.add_project(Project::new("Deck")).unwrap();

        let mut app = app(&service, &["3", "1", "3", "42", ""]);
        app.run().unwrap();

        assert!(app.current_project().is_none());
    }

    #[test]
    fn test_update_keeps_blank_fields() {
        let (service, _dir) = setup();
        let mut deck = Project::new("Deck");
        deck.difficulty = Some(3);
        deck.notes = Some("build deck".to_string());
        let id = service.add_project(deck).unwrap().id().unwrap();

        let mut app = app(&service, &["3", "1", "4", "", "", "12.333", "4", "", ""]);
        app.run().unwrap();

        let updated = service.fetch_project_by_id(id).unwrap();
        assert_eq!(updated.name, "Deck");
        assert_eq!(updated.estimated_hours, None);
        assert_eq!(updated.actual_hours.unwrap().to_string(), "12.33");
        assert_eq!(updated.difficulty, Some(4));
        assert_eq!(updated.notes.as_deref(), Some("build deck"));
        assert_eq!(app.current_project(), Some(&updated));
    }

    #[test]
    fn test_update_without_selection_does_nothing() {
        let (service, _dir) = setup();
        service.add_project(Project::new("Deck")).unwrap();

        let mut app = app(&service, &["4", ""]);
        app.run().unwrap();

        assert_eq!(service.fetch_project_by_id(1).unwrap().name, "Deck");
    }

    #[test]
    fn test_delete_current_project_clears_selection() {
        let (service, _dir) = setup();
        service.add_project(Project::new("Deck")).unwrap();
        service.add_project(Project::new("Shed")).unwrap();

        let mut app = app(&service, &["3", "1", "5", "1", ""]);
        app.run().unwrap();

        assert!(app.current_project().is_none());
        let names: Vec<String> = service
            .fetch_all_projects()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Shed"]);
    }

    #[test]
    fn test_delete_missing_project_keeps_running() {
        let (service, _dir) = setup();
        service.add_project(Project::new("Deck")).unwrap();

        let mut app = app(&service, &["5", "99", "2", ""]);
        app.run().unwrap();

        assert_eq!(service.fetch_all_projects().unwrap().len(), 1);
    }
}
