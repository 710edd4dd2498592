// ============================================================================
// 输入读取与类型转换
// 空白输入视为"未填写"（None），其余输入去掉首尾空白后再转换
// ============================================================================

use rust_decimal::Decimal;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::collections::VecDeque;
use std::str::FromStr;

use crate::models::normalize_decimal;
use crate::utils::error::{AppError, AppResult};

/// 行输入来源
///
/// 返回 `Ok(None)` 表示输入结束（如 Ctrl-D）。
pub trait Prompt {
    fn read_line(&mut self, prompt: &str) -> AppResult<Option<String>>;
}

/// 基于 rustyline 的终端输入，支持行编辑和历史记录
pub struct RustylinePrompt {
    editor: DefaultEditor,
}

impl RustylinePrompt {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl Prompt for RustylinePrompt {
    fn read_line(&mut self, prompt: &str) -> AppResult<Option<String>> {
        match self.editor.readline(&format!("{}: ", prompt)) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    // 历史记录写入失败不影响本次输入
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// 预先给定的输入序列，用尽后视为输入结束
impl Prompt for VecDeque<String> {
    fn read_line(&mut self, _prompt: &str) -> AppResult<Option<String>> {
        Ok(self.pop_front())
    }
}

// ============================================================================
// 纯函数转换
// ============================================================================

/// 去掉首尾空白；空白输入返回 None
pub fn parse_string(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 解析整数；空白输入返回 Ok(None)
pub fn parse_int(input: &str) -> AppResult<Option<i64>> {
    let Some(text) = parse_string(input) else {
        return Ok(None);
    };

    text.parse::<i64>()
        .map(Some)
        .map_err(|_| AppError::ValidationError(format!("{} 不是有效的整数，请重试", text)))
}

/// 解析小数并规范化为两位小数；空白输入返回 Ok(None)
pub fn parse_decimal(input: &str) -> AppResult<Option<Decimal>> {
    let Some(text) = parse_string(input) else {
        return Ok(None);
    };

    Decimal::from_str(&text)
        .map(|d| Some(normalize_decimal(d)))
        .map_err(|_| AppError::ValidationError(format!("{} 不是有效的小数", text)))
}

// ============================================================================
// 带提示的读取
// ============================================================================

/// 读取字符串；输入结束或空白均返回 None
pub fn read_string(prompt: &mut dyn Prompt, label: &str) -> AppResult<Option<String>> {
    Ok(prompt.read_line(label)?.as_deref().and_then(parse_string))
}

pub fn read_int(prompt: &mut dyn Prompt, label: &str) -> AppResult<Option<i64>> {
    match prompt.read_line(label)? {
        Some(line) => parse_int(&line),
        None => Ok(None),
    }
}

/// 读取 32 位整数（难度等 INTEGER 列）
pub fn read_i32(prompt: &mut dyn Prompt, label: &str) -> AppResult<Option<i32>> {
    match read_int(prompt, label)? {
        Some(value) => i32::try_from(value)
            .map(Some)
            .map_err(|_| AppError::ValidationError(format!("{} 超出取值范围", value))),
        None => Ok(None),
    }
}

pub fn read_decimal(prompt: &mut dyn Prompt, label: &str) -> AppResult<Option<Decimal>> {
    match prompt.read_line(label)? {
        Some(line) => parse_decimal(&line),
        None => Ok(None),
    }
}
