//! 考试处理上下文
//!
//! 封装"我正在处理第几场考试、哪个科目"这一信息

use std::fmt::Display;

use crate::models::Subject;

/// 考试处理上下文
#[derive(Debug, Clone)]
pub struct ExamCtx {
    /// 考试索引（仅用于日志显示，从1开始）
    pub exam_index: usize,

    /// 考试名称
    pub name: String,

    pub subject: Subject,
}

impl ExamCtx {
    /// 创建新的考试上下文
    pub fn new(exam_index: usize, name: impl Into<String>, subject: Subject) -> Self {
        Self {
            exam_index,
            name: name.into(),
            subject,
        }
    }
}

impl Display for ExamCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[考试 #{} {} {}]",
            self.exam_index, self.name, self.subject
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let ctx = ExamCtx::new(2, "chemija-2017", Subject::Chemistry);
        assert_eq!(ctx.to_string(), "[考试 #2 chemija-2017 Chemija]");
    }
}
