//! 警告写入服务 - 业务能力层
//!
//! 只负责"写 warn.txt"能力，不关心流程

use crate::models::SkippedQuestion;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

/// 警告写入服务
///
/// 职责：
/// - 将被跳过的题目写入 warn.txt，供人工复查
/// - 只处理单个题目的警告
/// - 不关心流程顺序
pub struct WarnWriter {
    warn_file_path: String,
}

impl WarnWriter {
    /// 使用指定文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    /// 写入警告信息
    ///
    /// # 参数
    /// - `exam`: 考试名称
    /// - `skipped`: 被跳过的题目
    pub async fn write(&self, exam: &str, skipped: &SkippedQuestion) -> Result<()> {
        debug!(
            "写入警告: 考试 {} | {} {} | 题干长度: {}",
            exam,
            skipped.kind,
            skipped.number,
            skipped.stem.len()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)
            .with_context(|| format!("无法打开警告文件 {}", self.warn_file_path))?;

        let warn_msg = format!(
            "考试 {} | {} {} | {} | 题干: {}\n",
            exam, skipped.kind, skipped.number, skipped.reason, skipped.stem
        );

        file.write_all(warn_msg.as_bytes())?;

        Ok(())
    }

    /// 写入一场考试的全部警告
    pub async fn write_all(&self, exam: &str, skipped: &[SkippedQuestion]) -> Result<()> {
        for item in skipped {
            self.write(exam, item).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QuestionKind, SkipReason};

    #[test]
    fn test_write_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warn.txt");
        let writer = WarnWriter::with_path(path.display().to_string());
        let skipped = SkippedQuestion {
            kind: QuestionKind::Mcq,
            number: "07".into(),
            reason: SkipReason::MissingOptions { found: 3 },
            stem: "Kuri medžiaga?".into(),
        };

        tokio_test::block_on(writer.write_all("chemija-2017", &[skipped.clone(), skipped])).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("chemija-2017"));
        assert!(content.contains("07"));
        assert!(content.contains("Kuri medžiaga?"));
    }
}
