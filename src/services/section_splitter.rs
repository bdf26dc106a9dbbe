//! 分节服务 - 业务能力层
//!
//! 在 "II dalis" 标记处把试卷切成选择题部分和开放题部分

use crate::error::{AppError, AppResult};
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// 分节结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections<'a> {
    /// 第一部分（选择题）
    pub part_one: &'a str,
    /// 第二部分，从标记处开始；找不到标记时为空
    pub part_two: &'a str,
    pub marker_found: bool,
}

/// 分节服务
#[derive(Debug)]
pub struct SectionSplitter {
    marker: Regex,
}

impl SectionSplitter {
    /// 创建分节服务，标记不区分大小写
    pub fn new(marker_pattern: &str) -> AppResult<Self> {
        let marker = RegexBuilder::new(marker_pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::invalid_pattern(marker_pattern, e))?;
        Ok(Self { marker })
    }

    /// 切分文本
    ///
    /// 找不到标记时整篇作为第一部分，并记录警告
    pub fn split<'a>(&self, text: &'a str) -> Sections<'a> {
        match self.marker.find(text) {
            Some(m) => Sections {
                part_one: &text[..m.start()],
                part_two: &text[m.start()..],
                marker_found: true,
            },
            None => {
                warn!("⚠️ 未找到分节标记 `{}`，整篇按第一部分处理", self.marker.as_str());
                Sections {
                    part_one: text,
                    part_two: "",
                    marker_found: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_at_marker_case_insensitive() {
        let splitter = SectionSplitter::new(r"\bII dalis\b").unwrap();
        let sections = splitter.split("01. Kas?\nA x\nII DALIS\n1. Paaiškinkite.");
        assert!(sections.marker_found);
        assert_eq!(sections.part_one, "01. Kas?\nA x\n");
        assert_eq!(sections.part_two, "II DALIS\n1. Paaiškinkite.");
    }

    #[test]
    fn test_missing_marker_degrades_to_part_one() {
        let splitter = SectionSplitter::new(r"\bII dalis\b").unwrap();
        let sections = splitter.split("01. Kas?\nA x");
        assert!(!sections.marker_found);
        assert_eq!(sections.part_one, "01. Kas?\nA x");
        assert_eq!(sections.part_two, "");
    }

    #[test]
    fn test_marker_needs_word_boundary() {
        let splitter = SectionSplitter::new(r"\bII dalis\b").unwrap();
        assert!(!splitter.split("III dalis").marker_found);
    }
}
