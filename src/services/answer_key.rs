//! 答案解析服务 - 业务能力层
//!
//! 答案 PDF 第一页：I 部分是一串 A–D 字母，按顺序对应 01、02…；
//! II 部分是 `题号 答案` 的文字块。不分节的答案页整页都是字母

use crate::error::AppResult;
use crate::models::{pad_number, AnswerKey, AnswerKeyProfile};
use crate::services::noise_stripper::NoiseStripper;
use crate::services::section_splitter::{SectionSplitter, Sections};
use crate::utils::text::{collapse_whitespace, split_before};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{info, warn};

static MCQ_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b([ABCD])\b").unwrap());
static OPEN_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\d{1,2}\s").unwrap());
static OPEN_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(\d{1,2})\s+(.+)").unwrap());

/// 答案解析服务
pub struct AnswerKeyResolver {
    splitter: Option<SectionSplitter>,
    stripper: NoiseStripper,
    mcq_count: usize,
}

impl AnswerKeyResolver {
    pub fn new(profile: &AnswerKeyProfile) -> AppResult<Self> {
        Ok(Self {
            splitter: profile
                .split_sections
                .then(|| SectionSplitter::new(&profile.section_marker))
                .transpose()?,
            stripper: NoiseStripper::new(&profile.noise_rules)?,
            mcq_count: profile.mcq_count,
        })
    }

    /// 解析答案文本
    ///
    /// # 返回
    /// 选择题字母表和开放题答案表，键均为两位题号
    pub fn resolve(&self, text: &str) -> AnswerKey {
        let sections = match &self.splitter {
            Some(splitter) => splitter.split(text),
            None => Sections {
                part_one: text,
                part_two: "",
                marker_found: false,
            },
        };

        let letters: Vec<char> = MCQ_LETTER
            .captures_iter(sections.part_one)
            .filter_map(|caps| caps[1].chars().next())
            .take(self.mcq_count)
            .collect();

        if letters.len() < self.mcq_count {
            warn!(
                "⚠️ 只找到 {} 个选择题答案（应为 {} 个）",
                letters.len(),
                self.mcq_count
            );
        }

        let mcq = letters
            .into_iter()
            .enumerate()
            .map(|(i, letter)| (format!("{:02}", i + 1), letter))
            .collect();

        let part_two = self.stripper.strip(sections.part_two);
        let mut key = AnswerKey {
            mcq,
            ..Default::default()
        };

        for piece in split_before(&part_two, &OPEN_START) {
            let Some(caps) = OPEN_ENTRY.captures(piece.trim()) else {
                continue;
            };
            key.open
                .insert(pad_number(&caps[1]), collapse_whitespace(&caps[2]));
        }

        info!(
            "🔑 答案表: {} 个选择题答案, {} 个开放题答案",
            key.mcq.len(),
            key.open.len()
        );

        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoiseRule;

    #[test]
    fn test_unsplit_page_reads_letters_past_marker() {
        let resolver = AnswerKeyResolver::new(&AnswerKeyProfile {
            mcq_count: 3,
            split_sections: false,
            ..Default::default()
        })
        .unwrap();

        let key = resolver.resolve("1 A\n2 C\nII dalis\n3 D");
        assert_eq!(key.correct_letter("03"), Some('D'));
        assert!(key.open.is_empty());
    }

    fn resolver(mcq_count: usize, noise_rules: Vec<NoiseRule>) -> AnswerKeyResolver {
        AnswerKeyResolver::new(&AnswerKeyProfile {
            mcq_count,
            noise_rules,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_mcq_letters_numbered_in_order() {
        let key = resolver(4, vec![]).resolve("I DALIS\n1 C\n2 A\n3 D\n4 B\n5 A");
        assert_eq!(key.mcq.len(), 4);
        assert_eq!(key.correct_letter("01"), Some('C'));
        assert_eq!(key.correct_letter("04"), Some('B'));
        assert_eq!(key.correct_letter("05"), None);
    }

    #[test]
    fn test_fewer_letters_than_expected() {
        let key = resolver(30, vec![]).resolve("1 A 2 B");
        assert_eq!(key.mcq.len(), 2);
    }

    #[test]
    fn test_open_answers_after_marker() {
        let text = "1 C\nII DALIS\n1 Vertinami ir kiti teisingi atsakymai. \n3 Nes\nvyksta reakcija\n10 Because Y.";
        let key = resolver(1, vec![NoiseRule::literal("1 Vertinami ir kiti teisingi atsakymai. ")])
            .resolve(text);

        assert_eq!(key.correct_letter("01"), Some('C'));
        assert_eq!(key.open_answer("03"), Some("Nes vyksta reakcija"));
        assert_eq!(key.open_answer("10"), Some("Because Y."));
        assert_eq!(key.open_answer("01"), None);
    }

    #[test]
    fn test_letters_after_marker_are_not_mcq() {
        let key = resolver(30, vec![]).resolve("1 A\nII dalis\n2 B atsakymas");
        assert_eq!(key.mcq.len(), 1);
    }
}
