//! 开放题解析服务 - 业务能力层
//!
//! 第二部分先跳过说明文字，再按 `1. ` / `10. ` 切块

use crate::error::{AppError, AppResult};
use crate::models::{pad_number, OpenBlock, QuestionKind, SkipReason, SkippedQuestion};
use crate::utils::text::{collapse_blank_lines, collapse_whitespace, split_before};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{info, warn};

static BLOCK_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{1,2}\.\s").unwrap());
static BLOCK_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(\d{1,2})\.\s*(.+)").unwrap());

/// 开放题解析服务
#[derive(Debug, Default)]
pub struct OpenParser {
    intro: Option<Regex>,
    repair_zero_number: bool,
}

impl OpenParser {
    /// 创建解析器
    ///
    /// # 参数
    /// - `intro`: 说明文字的模式，匹配结束处为第一道开放题
    /// - `repair_zero_number`: 是否把题号 "0" 修正为 "10"
    pub fn new(intro: Option<&str>, repair_zero_number: bool) -> AppResult<Self> {
        let intro = intro
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .dot_matches_new_line(true)
                    .build()
                    .map_err(|e| AppError::invalid_pattern(pattern, e))
            })
            .transpose()?;

        Ok(Self {
            intro,
            repair_zero_number,
        })
    }

    /// 惰性解析第二部分文本
    pub fn parse(&self, part_two: &str) -> OpenBlocks {
        let body = match &self.intro {
            Some(intro) => match intro.find(part_two) {
                Some(m) => &part_two[m.end()..],
                None => {
                    warn!("⚠️ 未找到第二部分的说明文字，跳过开放题");
                    ""
                }
            },
            None => part_two,
        };

        let body = collapse_blank_lines(body);
        let pieces: Vec<String> = split_before(&body, &BLOCK_START)
            .into_iter()
            .map(|piece| piece.trim().to_string())
            .filter(|piece| !piece.is_empty())
            .collect();

        OpenBlocks {
            pieces: pieces.into_iter(),
            repair_zero_number: self.repair_zero_number,
            seen: HashSet::new(),
            skipped: Vec::new(),
        }
    }
}

/// 开放题迭代器
pub struct OpenBlocks {
    pieces: std::vec::IntoIter<String>,
    repair_zero_number: bool,
    seen: HashSet<String>,
    skipped: Vec<SkippedQuestion>,
}

impl OpenBlocks {
    pub fn skipped(&self) -> &[SkippedQuestion] {
        &self.skipped
    }

    pub fn into_skipped(self) -> Vec<SkippedQuestion> {
        self.skipped
    }
}

impl Iterator for OpenBlocks {
    type Item = OpenBlock;

    fn next(&mut self) -> Option<OpenBlock> {
        for piece in self.pieces.by_ref() {
            let Some(caps) = BLOCK_HEADER.captures(&piece) else {
                continue;
            };

            let mut number = caps[1].to_string();
            if self.repair_zero_number && number == "0" {
                info!("🔧 题号 0 修正为 10");
                number = "10".to_string();
            }
            let number = pad_number(&number);
            let stem = collapse_whitespace(&caps[2]);

            if !self.seen.insert(number.clone()) {
                warn!("⏭ 跳过开放题 {}: {}", number, SkipReason::DuplicateNumber);
                self.skipped.push(SkippedQuestion {
                    kind: QuestionKind::Open,
                    number,
                    reason: SkipReason::DuplicateNumber,
                    stem,
                });
                continue;
            }

            return Some(OpenBlock { number, stem });
        }
        None
    }
}
