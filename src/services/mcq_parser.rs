//! 选择题解析服务 - 业务能力层
//!
//! 第一部分按两位题号（`01. `）切块，每块取题干和 A–D 四个选项。
//! 选项不足四个或没有题干的块被丢弃并计数，不影响其他题目

use crate::models::{IncompleteBlock, McqBlock, QuestionKind, SkipReason, SkippedQuestion};
use crate::utils::text::{collapse_whitespace, split_before};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::warn;

static BLOCK_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{2}\.\s").unwrap());
static BLOCK_HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{2})\.\s").unwrap());
static FIRST_OPTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\nA\s").unwrap());
static OPTION_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n([A-D])\s").unwrap());

/// 选择题解析服务
#[derive(Debug, Default)]
pub struct McqParser;

impl McqParser {
    pub fn new() -> Self {
        Self
    }

    /// 惰性解析第一部分文本
    pub fn parse<'a>(&self, part_one: &'a str) -> McqBlocks<'a> {
        McqBlocks {
            pieces: split_before(part_one, &BLOCK_START).into_iter(),
            seen: HashSet::new(),
            skipped: Vec::new(),
            incomplete: Vec::new(),
        }
    }
}

/// 选择题迭代器
///
/// 迭代结束后可通过 [`McqBlocks::skipped`] 取得被跳过的题目
pub struct McqBlocks<'a> {
    pieces: std::vec::IntoIter<&'a str>,
    seen: HashSet<String>,
    skipped: Vec<SkippedQuestion>,
    incomplete: Vec<IncompleteBlock>,
}

impl<'a> McqBlocks<'a> {
    /// 被跳过的题目
    pub fn skipped(&self) -> &[SkippedQuestion] {
        &self.skipped
    }

    /// 跳过计数
    pub fn skip_count(&self) -> usize {
        self.skipped.len()
    }

    /// 取出跳过清单和选项不足的题目块
    pub fn into_rejects(self) -> (Vec<SkippedQuestion>, Vec<IncompleteBlock>) {
        (self.skipped, self.incomplete)
    }
}

fn record_skip(skipped: &mut Vec<SkippedQuestion>, number: &str, stem: &str, reason: SkipReason) {
    warn!("⏭ 跳过选择题 {}: {}", number, reason);
    skipped.push(SkippedQuestion {
        kind: QuestionKind::Mcq,
        number: number.to_string(),
        reason,
        stem: stem.to_string(),
    });
}

impl<'a> Iterator for McqBlocks<'a> {
    type Item = McqBlock;

    fn next(&mut self) -> Option<McqBlock> {
        for piece in self.pieces.by_ref() {
            let block = piece.trim();
            let Some(caps) = BLOCK_HEADER.captures(block) else {
                continue;
            };
            let number = caps[1].to_string();
            let body_start = caps.get(0).map_or(0, |m| m.end());

            let stem_end = FIRST_OPTION
                .find_at(block, body_start.saturating_sub(1))
                .map_or(block.len(), |m| m.start())
                .max(body_start);
            let stem = collapse_whitespace(&block[body_start..stem_end]);
            if stem.is_empty() {
                record_skip(&mut self.skipped, &number, &stem, SkipReason::EmptyStem);
                continue;
            }

            let options = parse_options(&block[stem_end..]);
            let distinct = options.len();

            if !self.seen.insert(number.clone()) {
                record_skip(&mut self.skipped, &number, &stem, SkipReason::DuplicateNumber);
                continue;
            }

            if distinct < 4 {
                record_skip(
                    &mut self.skipped,
                    &number,
                    &stem,
                    SkipReason::MissingOptions { found: distinct },
                );
                self.incomplete.push(IncompleteBlock {
                    number,
                    stem,
                    found: distinct,
                });
                continue;
            }

            return Some(McqBlock {
                number,
                stem,
                options,
            });
        }
        None
    }
}

/// 取出块中的选项，同一字母出现多次时后者覆盖前者，顺序按首次出现
fn parse_options(block: &str) -> Vec<(char, String)> {
    let markers: Vec<(char, usize, usize)> = OPTION_MARKER
        .captures_iter(block)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let letter = caps[1].chars().next()?;
            Some((letter, whole.start(), whole.end()))
        })
        .collect();

    let mut options: Vec<(char, String)> = Vec::new();
    for (i, (letter, _, text_start)) in markers.iter().enumerate() {
        let text_end = markers.get(i + 1).map_or(block.len(), |next| next.1);
        let text = collapse_whitespace(&block[*text_start..text_end]);

        match options.iter_mut().find(|(l, _)| l == letter) {
            Some(existing) => existing.1 = text,
            None => options.push((*letter, text)),
        }
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(number: &str, stem: &str, letters: &[char]) -> String {
        let mut s = format!("{}. {}\n", number, stem);
        for l in letters {
            s.push_str(&format!("{} atsakymas {}\n", l, l.to_ascii_lowercase()));
        }
        s
    }

    #[test]
    fn test_n_well_formed_blocks_yield_n_records() {
        let text: String = (1..=5)
            .map(|n| block(&format!("{:02}", n), "Kuris teiginys teisingas?", &['A', 'B', 'C', 'D']))
            .collect();
        let parser = McqParser::new();
        let mut blocks = parser.parse(&text);
        let parsed: Vec<McqBlock> = blocks.by_ref().collect();

        assert_eq!(parsed.len(), 5);
        let numbers: Vec<&str> = parsed.iter().map(|b| b.number.as_str()).collect();
        assert_eq!(numbers, vec!["01", "02", "03", "04", "05"]);
        assert_eq!(blocks.skip_count(), 0);
    }

    #[test]
    fn test_stem_and_options() {
        let text = "01. Kuri medžiaga\nyra druska?\nA vanduo\nB natrio\nchloridas\nC deguonis\nD azotas";
        let parsed: Vec<McqBlock> = McqParser::new().parse(text).collect();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].stem, "Kuri medžiaga yra druska?");
        assert_eq!(parsed[0].option('B'), Some("natrio chloridas"));
        assert_eq!(parsed[0].option('D'), Some("azotas"));
    }

    #[test]
    fn test_missing_option_d_is_skipped_and_counted() {
        let text = format!(
            "{}{}",
            block("01", "Pirmas?", &['A', 'B', 'C', 'D']),
            block("02", "Antras?", &['A', 'B', 'C'])
        );
        let mut blocks = McqParser::new().parse(&text);
        let parsed: Vec<McqBlock> = blocks.by_ref().collect();

        assert_eq!(parsed.len(), 1);
        assert!(parsed.iter().all(|b| b.number != "02"));
        assert_eq!(blocks.skip_count(), 1);
        assert_eq!(blocks.skipped()[0].reason, SkipReason::MissingOptions { found: 3 });

        let (_, incomplete) = blocks.into_rejects();
        assert_eq!(incomplete[0].number, "02");
        assert_eq!(incomplete[0].stem, "Antras?");
    }

    #[test]
    fn test_duplicate_number_kept_once() {
        let text = format!(
            "{}{}",
            block("07", "Pirmas?", &['A', 'B', 'C', 'D']),
            block("07", "Vėl septintas?", &['A', 'B', 'C', 'D'])
        );
        let mut blocks = McqParser::new().parse(&text);
        let parsed: Vec<McqBlock> = blocks.by_ref().collect();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].stem, "Pirmas?");
        assert_eq!(blocks.skipped()[0].reason, SkipReason::DuplicateNumber);
    }

    #[test]
    fn test_empty_stem_is_skipped_and_counted() {
        let text = format!("01.\nA x\nB y\nC z\nD w\n{}", block("02", "Antras?", &['A', 'B', 'C', 'D']));
        let mut blocks = McqParser::new().parse(&text);
        let parsed: Vec<McqBlock> = blocks.by_ref().collect();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].number, "02");
        assert_eq!(blocks.skip_count(), 1);
        assert_eq!(blocks.skipped()[0].number, "01");
        assert_eq!(blocks.skipped()[0].reason, SkipReason::EmptyStem);
    }

    #[test]
    fn test_preamble_is_ignored() {
        let text = format!("I dalis\nKiekvienas klausimas vertinamas 1 tašku.\n{}", block("01", "Kas?", &['A', 'B', 'C', 'D']));
        let parsed: Vec<McqBlock> = McqParser::new().parse(&text).collect();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_options_keep_encounter_order() {
        let text = "03. Kas?\nB antras\nA pirmas\nC trečias\nD ketvirtas";
        let parsed: Vec<McqBlock> = McqParser::new().parse(text).collect();
        let letters: Vec<char> = parsed[0].options.iter().map(|(l, _)| *l).collect();
        assert_eq!(letters, vec!['B', 'A', 'C', 'D']);
        assert_eq!(parsed[0].stem, "Kas?");
    }
}
