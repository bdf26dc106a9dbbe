use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// 选择题（A–D 四个选项）
    #[default]
    Mcq,
    /// 开放题（I 部分之后的文字题）
    Open,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Mcq => write!(f, "选择题"),
            QuestionKind::Open => write!(f, "开放题"),
        }
    }
}

/// 输出到表格的一行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionRow {
    /// 写入 "Question No." 列的编号（两位题号或流水号）
    pub number: String,
    /// 试卷中的原始题号（两位）
    #[serde(default)]
    pub source_number: String,
    #[serde(default)]
    pub kind: QuestionKind,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub wrong_answers: [String; 3],
    #[serde(default)]
    pub fa_check: bool,
    #[serde(default)]
    pub image: Option<String>,
}

impl QuestionRow {
    /// 第一个空的错误选项位置
    pub fn first_empty_wrong_slot(&mut self) -> Option<&mut String> {
        self.wrong_answers.iter_mut().find(|slot| slot.is_empty())
    }
}

/// 解析出的一道选择题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McqBlock {
    /// 两位题号，如 "07"
    pub number: String,
    pub stem: String,
    /// 按出现顺序排列的 (字母, 选项文本)
    pub options: Vec<(char, String)>,
}

impl McqBlock {
    pub fn option(&self, letter: char) -> Option<&str> {
        self.options
            .iter()
            .find(|(l, _)| *l == letter)
            .map(|(_, text)| text.as_str())
    }
}

/// 选项不足四个的题目块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteBlock {
    pub number: String,
    pub stem: String,
    pub found: usize,
}

/// 解析出的一道开放题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenBlock {
    pub number: String,
    pub stem: String,
}

/// 跳过原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// 选项不足四个
    MissingOptions { found: usize },
    /// 题干引用了图片或表格
    ImageReference,
    /// 同一部分中题号重复
    DuplicateNumber,
    /// 题号后面没有题干
    EmptyStem,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingOptions { found } => write!(f, "选项不足 (找到 {} 个)", found),
            SkipReason::ImageReference => write!(f, "引用了图片或表格"),
            SkipReason::DuplicateNumber => write!(f, "题号重复"),
            SkipReason::EmptyStem => write!(f, "题干为空"),
        }
    }
}

/// 被跳过的题目，写入 warn 文件供人工复查
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedQuestion {
    pub kind: QuestionKind,
    pub number: String,
    pub reason: SkipReason,
    pub stem: String,
}

/// 答案表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey {
    /// 两位题号 -> 正确字母
    pub mcq: BTreeMap<String, char>,
    /// 两位题号 -> 开放题答案
    pub open: BTreeMap<String, String>,
}

impl AnswerKey {
    pub fn correct_letter(&self, number: &str) -> Option<char> {
        self.mcq.get(&pad_number(number)).copied()
    }

    pub fn open_answer(&self, number: &str) -> Option<&str> {
        self.open.get(&pad_number(number)).map(String::as_str)
    }
}

/// 题号补零到两位
pub fn pad_number(number: &str) -> String {
    format!("{:0>2}", number.trim())
}
