//! 分类服务 - 业务能力层
//!
//! 两种规则表：
//! - 关键词：题干（小写）包含任一关键词即归入该类，按表顺序取第一条
//! - 小标题：试卷按主题分段，标题行切换当前类别，之后的题目都归入该类

use crate::models::{CategoryTable, HeadingRule, KeywordRule};
use crate::services::text_repair::TextRepair;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

static QUESTION_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{2})\.").unwrap());

/// 分类服务
#[derive(Debug, Clone, Default)]
pub struct CategoryClassifier {
    keyword_rules: Vec<(String, Vec<String>)>,
    headings: Vec<HeadingRule>,
    initial: Option<String>,
    /// 小标题模式下 两位题号 -> 类别
    by_number: HashMap<String, String>,
    enabled: bool,
}

impl CategoryClassifier {
    pub fn new(table: &CategoryTable) -> Self {
        match table {
            CategoryTable::None => Self::default(),
            CategoryTable::Keywords { rules } => Self {
                keyword_rules: rules.iter().map(lowercase_rule).collect(),
                enabled: true,
                ..Default::default()
            },
            CategoryTable::Headings { initial, headings } => Self {
                headings: headings.clone(),
                initial: initial.clone(),
                enabled: true,
                ..Default::default()
            },
        }
    }

    /// 是否配置了分类表
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 扫描全文，记录每道题所在的小标题段
    ///
    /// 标题行先经过 `repair` 再和配置中的标题比较
    pub fn index_headings(&mut self, text: &str, repair: &TextRepair) {
        if self.headings.is_empty() {
            return;
        }

        let mut current = self.initial.clone();
        for line in text.lines() {
            let line = line.trim();
            let repaired = repair.apply(line);

            if let Some(rule) = self.headings.iter().find(|h| h.title == repaired) {
                debug!("📚 小标题 `{}` -> 类别 {}", rule.title, rule.category);
                current = Some(rule.category.clone());
            }

            if let (Some(caps), Some(category)) = (QUESTION_LINE.captures(line), &current) {
                self.by_number.insert(caps[1].to_string(), category.clone());
            }
        }
    }

    /// 从文本中删除小标题
    pub fn strip_headings(&self, text: &str, repair: &TextRepair) -> String {
        self.headings.iter().fold(text.to_string(), |acc, heading| {
            acc.replace(&repair.apply(&heading.title), "")
        })
    }

    /// 给一道题分类
    ///
    /// # 参数
    /// - `number`: 两位题号（小标题模式使用）
    /// - `stem`: 题干（关键词模式使用）
    ///
    /// # 返回
    /// 匹配到的类别，没有匹配时返回 None
    pub fn classify(&self, number: &str, stem: &str) -> Option<String> {
        if !self.keyword_rules.is_empty() {
            let stem = stem.to_lowercase();
            return self
                .keyword_rules
                .iter()
                .find(|(_, keywords)| keywords.iter().any(|kw| stem.contains(kw.as_str())))
                .map(|(category, _)| category.clone());
        }

        self.by_number.get(number).cloned()
    }
}

fn lowercase_rule(rule: &KeywordRule) -> (String, Vec<String>) {
    (
        rule.category.clone(),
        rule.keywords.iter().map(|kw| kw.to_lowercase()).collect(),
    )
}
