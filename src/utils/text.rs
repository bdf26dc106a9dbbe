//! 文本小工具
//!
//! `regex` 不支持前瞻断言，原来靠 `(?=...)` 切分的地方统一用 [`split_before`]

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n+").unwrap());

/// 把连续空白压成一个空格并去掉首尾空白
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// 把多个空行压成一个空行
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_LINES.replace_all(text, "\n\n").into_owned()
}

/// 在 `pattern` 每次匹配的起点处切开文本
///
/// 第一段是第一次匹配之前的内容（可能为空），之后每段都以一次匹配开头
pub fn split_before<'a>(text: &'a str, pattern: &Regex) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut last = 0;

    for m in pattern.find_iter(text) {
        pieces.push(&text[last..m.start()]);
        last = m.start();
    }
    pieces.push(&text[last..]);

    pieces
}
