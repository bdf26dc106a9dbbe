//! 录入命令解析
//!
//! 每行一个命令：
//! - `q <图片>` OCR 题干
//! - `a <图片>` OCR 正确答案
//! - `f <图片>` OCR 错误答案
//! - `s <图片>` 保存题目图片
//! - `i <图片>` 保存答案图片
//! - `n` 下一题
//! - `x` 退出

use std::path::PathBuf;

/// OCR 结果写入的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTarget {
    Question,
    CorrectAnswer,
    FalseAnswer,
}

/// 一条录入命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ocr { target: TextTarget, image: PathBuf },
    SaveQuestionImage(PathBuf),
    SaveAnswerImage(PathBuf),
    Next,
    Exit,
}

impl Command {
    /// 解析一行输入，无法识别时返回 None
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim()),
            None => (line, ""),
        };
        let image = || (!arg.is_empty()).then(|| PathBuf::from(arg));

        match verb.to_ascii_lowercase().as_str() {
            "q" => image().map(|image| Command::Ocr { target: TextTarget::Question, image }),
            "a" => image().map(|image| Command::Ocr { target: TextTarget::CorrectAnswer, image }),
            "f" => image().map(|image| Command::Ocr { target: TextTarget::FalseAnswer, image }),
            "s" => image().map(Command::SaveQuestionImage),
            "i" => image().map(Command::SaveAnswerImage),
            "n" => Some(Command::Next),
            "x" => Some(Command::Exit),
            _ => None,
        }
    }
}

/// 命令帮助
pub const HELP: &str = "\
🔹 q <图片> → OCR 题干
🔹 a <图片> → OCR 正确答案
🔹 f <图片> → OCR 错误答案
🔹 s <图片> → 保存题目图片
🔹 i <图片> → 保存答案图片
🔹 n → 下一题
🔺 x → 退出";
