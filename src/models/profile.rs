//! 考试配置
//!
//! 每场考试一个 TOML 文件。同一套流程靠这里的数据区分不同年份、科目的版式：
//! 噪声字符串、分节标记、分类表、OCR 裁剪尺寸都写在配置里，而不是写在代码里

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::subject::Subject;

/// 一场考试的全部配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamProfile {
    /// 名称，用于日志和默认输出文件名
    pub name: String,
    pub subject: Subject,
    /// 试卷 PDF
    pub document: PathBuf,
    /// 答案 PDF
    #[serde(default)]
    pub answer_document: Option<PathBuf>,
    /// 输出 Excel，未设置时为 `{output_folder}/{科目目录}/{name}.xlsx`
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_exam_pages")]
    pub pages: PageRange,
    #[serde(default)]
    pub source: TextSource,
    #[serde(default)]
    pub noise_rules: Vec<NoiseRule>,
    #[serde(default = "default_section_marker")]
    pub section_marker: String,
    /// 第二部分中说明文字的结束位置
    #[serde(default)]
    pub part_two_intro: Option<String>,
    #[serde(default)]
    pub answer_key: AnswerKeyProfile,
    /// 开放题题号 "0" 修正为 "10"
    #[serde(default)]
    pub repair_zero_number: bool,
    #[serde(default = "default_true")]
    pub strip_option_punctuation: bool,
    #[serde(default)]
    pub text_repairs: Vec<[String; 2]>,
    #[serde(default)]
    pub default_text_repairs: bool,
    /// 题干和选项的 LaTeX 改写规则
    #[serde(default)]
    pub latex_rules: Vec<NoiseRule>,
    #[serde(default)]
    pub image_keywords: Vec<String>,
    #[serde(default)]
    pub image_policy: ImagePolicy,
    #[serde(default)]
    pub mcq_image_fallback: bool,
    /// 流水号起点
    #[serde(default)]
    pub id_start: Option<u32>,
    #[serde(default = "default_true")]
    pub image_column: bool,
    #[serde(default)]
    pub categories: CategoryTable,
    #[serde(default = "default_uncategorized_label")]
    pub uncategorized_label: String,
    /// 配置文件路径（加载时填入）
    #[serde(skip)]
    pub file_path: Option<String>,
}

impl ExamProfile {
    /// 输出文件路径
    pub fn output_path(&self, output_folder: &str) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            PathBuf::from(output_folder)
                .join(self.subject.dir_name())
                .join(format!("{}.xlsx", self.name))
        })
    }

    /// 记录配置文件路径
    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }
}

/// 页码范围，从 1 开始，两端包含
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
}

impl PageRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// 页码迭代
    pub fn pages(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// 文本来源
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextSource {
    /// 直接从 PDF 提取文本
    #[default]
    Pdf,
    /// 已渲染的页面图片 + 远程 OCR
    Ocr {
        /// 存放 `page_{n}.png` 的目录
        images_dir: PathBuf,
        #[serde(default)]
        crop: CropBox,
    },
}

/// 从图片四边裁掉的像素
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropBox {
    #[serde(default)]
    pub left: u32,
    #[serde(default)]
    pub top: u32,
    #[serde(default)]
    pub right: u32,
    #[serde(default)]
    pub bottom: u32,
}

/// 一条去噪规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoiseRule {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
    /// true 表示按普通字符串替换
    #[serde(default)]
    pub literal: bool,
    /// 匹配后紧跟此模式时不替换
    #[serde(default)]
    pub unless_followed_by: Option<String>,
}

impl NoiseRule {
    pub fn regex(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            literal: false,
            unless_followed_by: None,
        }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            pattern: text.into(),
            replacement: String::new(),
            literal: true,
            unless_followed_by: None,
        }
    }

    pub fn unless_followed_by(mut self, guard: impl Into<String>) -> Self {
        self.unless_followed_by = Some(guard.into());
        self
    }
}

/// 答案 PDF 的解析配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerKeyProfile {
    #[serde(default = "default_answer_pages")]
    pub pages: PageRange,
    #[serde(default = "default_section_marker")]
    pub section_marker: String,
    /// false 时整页都按选择题字母读取，不找第二部分
    #[serde(default = "default_true")]
    pub split_sections: bool,
    #[serde(default = "default_mcq_count")]
    pub mcq_count: usize,
    #[serde(default)]
    pub noise_rules: Vec<NoiseRule>,
}

impl Default for AnswerKeyProfile {
    fn default() -> Self {
        Self {
            pages: default_answer_pages(),
            section_marker: default_section_marker(),
            split_sections: true,
            mcq_count: default_mcq_count(),
            noise_rules: Vec::new(),
        }
    }
}

/// 题干提到图片时的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImagePolicy {
    #[default]
    Ignore,
    /// 保留并填写图片列
    Flag,
    /// 跳过
    Skip,
}

/// 分类表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CategoryTable {
    #[default]
    None,
    /// 题干包含关键词即归类，按顺序取第一条
    Keywords { rules: Vec<KeywordRule> },
    /// 按试卷中的小标题归类
    Headings {
        #[serde(default)]
        initial: Option<String>,
        headings: Vec<HeadingRule>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub category: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingRule {
    pub title: String,
    pub category: String,
}

fn default_true() -> bool {
    true
}

fn default_exam_pages() -> PageRange {
    PageRange::new(2, 10)
}

fn default_answer_pages() -> PageRange {
    PageRange::new(1, 1)
}

fn default_section_marker() -> String {
    r"\bII dalis\b".to_string()
}

fn default_mcq_count() -> usize {
    30
}

fn default_uncategorized_label() -> String {
    "null".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_profile_defaults() {
        let profile: ExamProfile = toml::from_str(
            r#"
            name = "biologija-2019"
            subject = "biology"
            document = "egzai/2019.pdf"
            "#,
        )
        .unwrap();

        assert_eq!(profile.pages, PageRange::new(2, 10));
        assert_eq!(profile.source, TextSource::Pdf);
        assert_eq!(profile.answer_key.mcq_count, 30);
        assert!(profile.strip_option_punctuation);
        assert!(!profile.repair_zero_number);
        assert_eq!(profile.categories, CategoryTable::None);
        assert_eq!(
            profile.output_path("surinkti"),
            PathBuf::from("surinkti").join("Bio").join("biologija-2019.xlsx")
        );
    }

    #[test]
    fn test_ocr_source_and_headings() {
        let profile: ExamProfile = toml::from_str(
            r#"
            name = "fizika-2009"
            subject = "Fizika"
            document = "egzai/2009.pdf"

            [source]
            kind = "ocr"
            images_dir = "ocr_pages"
            crop = { left = 100, top = 165, bottom = 180 }

            [categories]
            mode = "headings"
            initial = "18"
            headings = [{ title = "Mechanika", category = "18" }]
            "#,
        )
        .unwrap();

        match profile.source {
            TextSource::Ocr { crop, .. } => {
                assert_eq!(crop, CropBox { left: 100, top: 165, right: 0, bottom: 180 })
            }
            other => panic!("unexpected source {:?}", other),
        }
        assert!(matches!(profile.categories, CategoryTable::Headings { .. }));
    }

    #[test]
    fn test_unknown_subject_rejected() {
        let result: Result<ExamProfile, _> = toml::from_str(
            r#"
            name = "x"
            subject = "istorija"
            document = "x.pdf"
            "#,
        );
        assert!(result.is_err());
    }
}
