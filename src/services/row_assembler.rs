//! 组装服务 - 业务能力层
//!
//! 把解析出的题目块和答案表按题号连接成表格行

use crate::config::image_url;
use crate::models::{
    AnswerKey, ExamProfile, ImagePolicy, IncompleteBlock, McqBlock, OpenBlock, QuestionKind,
    QuestionRow, SkipReason, SkippedQuestion,
};
use crate::services::category::CategoryClassifier;
use crate::services::latex_formatter::LatexFormatter;
use crate::services::text_repair::TextRepair;
use crate::utils::text::collapse_whitespace;
use tracing::{debug, warn};

/// 组装结果
#[derive(Debug, Clone, Default)]
pub struct AssembledRows {
    pub mcq_rows: Vec<QuestionRow>,
    pub open_rows: Vec<QuestionRow>,
    pub skipped: Vec<SkippedQuestion>,
    /// 标记为带图片的题（写入表格的编号）
    pub flagged_images: Vec<String>,
}

impl AssembledRows {
    /// 选择题在前，开放题在后
    pub fn all_rows(&self) -> impl Iterator<Item = &QuestionRow> {
        self.mcq_rows.iter().chain(self.open_rows.iter())
    }

    pub fn row_count(&self) -> usize {
        self.mcq_rows.len() + self.open_rows.len()
    }
}

/// 组装服务
pub struct RowAssembler<'a> {
    classifier: &'a CategoryClassifier,
    repair: &'a TextRepair,
    latex: &'a LatexFormatter,
    image_keywords: Vec<String>,
    image_policy: ImagePolicy,
    strip_option_punctuation: bool,
    mcq_image_fallback: bool,
    uncategorized_label: Option<String>,
    bucket: String,
    next_id: Option<u32>,
}

impl<'a> RowAssembler<'a> {
    pub fn new(
        profile: &ExamProfile,
        classifier: &'a CategoryClassifier,
        repair: &'a TextRepair,
        latex: &'a LatexFormatter,
        bucket: &str,
    ) -> Self {
        Self {
            classifier,
            repair,
            latex,
            image_keywords: profile
                .image_keywords
                .iter()
                .map(|kw| kw.to_lowercase())
                .collect(),
            image_policy: profile.image_policy,
            strip_option_punctuation: profile.strip_option_punctuation,
            mcq_image_fallback: profile.mcq_image_fallback,
            uncategorized_label: classifier
                .is_enabled()
                .then(|| profile.uncategorized_label.clone()),
            bucket: bucket.to_string(),
            next_id: profile.id_start,
        }
    }

    /// 组装全部行
    ///
    /// # 参数
    /// - `mcq`: 完整的选择题
    /// - `incomplete`: 选项不足的选择题（仅在启用图片选项兜底时使用）
    /// - `open`: 开放题
    /// - `key`: 答案表
    pub fn assemble(
        mut self,
        mcq: Vec<McqBlock>,
        incomplete: Vec<IncompleteBlock>,
        open: Vec<OpenBlock>,
        key: &AnswerKey,
    ) -> AssembledRows {
        let mut out = AssembledRows::default();

        let mut entries: Vec<McqEntry> = mcq.into_iter().map(McqEntry::Full).collect();
        if self.mcq_image_fallback {
            entries.extend(incomplete.into_iter().map(McqEntry::Fallback));
        }
        entries.sort_by(|a, b| a.number().cmp(b.number()));

        for entry in entries {
            if let Some(row) = self.mcq_row(entry, key, &mut out) {
                out.mcq_rows.push(row);
            }
        }

        for block in open {
            if let Some(row) = self.open_row(block, key, &mut out) {
                out.open_rows.push(row);
            }
        }

        out
    }

    fn mcq_row(
        &mut self,
        entry: McqEntry,
        key: &AnswerKey,
        out: &mut AssembledRows,
    ) -> Option<QuestionRow> {
        let source_number = entry.number().to_string();
        let stem = collapse_whitespace(&self.repair.apply(entry.stem()));
        let mentions_image = self.mentions_image(&stem);

        if mentions_image && self.image_policy == ImagePolicy::Skip {
            self.skip(QuestionKind::Mcq, &source_number, &stem, out);
            return None;
        }

        let correct_letter = key.correct_letter(&source_number);
        if correct_letter.is_none() {
            warn!("⚠️ 答案表中没有选择题 {}", source_number);
        }

        let number = self.take_id(&source_number);
        let mut row = QuestionRow {
            number: number.clone(),
            source_number: source_number.clone(),
            kind: QuestionKind::Mcq,
            category: self.category(&source_number, &stem),
            question: self.latex.apply(&stem),
            fa_check: false,
            ..Default::default()
        };

        match entry {
            McqEntry::Full(block) => {
                let options: Vec<(char, String)> = block
                    .options
                    .iter()
                    .map(|(letter, text)| (*letter, self.clean_option(text)))
                    .collect();

                row.correct_answer = correct_letter
                    .and_then(|letter| options.iter().find(|(l, _)| *l == letter))
                    .map(|(_, text)| text.clone())
                    .unwrap_or_default();

                let wrong = options
                    .iter()
                    .filter(|(l, _)| Some(*l) != correct_letter)
                    .map(|(_, text)| text.clone());
                for (slot, text) in row.wrong_answers.iter_mut().zip(wrong) {
                    *slot = text;
                }
            }
            McqEntry::Fallback(_) => {
                debug!("🖼 选择题 {} 使用图片选项", source_number);
                row.correct_answer = correct_letter.map(String::from).unwrap_or_default();
                for (slot, n) in row.wrong_answers.iter_mut().zip(2..=4) {
                    *slot = image_url(&self.bucket, &format!("{}-{}.png", number, n));
                }
            }
        }

        if mentions_image {
            self.flag(&mut row, out);
        }

        Some(row)
    }

    fn open_row(
        &mut self,
        block: OpenBlock,
        key: &AnswerKey,
        out: &mut AssembledRows,
    ) -> Option<QuestionRow> {
        let stem = collapse_whitespace(&self.repair.apply(&block.stem));
        let mentions_image = self.mentions_image(&stem);

        if mentions_image && self.image_policy == ImagePolicy::Skip {
            self.skip(QuestionKind::Open, &block.number, &stem, out);
            return None;
        }

        let correct_answer = match key.open_answer(&block.number) {
            Some(answer) => answer.to_string(),
            None => {
                warn!("⚠️ 答案表中没有开放题 {}", block.number);
                String::new()
            }
        };

        let mut row = QuestionRow {
            number: self.take_id(&block.number),
            source_number: block.number.clone(),
            kind: QuestionKind::Open,
            category: self.category(&block.number, &stem),
            question: self.latex.apply(&stem),
            correct_answer,
            fa_check: true,
            ..Default::default()
        };

        if mentions_image {
            self.flag(&mut row, out);
        }

        Some(row)
    }

    // ========== 辅助方法 ==========

    fn take_id(&mut self, source_number: &str) -> String {
        match self.next_id.as_mut() {
            Some(id) => {
                let current = *id;
                *id += 1;
                current.to_string()
            }
            None => source_number.to_string(),
        }
    }

    fn category(&self, number: &str, stem: &str) -> Option<String> {
        self.classifier
            .classify(number, stem)
            .or_else(|| self.uncategorized_label.clone())
    }

    fn mentions_image(&self, stem: &str) -> bool {
        if self.image_policy == ImagePolicy::Ignore || self.image_keywords.is_empty() {
            return false;
        }
        let stem = stem.to_lowercase();
        self.image_keywords.iter().any(|kw| stem.contains(kw.as_str()))
    }

    fn clean_option(&self, text: &str) -> String {
        let text = self.repair.apply(text);
        let text = if self.strip_option_punctuation {
            collapse_whitespace(&text.replace(['.', ';'], ""))
        } else {
            collapse_whitespace(&text)
        };
        self.latex.apply(&text)
    }

    fn flag(&self, row: &mut QuestionRow, out: &mut AssembledRows) {
        row.image = Some(image_url(&self.bucket, &format!("{}.png", row.number)));
        out.flagged_images.push(row.number.clone());
    }

    fn skip(&self, kind: QuestionKind, number: &str, stem: &str, out: &mut AssembledRows) {
        warn!("⏭ 跳过{} {}: {}", kind, number, SkipReason::ImageReference);
        out.skipped.push(SkippedQuestion {
            kind,
            number: number.to_string(),
            reason: SkipReason::ImageReference,
            stem: stem.to_string(),
        });
    }
}

enum McqEntry {
    Full(McqBlock),
    Fallback(IncompleteBlock),
}

impl McqEntry {
    fn number(&self) -> &str {
        match self {
            McqEntry::Full(block) => &block.number,
            McqEntry::Fallback(block) => &block.number,
        }
    }

    fn stem(&self) -> &str {
        match self {
            McqEntry::Full(block) => &block.stem,
            McqEntry::Fallback(block) => &block.stem,
        }
    }
}
