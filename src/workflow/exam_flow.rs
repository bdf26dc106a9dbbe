//! 考试处理流程 - 流程层
//!
//! 核心职责：定义"一场考试"的完整处理流程
//!
//! 流程顺序：
//! 1. 读取试卷文本（PDF 或 OCR）→ 去噪
//! 2. 读取答案 PDF → 答案表
//! 3. 小标题分类 → 分节 → 选择题 / 开放题解析
//! 4. 组装行 → 写 Excel，跳过的题写 warn.txt

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::document_loader::ensure_exists;
use crate::infrastructure::{pdf_reader, DocumentLoader};
use crate::models::{AnswerKey, ExamProfile};
use crate::services::{
    AnswerKeyResolver, AssembledRows, CategoryClassifier, LatexFormatter, McqParser, NoiseStripper,
    OpenParser, RowAssembler, SectionSplitter, SheetWriter, TextRepair, WarnWriter,
};
use crate::utils::logging::truncate_text;
use crate::workflow::exam_ctx::ExamCtx;

/// 一场考试的处理结果
#[derive(Debug, Clone, Default)]
pub struct ExamReport {
    pub output: PathBuf,
    pub mcq_rows: usize,
    pub open_rows: usize,
    pub skipped: usize,
    pub flagged_images: Vec<String>,
}

impl ExamReport {
    pub fn total_rows(&self) -> usize {
        self.mcq_rows + self.open_rows
    }
}

/// 考试处理流程
///
/// - 编排完整的单场考试流程
/// - 只依赖业务能力（services）和基础设施（infrastructure）
pub struct ExamFlow {
    config: Config,
    warn_writer: WarnWriter,
}

impl ExamFlow {
    /// 创建新的考试处理流程
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            warn_writer: WarnWriter::with_path(&config.warn_file),
        }
    }

    pub async fn run(&self, profile: &ExamProfile, ctx: &ExamCtx) -> Result<ExamReport> {
        // 答案文件缺失时在 OCR 之前就失败
        if let Some(answers) = &profile.answer_document {
            ensure_exists(answers)?;
        }

        // ========== 步骤 1: 试卷文本 ==========
        let loader = DocumentLoader::for_source(&profile.source, &self.config)?;
        let raw_text = loader
            .load(&profile.document, profile.pages)
            .await
            .with_context(|| format!("{} 读取试卷失败", ctx))?;
        let exam_text = prepare_text(profile, &raw_text)?;
        info!("{} 🧹 去噪完成，剩余 {} 个字符", ctx, exam_text.chars().count());

        // ========== 步骤 2: 答案文本 ==========
        let answer_text = match &profile.answer_document {
            Some(path) => Some(
                pdf_reader::extract_page_range(path, profile.answer_key.pages)
                    .with_context(|| format!("{} 读取答案失败", ctx))?,
            ),
            None => {
                warn!("{} ⚠️ 未配置答案文件，正确答案列将为空", ctx);
                None
            }
        };

        if let Some(dir) = &self.config.debug_dump_dir {
            dump_debug_text(Path::new(dir), &profile.name, &exam_text, answer_text.as_deref())?;
        }

        // ========== 步骤 3: 解析与组装 ==========
        let rows = extract_rows(
            profile,
            &exam_text,
            answer_text.as_deref(),
            &self.config.image_bucket_url,
        )?;

        if self.config.verbose_logging {
            for row in rows.all_rows() {
                info!("{}   {} | {}", ctx, row.number, truncate_text(&row.question, 80));
            }
        }

        // ========== 步骤 4: 输出 ==========
        self.warn_writer.write_all(&profile.name, &rows.skipped).await?;

        let output = profile.output_path(&self.config.output_folder);
        SheetWriter::new(profile.image_column).write(&output, rows.all_rows())?;

        if !rows.flagged_images.is_empty() {
            info!("{} 🖼 带图片的题目: {:?}", ctx, rows.flagged_images);
        }

        Ok(ExamReport {
            output,
            mcq_rows: rows.mcq_rows.len(),
            open_rows: rows.open_rows.len(),
            skipped: rows.skipped.len(),
            flagged_images: rows.flagged_images,
        })
    }
}

/// 对试卷原始文本应用去噪规则
pub fn prepare_text(profile: &ExamProfile, raw_text: &str) -> AppResult<String> {
    let stripper = NoiseStripper::new(&profile.noise_rules)?;
    Ok(stripper.strip(raw_text))
}

/// 从去噪后的文本中提取所有题目行
///
/// # 参数
/// - `profile`: 考试配置
/// - `exam_text`: 去噪后的试卷文本
/// - `answer_text`: 答案文本，None 时答案列为空
/// - `bucket`: 图片存储桶地址
pub fn extract_rows(
    profile: &ExamProfile,
    exam_text: &str,
    answer_text: Option<&str>,
    bucket: &str,
) -> AppResult<AssembledRows> {
    let repair = TextRepair::new(&profile.text_repairs, profile.default_text_repairs);
    let latex = LatexFormatter::new(&profile.latex_rules)?;

    let mut classifier = CategoryClassifier::new(&profile.categories);
    classifier.index_headings(exam_text, &repair);
    let text = classifier.strip_headings(exam_text, &repair);

    let key = match answer_text {
        Some(answers) => AnswerKeyResolver::new(&profile.answer_key)?.resolve(answers),
        None => AnswerKey::default(),
    };

    let sections = SectionSplitter::new(&profile.section_marker)?.split(&text);

    let mut mcq_blocks = McqParser::new().parse(sections.part_one);
    let mcq: Vec<_> = mcq_blocks.by_ref().collect();
    let (mut skipped, incomplete) = mcq_blocks.into_rejects();

    let open_parser = OpenParser::new(profile.part_two_intro.as_deref(), profile.repair_zero_number)?;
    let mut open_blocks = open_parser.parse(sections.part_two);
    let open: Vec<_> = open_blocks.by_ref().collect();
    skipped.extend(open_blocks.into_skipped());

    info!(
        "🧠 解析完成: 选择题 {} 道, 开放题 {} 道, 跳过 {} 道",
        mcq.len(),
        open.len(),
        skipped.len()
    );

    let mut rows = RowAssembler::new(profile, &classifier, &repair, &latex, bucket)
        .assemble(mcq, incomplete, open, &key);
    skipped.append(&mut rows.skipped);
    rows.skipped = skipped;

    Ok(rows)
}

/// 写出调试文本
fn dump_debug_text(dir: &Path, name: &str, exam_text: &str, answer_text: Option<&str>) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("无法创建调试目录 {}", dir.display()))?;

    std::fs::write(dir.join(format!("{}.text.txt", name)), exam_text)?;
    if let Some(answers) = answer_text {
        std::fs::write(dir.join(format!("{}.answers.txt", name)), answers)?;
    }

    info!("📝 调试文本已写入 {}", dir.display());
    Ok(())
}
