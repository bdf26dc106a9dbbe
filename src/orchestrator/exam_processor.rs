//! 单场考试处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理一场考试，是考试级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **流程调度**：委托 `ExamFlow` 完成解析与输出
//! 2. **统计输出**：记录选择题/开放题/跳过数量
//! 3. **运行日志**：每场考试向日志文件追加一行摘要

use crate::config::Config;
use crate::models::ExamProfile;
use crate::utils::logging::append_log_line;
use crate::workflow::{ExamCtx, ExamFlow, ExamReport};
use anyhow::Result;
use tracing::{info, warn};

/// 处理单场考试
///
/// # 参数
/// - `flow`: 复用的考试处理流程
/// - `profile`: 考试配置
/// - `exam_index`: 考试索引（用于日志）
/// - `config`: 配置
///
/// # 返回
/// 返回本场考试的统计
pub async fn process_exam(
    flow: &ExamFlow,
    profile: &ExamProfile,
    exam_index: usize,
    config: &Config,
) -> Result<ExamReport> {
    let ctx = ExamCtx::new(exam_index, profile.name.as_str(), profile.subject);

    log_exam_start(&ctx, profile);

    let report = flow.run(profile, &ctx).await?;

    log_exam_complete(&ctx, &report);

    let summary = format!(
        "{} | 选择题 {} | 开放题 {} | 跳过 {} | 图片 {} | {}",
        profile.name,
        report.mcq_rows,
        report.open_rows,
        report.skipped,
        report.flagged_images.len(),
        report.output.display()
    );
    if let Err(e) = append_log_line(&config.output_log_file, &summary) {
        warn!("{} ⚠️ 写入运行日志失败: {}", ctx, e);
    }

    Ok(report)
}

// ========== 日志辅助函数 ==========

fn log_exam_start(ctx: &ExamCtx, profile: &ExamProfile) {
    info!("{} 开始处理", ctx);
    if let Some(path) = &profile.file_path {
        info!("{} 配置: {}", ctx, path);
    }
    info!("{} 试卷: {}", ctx, profile.document.display());
    if let Some(answers) = &profile.answer_document {
        info!("{} 答案: {}", ctx, answers.display());
    }
    info!(
        "{} 页码: {}-{}",
        ctx, profile.pages.start, profile.pages.end
    );
}

fn log_exam_complete(ctx: &ExamCtx, report: &ExamReport) {
    info!(
        "{} 题目统计: 选择题 {}, 开放题 {}, 跳过 {}",
        ctx, report.mcq_rows, report.open_rows, report.skipped
    );
    info!("{} ✅ 已保存至 {}\n", ctx, report.output.display());
}
