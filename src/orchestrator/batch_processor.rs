//! 批量考试处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量考试的处理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：初始化运行日志文件
//! 2. **批量加载**：扫描并加载所有考试配置（`Vec<ExamProfile>`）
//! 3. **顺序处理**：逐场处理，单场失败只记录不中断
//! 4. **全局统计**：汇总所有考试的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单场考试的细节
//! - **向下委托**：委托 exam_processor 处理单场考试

use crate::config::Config;
use crate::models::ExamProfile;
use crate::orchestrator::exam_processor;
use crate::utils::logging::{
    append_log_line, init_log_file, log_profiles_loaded, log_startup, print_final_stats,
};
use crate::workflow::ExamFlow;
use anyhow::Result;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    flow: ExamFlow,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config.profile_folder);

        let flow = ExamFlow::new(&config);

        Ok(Self { config, flow })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let profiles = self.load_profiles().await?;

        if profiles.is_empty() {
            warn!("⚠️ 没有找到考试配置文件，程序结束");
            return Ok(());
        }

        log_profiles_loaded(profiles.len());

        let stats = self.process_all(&profiles).await;

        print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            stats.rows,
            &self.config.output_log_file,
        );

        Ok(())
    }

    /// 加载考试配置
    async fn load_profiles(&self) -> Result<Vec<ExamProfile>> {
        info!("\n📁 正在扫描考试配置...");
        crate::models::load_all_profiles(&self.config.profile_folder).await
    }

    /// 逐场处理所有考试
    async fn process_all(&self, profiles: &[ExamProfile]) -> ProcessingStats {
        let mut stats = ProcessingStats {
            total: profiles.len(),
            ..Default::default()
        };

        for (idx, profile) in profiles.iter().enumerate() {
            let exam_index = idx + 1;
            log_exam_divider(exam_index, stats.total);

            match exam_processor::process_exam(&self.flow, profile, exam_index, &self.config).await {
                Ok(report) => {
                    stats.success += 1;
                    stats.rows += report.total_rows();
                }
                Err(e) => {
                    error!("[考试 #{}] ❌ 处理过程中发生错误: {:#}", exam_index, e);
                    let line = format!("{} | 失败 | {:#}", profile.name, e);
                    if let Err(log_err) = append_log_line(&self.config.output_log_file, &line) {
                        warn!("⚠️ 写入运行日志失败: {}", log_err);
                    }
                    stats.failed += 1;
                }
            }
        }

        stats
    }
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    success: usize,
    failed: usize,
    total: usize,
    rows: usize,
}

// ========== 日志辅助函数 ==========

fn log_exam_divider(exam_index: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 场考试", exam_index, total);
    info!("{}", "=".repeat(60));
}
