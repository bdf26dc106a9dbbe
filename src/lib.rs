//! # Exam Extract
//!
//! 从立陶宛国家考试（化学、生物、物理、数学）的 PDF 试卷和答案中提取试题，
//! 输出为 Excel 表格
//!
//! ## 架构设计
//!
//! 本系统采用四层架构，每场考试的版式差异都写在 `exams/*.toml` 里：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 读取文档，只暴露能力
//! - `pdf_reader` - PDF 文本层按页提取
//! - `OcrClient` - 页面图片的远程 OCR
//! - `DocumentLoader` - 按配置选择文本来源
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个服务只做一步
//! - `NoiseStripper` / `SectionSplitter` - 去噪、分节
//! - `McqParser` / `OpenParser` / `AnswerKeyResolver` - 解析题目与答案
//! - `CategoryClassifier` / `TextRepair` / `LatexFormatter` / `RowAssembler` - 分类、修正、公式、组装
//! - `SheetWriter` / `WarnWriter` - 写 Excel、写 warn.txt
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一场考试"的完整处理流程
//! - `ExamCtx` - 上下文封装
//! - `ExamFlow` - 流程编排（加载 → 去噪 → 解析 → 组装 → 输出）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量考试处理器
//! - `orchestrator/exam_processor` - 单场考试处理器
//!
//! 另有 `capture/`：数学试卷的交互式截图录入（`capture` 可执行文件）
//!
//! ## 模块结构

pub mod capture;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ExamProfile, QuestionRow};
pub use orchestrator::{process_exam, App};
pub use workflow::{ExamCtx, ExamFlow, ExamReport};
