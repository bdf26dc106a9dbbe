//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量考试处理器
//! - 管理应用生命周期（初始化、运行）
//! - 批量加载考试配置（Vec<ExamProfile>）
//! - 逐场调度，输出全局统计信息
//!
//! ### `exam_processor` - 单场考试处理器
//! - 构建考试上下文
//! - 委托 ExamFlow 处理
//! - 输出单场考试的统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<ExamProfile>)
//!     ↓
//! exam_processor (处理单个 ExamProfile)
//!     ↓
//! workflow::ExamFlow (加载 → 去噪 → 解析 → 组装 → 输出)
//!     ↓
//! services (能力层：去噪 / 分节 / 解析 / 答案 / 分类 / 写表)
//!     ↓
//! infrastructure (基础设施：PDF / OCR)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，exam_processor 管单场
//! 2. **向下依赖**：编排层 → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod batch_processor;
pub mod exam_processor;

// 重新导出主要类型
pub use batch_processor::App;
pub use exam_processor::process_exam;
