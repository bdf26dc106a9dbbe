//! 交互式录入（数学试卷）
//!
//! 数学试卷公式多，按题截图后逐条 OCR 录入

pub mod command;
pub mod handler;
pub mod session;

pub use command::{Command, TextTarget, HELP};
pub use handler::{CaptureHandler, Recognizer};
pub use session::{CaptureEvent, CaptureOutcome, CaptureSession};
