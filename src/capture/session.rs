//! 录入会话
//!
//! 把"当前题号 / 当前行 / 答案图片序号"放进一个可序列化的会话对象，
//! 每个用户动作是一个事件，由 [`CaptureSession::apply`] 处理

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::image_url;
use crate::models::QuestionRow;

/// 用户动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// OCR 得到的题干
    QuestionText(String),
    /// OCR 得到的正确答案
    CorrectAnswer(String),
    /// OCR 得到的错误答案
    FalseAnswer(String),
    /// 保存题目图片
    QuestionImage,
    /// 保存答案图片
    AnswerImage,
    /// 结束当前题
    Finalize,
}

/// 事件处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// 已写入当前行
    Recorded,
    /// 已写入当前行，需要把图片保存为 `file_name`
    Image { file_name: String },
    /// 三个错误答案位置都已填满，未做修改
    SlotsFull,
    /// 已切换到下一题
    Advanced { next_id: u32 },
}

/// 录入会话
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureSession {
    pub current_qid: u32,
    /// 当前行在 `rows` 中的位置
    pub active_row: usize,
    /// 下一张答案图片的序号，1..=4 循环
    pub answer_index: u8,
    pub rows: Vec<QuestionRow>,
    pub bucket: String,
}

impl CaptureSession {
    pub fn new(start_id: u32, bucket: impl Into<String>) -> Self {
        Self {
            current_qid: start_id,
            active_row: 0,
            answer_index: 1,
            rows: Vec::new(),
            bucket: bucket.into(),
        }
    }

    /// 处理一个事件
    pub fn apply(&mut self, event: CaptureEvent) -> CaptureOutcome {
        match event {
            CaptureEvent::QuestionText(text) => {
                let qid = self.current_qid.to_string();
                let row = self.active_row_mut();
                row.number = qid;
                row.question = text;
                CaptureOutcome::Recorded
            }
            CaptureEvent::CorrectAnswer(text) => {
                let row = self.active_row_mut();
                row.correct_answer = text;
                row.fa_check = true;
                CaptureOutcome::Recorded
            }
            CaptureEvent::FalseAnswer(text) => {
                let qid = self.current_qid;
                let row = self.active_row_mut();
                match row.first_empty_wrong_slot() {
                    Some(slot) => {
                        *slot = text;
                        row.fa_check = false;
                        CaptureOutcome::Recorded
                    }
                    None => {
                        warn!("⚠️ 题目 {} 的错误答案已满，忽略", qid);
                        CaptureOutcome::SlotsFull
                    }
                }
            }
            CaptureEvent::QuestionImage => {
                let file_name = format!("{}.png", self.current_qid);
                let url = image_url(&self.bucket, &file_name);
                self.active_row_mut().image = Some(url);
                CaptureOutcome::Image { file_name }
            }
            CaptureEvent::AnswerImage => {
                let qid = self.current_qid;
                let file_name = format!("{}-{}.png", qid, self.answer_index);
                let url = image_url(&self.bucket, &file_name);
                let row = self.active_row_mut();
                let Some(slot) = row.first_empty_wrong_slot() else {
                    warn!("⚠️ 题目 {} 的错误答案已满，忽略答案图片", qid);
                    return CaptureOutcome::SlotsFull;
                };
                *slot = url;
                row.fa_check = true;
                self.answer_index = if self.answer_index >= 4 { 1 } else { self.answer_index + 1 };
                CaptureOutcome::Image { file_name }
            }
            CaptureEvent::Finalize => {
                self.current_qid += 1;
                self.active_row += 1;
                self.answer_index = 1;
                info!("✅ 本题完成，下一题: {}", self.current_qid);
                CaptureOutcome::Advanced {
                    next_id: self.current_qid,
                }
            }
        }
    }

    /// 当前行，不存在时补齐
    fn active_row_mut(&mut self) -> &mut QuestionRow {
        while self.rows.len() <= self.active_row {
            self.rows.push(QuestionRow {
                number: self.current_qid.to_string(),
                ..Default::default()
            });
        }
        &mut self.rows[self.active_row]
    }
}
