//! 录入命令处理
//!
//! 把命令翻译成会话事件，执行 OCR / 图片复制，并在每个事件后
//! 保存会话 JSON、重写工作簿

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::capture::command::{Command, TextTarget};
use crate::capture::session::{CaptureEvent, CaptureOutcome, CaptureSession};
use crate::config::Config;
use crate::infrastructure::ocr_client::load_png;
use crate::infrastructure::OcrClient;
use crate::models::CropBox;
use crate::services::SheetWriter;

/// 文本识别能力
///
/// 录入工具只需要"图片 -> 文本"，测试中可替换
#[allow(async_fn_in_trait)]
pub trait Recognizer {
    async fn recognize(&self, png: &[u8], label: &str) -> String;
}

impl Recognizer for OcrClient {
    async fn recognize(&self, png: &[u8], label: &str) -> String {
        self.recognize_or_empty(png, label).await
    }
}

/// 录入处理器
pub struct CaptureHandler<R: Recognizer> {
    session: CaptureSession,
    recognizer: R,
    images_dir: PathBuf,
    workbook_path: PathBuf,
    state_path: PathBuf,
    writer: SheetWriter,
}

impl CaptureHandler<OcrClient> {
    /// 按配置创建处理器，状态文件存在时继续上次的会话
    pub fn from_config(config: &Config) -> Result<Self> {
        let recognizer = OcrClient::new(config)?;
        Self::open(
            recognizer,
            config.capture_start_id,
            &config.image_bucket_url,
            Path::new(&config.capture_images_dir),
            Path::new(&config.capture_workbook),
            Path::new(&config.capture_state_file),
        )
    }
}

impl<R: Recognizer> CaptureHandler<R> {
    pub fn open(
        recognizer: R,
        start_id: u32,
        bucket: &str,
        images_dir: &Path,
        workbook_path: &Path,
        state_path: &Path,
    ) -> Result<Self> {
        // 每次保存都会重写工作簿，不能接管一个没有会话记录的已有文件
        if workbook_path.exists() && !state_path.exists() {
            anyhow::bail!(
                "工作簿 {} 已存在但没有会话文件 {}，请换一个 CAPTURE_WORKBOOK 路径",
                workbook_path.display(),
                state_path.display()
            );
        }

        std::fs::create_dir_all(images_dir)
            .with_context(|| format!("无法创建图片目录 {}", images_dir.display()))?;

        let session = if state_path.exists() {
            let json = std::fs::read_to_string(state_path)
                .with_context(|| format!("无法读取会话文件 {}", state_path.display()))?;
            let session: CaptureSession = serde_json::from_str(&json)
                .with_context(|| format!("会话文件格式错误 {}", state_path.display()))?;
            info!("📂 继续上次的会话，当前题号 {}", session.current_qid);
            session
        } else {
            CaptureSession::new(start_id, bucket)
        };

        Ok(Self {
            session,
            recognizer,
            images_dir: images_dir.to_path_buf(),
            workbook_path: workbook_path.to_path_buf(),
            state_path: state_path.to_path_buf(),
            writer: SheetWriter::new(true),
        })
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    /// 处理一条命令
    ///
    /// # 返回
    /// 返回 false 表示退出
    pub async fn handle(&mut self, command: Command) -> Result<bool> {
        let (event, source) = match command {
            Command::Exit => return Ok(false),
            Command::Next => (CaptureEvent::Finalize, None),
            Command::SaveQuestionImage(path) => (CaptureEvent::QuestionImage, Some(path)),
            Command::SaveAnswerImage(path) => (CaptureEvent::AnswerImage, Some(path)),
            Command::Ocr { target, image } => {
                let png = load_png(&image, CropBox::default())?;
                let text = self
                    .recognizer
                    .recognize(&png, &image.display().to_string())
                    .await;
                if text.is_empty() {
                    warn!("⚠️ 未识别到文本: {}", image.display());
                    return Ok(true);
                }
                info!("📝 识别结果:\n{}", text);
                let event = match target {
                    TextTarget::Question => CaptureEvent::QuestionText(text),
                    TextTarget::CorrectAnswer => CaptureEvent::CorrectAnswer(text),
                    TextTarget::FalseAnswer => CaptureEvent::FalseAnswer(text),
                };
                (event, None)
            }
        };

        match self.session.apply(event) {
            CaptureOutcome::Image { file_name } => {
                if let Some(source) = source {
                    let target = self.images_dir.join(&file_name);
                    std::fs::copy(&source, &target).with_context(|| {
                        format!("无法保存图片 {} -> {}", source.display(), target.display())
                    })?;
                    info!("🖼 图片已保存: {}", target.display());
                }
            }
            CaptureOutcome::SlotsFull => return Ok(true),
            CaptureOutcome::Recorded | CaptureOutcome::Advanced { .. } => {}
        }

        self.persist()?;
        Ok(true)
    }

    /// 保存会话并重写工作簿
    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.session)?;
        std::fs::write(&self.state_path, json)
            .with_context(|| format!("无法写入会话文件 {}", self.state_path.display()))?;

        self.writer.write(&self.workbook_path, &self.session.rows)?;
        info!("📗 已写入 {}", self.workbook_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedText(&'static str);

    impl Recognizer for FixedText {
        async fn recognize(&self, _png: &[u8], _label: &str) -> String {
            self.0.to_string()
        }
    }

    fn write_png(path: &Path) {
        image::RgbImage::new(4, 4).save(path).unwrap();
    }

    fn handler(dir: &Path, text: &'static str) -> CaptureHandler<FixedText> {
        CaptureHandler::open(
            FixedText(text),
            1702,
            "https://bucket/task-pictures/",
            &dir.join("images"),
            &dir.join("out.xlsx"),
            &dir.join("state.json"),
        )
        .unwrap()
    }

    #[test]
    fn test_ocr_and_images_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let snip = dir.path().join("snip.png");
        write_png(&snip);

        let mut h = handler(dir.path(), "$$x+1$$");
        tokio_test::block_on(async {
            h.handle(Command::parse(&format!("q {}", snip.display())).unwrap()).await.unwrap();
            h.handle(Command::SaveAnswerImage(snip.clone())).await.unwrap();
        });

        assert_eq!(h.session().rows[0].question, "$$x+1$$");
        assert!(dir.path().join("images").join("1702-1.png").exists());
        assert!(dir.path().join("out.xlsx").exists());
        assert!(dir.path().join("state.json").exists());
    }

    #[test]
    fn test_session_resumes_from_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = handler(dir.path(), "x");
        tokio_test::block_on(h.handle(Command::Next)).unwrap();
        drop(h);

        let resumed = handler(dir.path(), "x");
        assert_eq!(resumed.session().current_qid, 1703);
    }

    #[test]
    fn test_existing_workbook_without_session_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("out.xlsx"), b"earlier rows").unwrap();

        let result = CaptureHandler::open(
            FixedText("x"),
            1702,
            "https://bucket/task-pictures/",
            &dir.path().join("images"),
            &dir.path().join("out.xlsx"),
            &dir.path().join("state.json"),
        );

        assert!(result.is_err());
        assert_eq!(std::fs::read(dir.path().join("out.xlsx")).unwrap(), b"earlier rows");
    }

    #[test]
    fn test_exit_and_empty_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let snip = dir.path().join("snip.png");
        write_png(&snip);

        let mut h = handler(dir.path(), "");
        let keep_going = tokio_test::block_on(h.handle(Command::Ocr {
            target: TextTarget::Question,
            image: snip,
        }))
        .unwrap();
        assert!(keep_going);
        assert!(h.session().rows.is_empty());
        assert!(!tokio_test::block_on(h.handle(Command::Exit)).unwrap());
    }
}
