//! 文档文本加载
//!
//! 两种来源：PDF 自带的文本层，或者预先渲染好的页面图片经远程 OCR 识别

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::ocr_client::{load_png, OcrClient};
use crate::infrastructure::pdf_reader;
use crate::models::{CropBox, PageRange, TextSource};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// 文档加载器
pub enum DocumentLoader {
    /// PDF 文本层
    Pdf,
    /// 页面图片 + OCR
    Ocr {
        client: OcrClient,
        images_dir: PathBuf,
        crop: CropBox,
    },
}

impl DocumentLoader {
    /// 根据考试配置的文本来源创建加载器
    pub fn for_source(source: &TextSource, config: &Config) -> AppResult<Self> {
        match source {
            TextSource::Pdf => Ok(DocumentLoader::Pdf),
            TextSource::Ocr { images_dir, crop } => Ok(DocumentLoader::Ocr {
                client: OcrClient::new(config)?,
                images_dir: images_dir.clone(),
                crop: *crop,
            }),
        }
    }

    /// 加载指定页码范围的文本
    ///
    /// # 参数
    /// - `path`: 文档路径（OCR 模式下只用于日志）
    /// - `range`: 从 1 开始的页码范围
    ///
    /// # 返回
    /// 返回拼接后的纯文本。文件缺失、页码越界直接报错；
    /// OCR 单页失败按空文本处理
    pub async fn load(&self, path: &Path, range: PageRange) -> Result<String> {
        match self {
            DocumentLoader::Pdf => {
                info!("📄 读取 PDF 文本: {} (第 {}-{} 页)", path.display(), range.start, range.end);
                Ok(pdf_reader::extract_page_range(path, range)?)
            }
            DocumentLoader::Ocr {
                client,
                images_dir,
                crop,
            } => {
                info!("📤 OCR 识别: {} (第 {}-{} 页)", path.display(), range.start, range.end);
                let mut all_text = String::new();
                for page in range.pages() {
                    let image_path = page_image_path(images_dir, page);
                    info!("  → 正在处理第 {} 页...", page);
                    let png = load_png(&image_path, *crop)?;
                    let text = client
                        .recognize_or_empty(&png, &format!("第 {} 页", page))
                        .await;
                    all_text.push('\n');
                    all_text.push_str(&text);
                }
                Ok(all_text)
            }
        }
    }
}

/// 页面图片路径 `page_{n}.png`
pub fn page_image_path(images_dir: &Path, page: usize) -> PathBuf {
    images_dir.join(format!("page_{}.png", page))
}

/// 文档不存在时提前报错
pub fn ensure_exists(path: &Path) -> AppResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(AppError::DocumentNotFound {
            path: path.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_image_path() {
        assert_eq!(
            page_image_path(Path::new("ocr_pages"), 3),
            Path::new("ocr_pages").join("page_3.png")
        );
    }

    #[test]
    fn test_ocr_loader_missing_page_image_is_error() {
        let config = Config {
            ocr_app_id: "id".to_string(),
            ocr_app_key: "key".to_string(),
            ..Config::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let loader = DocumentLoader::for_source(
            &TextSource::Ocr {
                images_dir: dir.path().to_path_buf(),
                crop: CropBox::default(),
            },
            &config,
        )
        .unwrap();

        let result = tokio_test::block_on(loader.load(Path::new("2009.pdf"), PageRange::new(3, 3)));
        assert!(result.is_err());
    }

    #[test]
    fn test_ensure_exists() {
        assert!(ensure_exists(Path::new("no/such/file.pdf")).is_err());
    }
}
