//! OCR 客户端
//!
//! 把页面图片以 base64 data URL 的形式 POST 到识别服务，取回识别出的文本
//! （公式以 `$$...$$` 包裹）

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::CropBox;
use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, error, warn};

/// 识别请求体
#[derive(Debug, Serialize)]
struct OcrRequest<'a> {
    src: String,
    formats: [&'a str; 2],
    math_inline_delimiters: [&'a str; 2],
    math_display_delimiters: [&'a str; 2],
}

/// 识别响应，只关心 text 字段
#[derive(Debug, Deserialize)]
struct OcrResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OCR 客户端
pub struct OcrClient {
    http: reqwest::Client,
    api_url: String,
    app_id: String,
    app_key: String,
}

impl OcrClient {
    /// 创建新的 OCR 客户端，凭据缺失时报错
    pub fn new(config: &Config) -> AppResult<Self> {
        if config.ocr_app_id.trim().is_empty() || config.ocr_app_key.trim().is_empty() {
            return Err(AppError::OcrCredentialsMissing);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            api_url: config.ocr_api_url.clone(),
            app_id: config.ocr_app_id.clone(),
            app_key: config.ocr_app_key.clone(),
        })
    }

    /// 识别一张 PNG 图片
    ///
    /// # 参数
    /// - `png`: PNG 字节
    ///
    /// # 返回
    /// 返回识别出的文本；网络错误或非 2xx 响应返回错误
    pub async fn recognize_png(&self, png: &[u8]) -> Result<String> {
        let body = OcrRequest {
            src: format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(png)),
            formats: ["text", "data"],
            math_inline_delimiters: ["$$", "$$"],
            math_display_delimiters: ["$$", "$$"],
        };

        debug!("调用 OCR API，图片大小: {} 字节", png.len());

        let response = self
            .http
            .post(&self.api_url)
            .header("app_id", &self.app_id)
            .header("app_key", &self.app_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("OCR 请求失败: {}", self.api_url))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("OCR API 返回错误: {} - {}", status, text);
        }

        let parsed: OcrResponse = response.json().await.context("OCR 响应解析失败")?;
        if let Some(err) = parsed.error {
            warn!("OCR API 报告错误: {}", err);
        }

        Ok(parsed.text.unwrap_or_default())
    }

    /// 识别一张图片，失败时记录错误并返回空字符串
    pub async fn recognize_or_empty(&self, png: &[u8], label: &str) -> String {
        match self.recognize_png(png).await {
            Ok(text) => text,
            Err(e) => {
                error!("❌ {} 识别失败，按空文本处理: {:#}", label, e);
                String::new()
            }
        }
    }
}

/// 裁掉图片四边，尺寸不够时保留原图
pub fn crop_image(img: DynamicImage, crop: CropBox) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    let w = width.saturating_sub(crop.left + crop.right);
    let h = height.saturating_sub(crop.top + crop.bottom);

    if w == 0 || h == 0 {
        warn!("⚠️ 裁剪尺寸 {:?} 超出图片大小 {}x{}，使用原图", crop, width, height);
        return img;
    }

    img.crop_imm(crop.left, crop.top, w, h)
}

/// 读取图片、裁剪并编码为 PNG
pub fn load_png(path: &Path, crop: CropBox) -> AppResult<Vec<u8>> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(AppError::DocumentNotFound { path: display });
    }

    let img = image::open(path).map_err(|source| AppError::ImageFailed {
        path: display.clone(),
        source,
    })?;
    let img = crop_image(img, crop);

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|source| AppError::ImageFailed { path: display, source })?;

    Ok(bytes)
}
