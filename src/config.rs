/// 程序配置
///
/// 每场考试的细节（页码、噪声规则、分类表）放在 `exams/*.toml` 里，
/// 这里只保存整个进程共用的设置
#[derive(Clone, Debug)]
pub struct Config {
    /// 考试配置文件（TOML）存放目录
    pub profile_folder: String,
    /// 输出 Excel 的根目录
    pub output_folder: String,
    /// 运行日志文件
    pub output_log_file: String,
    /// 被跳过题目的清单文件
    pub warn_file: String,
    /// 调试文本输出目录，None 表示不输出
    pub debug_dump_dir: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- OCR 配置 ---
    pub ocr_api_url: String,
    pub ocr_app_id: String,
    pub ocr_app_key: String,
    /// 图片存储桶地址（题目图片、答案图片的 URL 前缀）
    pub image_bucket_url: String,
    // --- 交互式录入配置 ---
    pub capture_images_dir: String,
    pub capture_workbook: String,
    pub capture_state_file: String,
    pub capture_start_id: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile_folder: "exams".to_string(),
            output_folder: "surinkti".to_string(),
            output_log_file: "output.txt".to_string(),
            warn_file: "warn.txt".to_string(),
            debug_dump_dir: None,
            verbose_logging: false,
            ocr_api_url: "https://api.mathpix.com/v3/text".to_string(),
            ocr_app_id: String::new(),
            ocr_app_key: String::new(),
            image_bucket_url:
                "https://exvpdduqmfmvkvpmbpvp.supabase.co/storage/v1/object/public/task-pictures/"
                    .to_string(),
            capture_images_dir: "images".to_string(),
            capture_workbook: "MatematikaPaveiksl.xlsx".to_string(),
            capture_state_file: "capture_state.json".to_string(),
            capture_start_id: 1702,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            profile_folder: std::env::var("PROFILE_FOLDER").unwrap_or(default.profile_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            warn_file: std::env::var("WARN_FILE").unwrap_or(default.warn_file),
            debug_dump_dir: std::env::var("DEBUG_DUMP_DIR").ok().filter(|v| !v.trim().is_empty()),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            ocr_api_url: std::env::var("OCR_API_URL").unwrap_or(default.ocr_api_url),
            ocr_app_id: std::env::var("OCR_APP_ID").unwrap_or(default.ocr_app_id),
            ocr_app_key: std::env::var("OCR_APP_KEY").unwrap_or(default.ocr_app_key),
            image_bucket_url: std::env::var("IMAGE_BUCKET_URL").unwrap_or(default.image_bucket_url),
            capture_images_dir: std::env::var("CAPTURE_IMAGES_DIR").unwrap_or(default.capture_images_dir),
            capture_workbook: std::env::var("CAPTURE_WORKBOOK").unwrap_or(default.capture_workbook),
            capture_state_file: std::env::var("CAPTURE_STATE_FILE").unwrap_or(default.capture_state_file),
            capture_start_id: std::env::var("CAPTURE_START_ID").ok().and_then(|v| v.parse().ok()).unwrap_or(default.capture_start_id),
        }
    }
}

/// 拼接存储桶中的图片地址，保证中间只有一个 `/`
pub fn image_url(bucket: &str, file_name: &str) -> String {
    format!("{}/{}", bucket.trim_end_matches('/'), file_name.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_single_slash() {
        assert_eq!(image_url("https://b/x/", "12-2.png"), "https://b/x/12-2.png");
        assert_eq!(image_url("https://b/x", "/12.png"), "https://b/x/12.png");
    }
}
