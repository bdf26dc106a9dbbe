use thiserror::Error;

/// 应用程序错误类型
///
/// 只覆盖会中止一场考试的错误；缺少分节标记、格式不对的题目块、
/// OCR 单页失败都只记日志，不会走到这里
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    DocumentNotFound { path: String },

    /// PDF 无法读取或解析
    #[error("无法读取文档 ({path}): {reason}")]
    DocumentUnreadable { path: String, reason: String },

    /// 页码超出文档范围
    #[error("页码范围 {start}-{end} 超出文档 {path} 的 {total} 页")]
    PageOutOfRange {
        path: String,
        start: usize,
        end: usize,
        total: usize,
    },

    /// 配置中的正则表达式无效
    #[error("无效的正则表达式 `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// 考试配置文件解析失败
    #[error("考试配置解析失败 ({path}): {source}")]
    ProfileParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// 无法识别的科目
    #[error("无法解析科目: {subject}")]
    UnknownSubject { subject: String },

    /// Excel 写入失败
    #[error("写入表格失败 ({path}): {source}")]
    SpreadsheetWriteFailed {
        path: String,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    /// OCR 凭据缺失
    #[error("OCR 凭据未配置 (OCR_APP_ID / OCR_APP_KEY)")]
    OcrCredentialsMissing,

    /// 图片读取或编码失败
    #[error("图片处理失败 ({path}): {source}")]
    ImageFailed {
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// 文件读写错误
    #[error("文件错误 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建正则错误
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        AppError::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// 创建文件读写错误，文件不存在时归为 `DocumentNotFound`
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            AppError::DocumentNotFound { path }
        } else {
            AppError::Io { path, source }
        }
    }

    /// 创建表格写入错误
    pub fn spreadsheet(path: impl Into<String>, source: rust_xlsxwriter::XlsxError) -> Self {
        AppError::SpreadsheetWriteFailed {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_not_found_maps_to_document_not_found() {
        let err = AppError::io(
            "egzai/2017.pdf",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, AppError::DocumentNotFound { .. }));
        assert!(err.to_string().contains("egzai/2017.pdf"));
    }

    #[test]
    fn test_other_io_kind_stays_io() {
        let err = AppError::io(
            "out.xlsx",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, AppError::Io { .. }));
    }
}
