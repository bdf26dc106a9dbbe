//! PDF 文本提取
//!
//! `pdf_extract` 遇到损坏的文件可能直接 panic，所以调用放在 `catch_unwind` 里

use crate::error::{AppError, AppResult};
use crate::models::PageRange;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, warn};

/// 读取 PDF 全部页面的文本，每页一个 `String`
pub fn extract_pages(path: &Path) -> AppResult<Vec<String>> {
    let display = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|e| AppError::io(&display, e))?;

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&bytes)
    }));

    match result {
        Ok(Ok(pages)) => {
            let path_str = &display;
            debug!("{} 共 {} 页", path_str, pages.len());
            Ok(pages)
        }
        Ok(Err(e)) => Err(AppError::DocumentUnreadable {
            path: display,
            reason: e.to_string(),
        }),
        Err(_) => Err(AppError::DocumentUnreadable {
            path: display,
            reason: "PDF 解析崩溃（文件可能已损坏）".to_string(),
        }),
    }
}

/// 读取指定页码范围的文本，页与页之间用换行连接
///
/// # 参数
/// - `path`: PDF 路径
/// - `range`: 从 1 开始的页码范围，两端包含
///
/// # 返回
/// 返回拼接后的文本；页码越界时返回 `PageOutOfRange`
pub fn extract_page_range(path: &Path, range: PageRange) -> AppResult<String> {
    let pages = extract_pages(path)?;
    let text = select_pages(&pages, range).ok_or_else(|| AppError::PageOutOfRange {
        path: path.display().to_string(),
        start: range.start,
        end: range.end,
        total: pages.len(),
    })?;

    if text.trim().is_empty() {
        warn!("⚠️ {} 第 {}-{} 页没有可提取的文本（可能是扫描件）", path.display(), range.start, range.end);
    }

    Ok(text)
}

/// 按页码范围拼接页面，范围无效时返回 None
pub fn select_pages(pages: &[String], range: PageRange) -> Option<String> {
    if range.start == 0 || range.start > range.end || range.end > pages.len() {
        return None;
    }

    Some(pages[range.start - 1..range.end].join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> Vec<String> {
        vec!["viršelis".into(), "01. A".into(), "02. B".into()]
    }

    #[test]
    fn test_select_pages_joins_with_newline() {
        assert_eq!(select_pages(&pages(), PageRange::new(2, 3)).unwrap(), "01. A\n02. B");
    }

    #[test]
    fn test_select_pages_out_of_range() {
        assert!(select_pages(&pages(), PageRange::new(2, 4)).is_none());
        assert!(select_pages(&pages(), PageRange::new(0, 1)).is_none());
        assert!(select_pages(&pages(), PageRange::new(3, 2)).is_none());
    }

    #[test]
    fn test_missing_pdf_is_not_found() {
        let err = extract_page_range(Path::new("no/such/exam.pdf"), PageRange::new(1, 1)).unwrap_err();
        assert!(matches!(err, AppError::DocumentNotFound { .. }));
    }
}
