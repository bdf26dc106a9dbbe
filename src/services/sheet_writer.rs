//! 表格写入服务 - 业务能力层
//!
//! 只负责"把行写成 xlsx"，一行表头加每题一行

use crate::error::{AppError, AppResult};
use crate::models::QuestionRow;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::info;

/// 固定表头
pub const HEADERS: [&str; 8] = [
    "Question No.",
    "Category",
    "Question",
    "Correct Answer",
    "Wrong Option 1",
    "Wrong Option 2",
    "Wrong Option 3",
    "fa_check",
];

/// 图片列表头
pub const IMAGE_HEADER: &str = "image";

/// 表格写入服务
#[derive(Debug, Clone, Copy)]
pub struct SheetWriter {
    image_column: bool,
}

impl SheetWriter {
    pub fn new(image_column: bool) -> Self {
        Self { image_column }
    }

    /// 列名
    pub fn headers(&self) -> Vec<&'static str> {
        let mut headers = HEADERS.to_vec();
        if self.image_column {
            headers.push(IMAGE_HEADER);
        }
        headers
    }

    /// 写入工作簿，覆盖已有文件
    ///
    /// # 参数
    /// - `path`: 输出路径，父目录不存在时自动创建
    /// - `rows`: 按输出顺序排列的行
    pub fn write<'r>(
        &self,
        path: &Path,
        rows: impl IntoIterator<Item = &'r QuestionRow>,
    ) -> AppResult<usize> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::io(parent.display().to_string(), e))?;
        }

        let to_err = |e: XlsxError| AppError::spreadsheet(path.display().to_string(), e);

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        for (col, header) in self.headers().iter().enumerate() {
            sheet.write_string(0, col as u16, *header).map_err(to_err)?;
        }

        let mut count = 0;
        for (i, row) in rows.into_iter().enumerate() {
            self.write_row(sheet, i as u32 + 1, row).map_err(to_err)?;
            count += 1;
        }

        workbook.save(path).map_err(to_err)?;
        info!("💾 已写入 {} 行到 {}", count, path.display());

        Ok(count)
    }

    fn write_row(&self, sheet: &mut Worksheet, r: u32, row: &QuestionRow) -> Result<(), XlsxError> {
        sheet.write_string(r, 0, &row.number)?;
        if let Some(category) = &row.category {
            sheet.write_string(r, 1, category)?;
        }
        sheet.write_string(r, 2, &row.question)?;
        sheet.write_string(r, 3, &row.correct_answer)?;
        for (i, wrong) in row.wrong_answers.iter().enumerate() {
            sheet.write_string(r, 4 + i as u16, wrong)?;
        }
        sheet.write_boolean(r, 7, row.fa_check)?;
        if self.image_column {
            if let Some(image) = &row.image {
                sheet.write_string(r, 8, image)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_with_and_without_image() {
        assert_eq!(SheetWriter::new(false).headers().len(), 8);
        let headers = SheetWriter::new(true).headers();
        assert_eq!(headers.len(), 9);
        assert_eq!(headers[8], "image");
        assert_eq!(headers[0], "Question No.");
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Chem").join("2017.xlsx");
        let rows = vec![
            QuestionRow {
                number: "01".into(),
                question: "Kas?".into(),
                correct_answer: "z".into(),
                ..Default::default()
            },
            QuestionRow {
                number: "02".into(),
                fa_check: true,
                image: Some("https://b/02.png".into()),
                ..Default::default()
            },
        ];

        let written = SheetWriter::new(true).write(&path, &rows).unwrap();
        assert_eq!(written, 2);
        assert!(path.exists());
    }
}
