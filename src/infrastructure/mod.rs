//! 基础设施层：PDF、图片、OCR 这些外部资源只在这里接触

pub mod document_loader;
pub mod ocr_client;
pub mod pdf_reader;

pub use document_loader::DocumentLoader;
pub use ocr_client::OcrClient;
