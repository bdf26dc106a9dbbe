pub mod answer_key;
pub mod category;
pub mod latex_formatter;
pub mod mcq_parser;
pub mod noise_stripper;
pub mod open_parser;
pub mod row_assembler;
pub mod section_splitter;
pub mod sheet_writer;
pub mod text_repair;
pub mod warn_writer;

pub use answer_key::AnswerKeyResolver;
pub use category::CategoryClassifier;
pub use latex_formatter::LatexFormatter;
pub use mcq_parser::McqParser;
pub use noise_stripper::NoiseStripper;
pub use open_parser::OpenParser;
pub use row_assembler::{AssembledRows, RowAssembler};
pub use section_splitter::{Sections, SectionSplitter};
pub use sheet_writer::SheetWriter;
pub use text_repair::TextRepair;
pub use warn_writer::WarnWriter;
