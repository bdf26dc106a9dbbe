pub mod loaders;
pub mod profile;
pub mod question;
pub mod subject;

pub use loaders::{load_all_profiles, load_profile};
pub use profile::{
    AnswerKeyProfile, CategoryTable, CropBox, ExamProfile, HeadingRule, ImagePolicy, KeywordRule,
    NoiseRule, PageRange, TextSource,
};
pub use question::{
    pad_number, AnswerKey, IncompleteBlock, McqBlock, OpenBlock, QuestionKind, QuestionRow,
    SkipReason, SkippedQuestion,
};
pub use subject::Subject;
