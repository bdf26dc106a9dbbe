//! 文本修正服务 - 业务能力层
//!
//! OCR 常把立陶宛字母识别成带错误附加符号的字符，这里按顺序做字符串替换

use phf::{phf_ordered_map, OrderedMap};

/// 内置的 OCR 字符修正表，按顺序应用
static DEFAULT_REPAIRS: OrderedMap<&'static str, &'static str> = phf_ordered_map! {
    "ė̀" => "ė",
    "ė́" => "ė",
    "ė̃" => "ė",
    "í̇" => "i",
    "į̇" => "į",
    "ū̀" => "ū",
    "č́" => "č",
    "š́" => "š",
    "ž́" => "ž",
    "a̧" => "ą",
    "è" => "ė",
    "ě" => "ė",
    "é" => "ė",
    "ẻ" => "ė",
    "õ" => "o",
    "ì" => "i",
    "í" => "i",
    "ı" => "i",
    "ị" => "į",
    "İ" => "į",
    "ù" => "u",
    "û" => "u",
    "ú" => "ų",
    "ư" => "ų",
    "ụ" => "ų",
    "ñ" => "n",
    "à" => "a",
    "ş" => "š",
};

/// 文本修正服务
#[derive(Debug, Clone, Default)]
pub struct TextRepair {
    pairs: Vec<(String, String)>,
}

impl TextRepair {
    /// 创建修正表
    ///
    /// # 参数
    /// - `pairs`: 考试专用的 `[错误, 正确]` 对
    /// - `with_defaults`: 是否在前面加上内置字符修正表
    pub fn new(pairs: &[[String; 2]], with_defaults: bool) -> Self {
        let mut all: Vec<(String, String)> = Vec::new();
        if with_defaults {
            all.extend(
                DEFAULT_REPAIRS
                    .entries()
                    .map(|(wrong, right)| (wrong.to_string(), right.to_string())),
            );
        }
        all.extend(
            pairs
                .iter()
                .filter(|[wrong, _]| !wrong.is_empty())
                .map(|[wrong, right]| (wrong.clone(), right.clone())),
        );
        Self { pairs: all }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// 依次应用所有替换
    pub fn apply(&self, text: &str) -> String {
        self.pairs
            .iter()
            .fold(text.to_string(), |acc, (wrong, right)| acc.replace(wrong, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(wrong: &str, right: &str) -> [String; 2] {
        [wrong.to_string(), right.to_string()]
    }

    #[test]
    fn test_default_table() {
        let repair = TextRepair::new(&[], true);
        assert_eq!(repair.apply("grèitis"), "grėitis");
        assert_eq!(repair.apply("kūnù"), "kūnu");
    }

    #[test]
    fn test_profile_pairs_after_defaults() {
        let repair = TextRepair::new(&[pair("ivair", "įvair"), pair("$${ }^{1}$$", "")], true);
        assert_eq!(repair.apply("ivairūs kūnai$${ }^{1}$$"), "įvairūs kūnai");
    }

    #[test]
    fn test_pairs_applied_in_order() {
        let repair = TextRepair::new(&[pair("ab", "x"), pair("x", "y")], false);
        assert_eq!(repair.apply("ab"), "y");
    }

    #[test]
    fn test_empty_table_is_identity() {
        let repair = TextRepair::new(&[pair("", "z")], false);
        assert!(repair.is_empty());
        assert_eq!(repair.apply("Mechanika"), "Mechanika");
    }
}
