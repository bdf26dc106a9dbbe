//! 公式格式化服务 - 业务能力层
//!
//! 把题干和选项里的单位、分数、希腊字母改写成 `$$...$$` 包裹的 LaTeX。
//! 规则写在考试配置的 `latex_rules` 中，格式与去噪规则相同，按顺序执行

use crate::error::AppResult;
use crate::models::NoiseRule;
use crate::services::noise_stripper::NoiseStripper;

/// 公式格式化服务
#[derive(Debug, Default)]
pub struct LatexFormatter {
    rules: NoiseStripper,
}

impl LatexFormatter {
    /// 编译规则，任意一条正则无效即报错
    pub fn new(rules: &[NoiseRule]) -> AppResult<Self> {
        Ok(Self {
            rules: NoiseStripper::new(rules)?,
        })
    }

    /// 格式化一段文本，未配置规则时原样返回
    pub fn apply(&self, text: &str) -> String {
        if self.rules.is_empty() {
            return text.to_string();
        }
        self.rules.strip(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 替换串中 `$$` 表示一个 `$`
    fn physics_rules() -> Vec<NoiseRule> {
        vec![
            NoiseRule::regex(r"(\d+)\s*m/s(?:2|\^2)", r"$$$$${1}\ \mathrm{m/s^{2}}$$$$"),
            NoiseRule::regex(r"(\d+(?:[.,]\d+)?)\s*m(?:3|\^3)", r"$$$$${1}\ \mathrm{m^{3}}$$$$"),
            NoiseRule::regex(r"(\d+)\s*°C", r"$$$$${1}\,^{\circ}\mathrm{C}$$$$"),
            NoiseRule {
                replacement: "P".into(),
                ..NoiseRule::literal("𝑃")
            },
            NoiseRule::regex(r"\b([A-Za-z]+)\s*/\s*([A-Za-z]+)\b", r"$$$$\frac{${1}}{${2}}$$$$")
                .unless_followed_by(r"\^"),
            NoiseRule::regex(r"\b(\d+)\s*/\s*(\d+)\b", r"$$$$\frac{${1}}{${2}}$$$$"),
            NoiseRule::regex(r"(?i)\balfa\b", r"$$$$\alpha$$$$"),
            NoiseRule {
                replacement: r"$$\lambda$$".into(),
                ..NoiseRule::literal("λ")
            },
            NoiseRule {
                replacement: r"$$\Omega$$".into(),
                ..NoiseRule::literal("Ω")
            },
            NoiseRule {
                replacement: r"$$^{\circ}$$".into(),
                ..NoiseRule::literal("°")
            },
        ]
    }

    #[test]
    fn test_units() {
        let formatter = LatexFormatter::new(&physics_rules()).unwrap();
        assert_eq!(formatter.apply("a = 10 m/s2"), r"a = $$10\ \mathrm{m/s^{2}}$$");
        assert_eq!(formatter.apply("V = 2,5 m3"), r"V = $$2,5\ \mathrm{m^{3}}$$");
        assert_eq!(formatter.apply("t = 20 °C"), r"t = $$20\,^{\circ}\mathrm{C}$$");
    }

    #[test]
    fn test_fractions_and_symbols() {
        let formatter = LatexFormatter::new(&physics_rules()).unwrap();
        assert_eq!(formatter.apply("𝑃t/h"), r"$$\frac{Pt}{h}$$");
        assert_eq!(formatter.apply("1/2 kelio"), r"$$\frac{1}{2}$$ kelio");
        assert_eq!(formatter.apply("Alfa dalelė"), r"$$\alpha$$ dalelė");
        assert_eq!(formatter.apply("λ ir 5 Ω"), r"$$\lambda$$ ir 5 $$\Omega$$");
        assert_eq!(formatter.apply("kampas 30°"), r"kampas 30$$^{\circ}$$");
    }

    #[test]
    fn test_unit_exponent_is_not_a_fraction() {
        let formatter = LatexFormatter::new(&physics_rules()).unwrap();
        assert_eq!(formatter.apply("9 m/s^2"), r"$$9\ \mathrm{m/s^{2}}$$");
        assert_eq!(formatter.apply("greitis km/h"), r"greitis $$\frac{km}{h}$$");
    }

    #[test]
    fn test_no_rules_is_identity() {
        let formatter = LatexFormatter::default();
        assert_eq!(formatter.apply(" 2.5 m/s "), " 2.5 m/s ");
    }
}
