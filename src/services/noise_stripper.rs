//! 去噪服务 - 业务能力层
//!
//! 按顺序执行一组 (模式, 替换) 规则，去掉页眉页脚、页码、试卷代码等

use crate::error::{AppError, AppResult};
use crate::models::NoiseRule;
use regex::Regex;

/// 编译后的规则
#[derive(Debug)]
enum CompiledRule {
    Literal {
        needle: String,
        replacement: String,
    },
    Pattern {
        re: Regex,
        replacement: String,
        guard: Option<Regex>,
    },
}

/// 去噪服务
///
/// 规则为空或没有匹配时原样返回（只去掉首尾空白）
#[derive(Debug, Default)]
pub struct NoiseStripper {
    rules: Vec<CompiledRule>,
}

impl NoiseStripper {
    /// 编译规则，任意一条正则无效即报错
    pub fn new(rules: &[NoiseRule]) -> AppResult<Self> {
        let rules = rules
            .iter()
            .map(compile_rule)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 依次应用所有规则
    pub fn strip(&self, text: &str) -> String {
        let mut text = text.to_string();
        for rule in &self.rules {
            text = apply_rule(rule, &text);
        }
        text.trim().to_string()
    }
}

fn compile_rule(rule: &NoiseRule) -> AppResult<CompiledRule> {
    if rule.literal {
        return Ok(CompiledRule::Literal {
            needle: rule.pattern.clone(),
            replacement: rule.replacement.clone(),
        });
    }

    let re = Regex::new(&rule.pattern).map_err(|e| AppError::invalid_pattern(&rule.pattern, e))?;
    let guard = rule
        .unless_followed_by
        .as_deref()
        .map(|g| Regex::new(&format!("^(?:{})", g)).map_err(|e| AppError::invalid_pattern(g, e)))
        .transpose()?;

    Ok(CompiledRule::Pattern {
        re,
        replacement: rule.replacement.clone(),
        guard,
    })
}

fn apply_rule(rule: &CompiledRule, text: &str) -> String {
    match rule {
        CompiledRule::Literal {
            needle,
            replacement,
        } => {
            if needle.is_empty() {
                text.to_string()
            } else {
                text.replace(needle.as_str(), replacement)
            }
        }
        CompiledRule::Pattern {
            re,
            replacement,
            guard: None,
        } => re.replace_all(text, replacement.as_str()).into_owned(),
        CompiledRule::Pattern {
            re,
            replacement,
            guard: Some(guard),
        } => {
            let mut out = String::with_capacity(text.len());
            let mut last = 0;
            for caps in re.captures_iter(text) {
                let Some(m) = caps.get(0) else { continue };
                if guard.is_match(&text[m.end()..]) {
                    continue;
                }
                out.push_str(&text[last..m.start()]);
                caps.expand(replacement, &mut out);
                last = m.end();
            }
            out.push_str(&text[last..]);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chemistry_rules() -> Vec<NoiseRule> {
        vec![
            NoiseRule::regex(
                r"(?is)RIBOTO NAUDOJIMO.*?\)\s*|CHEMIJA\s+●.*?sesija|NEPAMIRŠKITE.*?LAPĄ",
                "",
            ),
            NoiseRule::regex(r"(?m)^[A-ZĄČĘĖĮŠŲŪŽ\s]{10,}$", ""),
            NoiseRule::regex(r"(?m)^[A-Z0-9]{6,}$", ""),
            NoiseRule::regex(r"(?m)^\s*\d{1,3}\s*$", ""),
            NoiseRule::literal("171CHVU0"),
            NoiseRule::literal("Juodraštis"),
            NoiseRule::literal("*"),
            NoiseRule::regex(r"\n\s*\n+", "\n\n"),
            NoiseRule::regex(r"([a-zA-Z])\d+", "${1}").unless_followed_by(r"\."),
        ]
    }

    #[test]
    fn test_rules_applied_in_order() {
        let stripper = NoiseStripper::new(&[
            NoiseRule::literal("AB"),
            NoiseRule::regex("A", "x"),
        ])
        .unwrap();
        assert_eq!(stripper.strip("AAB"), "x");
    }

    #[test]
    fn test_header_footer_removed() {
        let stripper = NoiseStripper::new(&chemistry_rules()).unwrap();
        let raw = "RIBOTO NAUDOJIMO (iki egzamino pabaigos)\n01. Kuri medžiaga*?\n\n\n3\n171CHVU0\nA vanduo\nJuodraštis";
        assert_eq!(stripper.strip(raw), "01. Kuri medžiaga?\n\nA vanduo");
    }

    #[test]
    fn test_guarded_rule_keeps_digits_before_dot() {
        let stripper = NoiseStripper::new(&[
            NoiseRule::regex(r"([a-zA-Z])\d+", "${1}").unless_followed_by(r"\."),
        ])
        .unwrap();
        assert_eq!(stripper.strip("ląstele1 ir b2 bet ne v12."), "ląstele ir b bet ne v12.");
    }

    #[test]
    fn test_absent_matches_are_noops() {
        let stripper = NoiseStripper::new(&chemistry_rules()).unwrap();
        let clean = "01. Kuri medžiaga yra?\nA vanduo\nB druska";
        assert_eq!(stripper.strip(clean), clean);
    }

    #[test]
    fn test_strip_is_idempotent() {
        let stripper = NoiseStripper::new(&chemistry_rules()).unwrap();
        let raw = "CHEMIJA ● 2017 m. pagrindinė sesija\nVALSTYBINIO BRANDOS EGZAMINO\n02. Kiek H2O molekulių*\n\n\n\n12\nA 1\nB 2.\nNEPAMIRŠKITE PERKELTI ATSAKYMŲ Į ATSAKYMŲ LAPĄ";
        let once = stripper.strip(raw);
        assert_eq!(stripper.strip(&once), once);
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        let err = NoiseStripper::new(&[NoiseRule::regex("(unclosed", "")]).unwrap_err();
        assert!(matches!(err, AppError::InvalidPattern { .. }));
    }

    #[test]
    fn test_empty_rules() {
        let stripper = NoiseStripper::default();
        assert!(stripper.is_empty());
        assert_eq!(stripper.strip("  tekstas \n"), "tekstas");
    }
}
