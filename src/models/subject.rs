/// 科目枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Subject {
    /// 化学
    Chemistry,
    /// 生物
    Biology,
    /// 物理
    Physics,
    /// 数学
    Math,
}

impl Subject {
    /// 获取标准名称（立陶宛语）
    pub fn name(self) -> &'static str {
        match self {
            Subject::Chemistry => "Chemija",
            Subject::Biology => "Biologija",
            Subject::Physics => "Fizika",
            Subject::Math => "Matematika",
        }
    }

    /// 输出目录名
    pub fn dir_name(self) -> &'static str {
        match self {
            Subject::Chemistry => "Chem",
            Subject::Biology => "Bio",
            Subject::Physics => "Fiz",
            Subject::Math => "Mat",
        }
    }

    /// 尝试从字符串解析科目（精确匹配，忽略大小写）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "chemistry" | "chemija" | "chem" => Some(Subject::Chemistry),
            "biology" | "biologija" | "bio" => Some(Subject::Biology),
            "physics" | "fizika" | "fiz" => Some(Subject::Physics),
            "math" | "mathematics" | "matematika" | "mat" => Some(Subject::Math),
            _ => None,
        }
    }

    /// 智能查找科目（支持模糊匹配，如 "VBE_Fizika_2024"）
    pub fn find(s: &str) -> Option<Self> {
        if let Some(subject) = Self::from_str(s) {
            return Some(subject);
        }

        let s_lower = s.to_lowercase();
        if s_lower.contains("chem") {
            return Some(Subject::Chemistry);
        }
        if s_lower.contains("biolog") {
            return Some(Subject::Biology);
        }
        if s_lower.contains("fizik") || s_lower.contains("physic") {
            return Some(Subject::Physics);
        }
        if s_lower.contains("matemat") || s_lower.contains("math") {
            return Some(Subject::Math);
        }

        None
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<String> for Subject {
    type Error = crate::error::AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Subject::find(&value).ok_or(crate::error::AppError::UnknownSubject { subject: value })
    }
}

impl From<Subject> for String {
    fn from(subject: Subject) -> Self {
        subject.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_lithuanian_names() {
        assert_eq!(Subject::from_str("Chemija"), Some(Subject::Chemistry));
        assert_eq!(Subject::from_str("biology"), Some(Subject::Biology));
        assert_eq!(Subject::from_str("istorija"), None);
    }

    #[test]
    fn test_find_fuzzy() {
        assert_eq!(Subject::find("VBE_Fizika_2024_Pagrindine"), Some(Subject::Physics));
        assert_eq!(Subject::find("MatematikaPaveiksl"), Some(Subject::Math));
    }
}
