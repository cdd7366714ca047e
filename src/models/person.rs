use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 待调研的人
///
/// 邮箱为必填项，其余字段可选。构造后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// LinkedIn 主页链接
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

impl Person {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            company: None,
            role: None,
            linkedin: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_linkedin(mut self, linkedin: impl Into<String>) -> Self {
        self.linkedin = Some(linkedin.into());
        self
    }

    /// 用于日志和文件名的简短标识，优先使用姓名
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }

    /// 拼接出提示词中使用的人物描述，只包含已知字段
    pub fn describe(&self) -> String {
        let mut parts = vec![format!("Email: {}", self.email)];
        let optional = [
            ("Name", &self.name),
            ("LinkedIn URL", &self.linkedin),
            ("Role", &self.role),
            ("Company", &self.company),
        ];
        for (label, value) in optional {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                parts.push(format!("{}: {}", label, v));
            }
        }
        parts.join(", ")
    }
}

impl Display for Person {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} <{}>]", self.label(), self.email)
    }
}

/// 一次调研请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub person: Person,
    /// 用户补充的背景说明
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_notes: Option<String>,
    /// 来源文件路径（仅从 TOML 加载时存在）
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl ResearchRequest {
    pub fn new(person: Person) -> Self {
        Self {
            person,
            user_notes: None,
            file_path: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.user_notes = Some(notes.into());
        self
    }

    /// 提示词中的用户备注，没有时返回占位文本
    pub fn notes_or_placeholder(&self) -> &str {
        self.user_notes
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("None provided")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_skips_missing_fields() {
        let person = Person::new("ada@example.com").with_name("Ada Lovelace");
        assert_eq!(person.describe(), "Email: ada@example.com, Name: Ada Lovelace");
    }

    #[test]
    fn test_describe_includes_linkedin_and_company() {
        let person = Person::new("ada@example.com")
            .with_company("Analytical Engines")
            .with_linkedin("https://www.linkedin.com/in/ada")
            .with_role("  ");
        let described = person.describe();
        assert!(described.contains("LinkedIn URL: https://www.linkedin.com/in/ada"));
        assert!(described.contains("Company: Analytical Engines"));
        assert!(!described.contains("Role"));
    }

    #[test]
    fn test_label_falls_back_to_email() {
        let person = Person::new("nobody@example.com");
        assert_eq!(person.label(), "nobody@example.com");
        assert_eq!(person.to_string(), "[nobody@example.com <nobody@example.com>]");
    }

    #[test]
    fn test_request_notes_placeholder() {
        let request = ResearchRequest::new(Person::new("a@b.c"));
        assert_eq!(request.notes_or_placeholder(), "None provided");
        let request = request.with_notes("Met at RustConf");
        assert_eq!(request.notes_or_placeholder(), "Met at RustConf");
    }
}
