/// 抽取 schema：字段名 → 字段说明，保持插入顺序
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSchema {
    fields: Vec<SchemaField>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: String,
    pub description: String,
}

impl ExtractionSchema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// 添加字段，同名字段会覆盖说明
    pub fn field(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        let description = description.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.description = description,
            None => self.fields.push(SchemaField { name, description }),
        }
        self
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// 渲染成提示词中使用的 JSON 对象
    pub fn to_prompt_json(&self) -> String {
        let lines: Vec<String> = self
            .fields
            .iter()
            .map(|f| {
                format!(
                    "  {}: {}",
                    serde_json::Value::from(f.name.as_str()),
                    serde_json::Value::from(f.description.as_str())
                )
            })
            .collect();
        format!("{{\n{}\n}}", lines.join(",\n"))
    }
}

impl Default for ExtractionSchema {
    fn default() -> Self {
        Self::new()
            .field("years_of_experience", "Total years of professional experience (integer)")
            .field("current_company", "Name of the current employer")
            .field("current_role", "Current job title or position")
            .field(
                "prior_companies",
                "Previous employers, each as {\"company\", \"role\", \"duration\"}",
            )
            .field("education", "Degrees and institutions")
            .field("skills", "Key technical and professional skills")
            .field(
                "notable_achievements",
                "Significant accomplishments, projects, or recognition",
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_lists_record_fields_in_order() {
        let schema = ExtractionSchema::default();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "years_of_experience",
                "current_company",
                "current_role",
                "prior_companies",
                "education",
                "skills",
                "notable_achievements"
            ]
        );
    }

    #[test]
    fn test_field_overrides_description() {
        let schema = ExtractionSchema::new()
            .field("skills", "a")
            .field("skills", "b");
        assert_eq!(schema.fields().len(), 1);
        assert!(schema.to_prompt_json().contains("\"skills\": \"b\""));
    }
}
