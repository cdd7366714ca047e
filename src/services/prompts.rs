//! 提示词模板
//!
//! 每个函数对应流程中的一次 LLM 调用。需要结构化输出的提示词都要求模型只返回 JSON。

/// 生成搜索关键词的系统提示
pub fn query_writer_prompt(
    person: &str,
    schema: &str,
    user_notes: &str,
    max_search_queries: usize,
    missing_information: &[String],
) -> String {
    let follow_up = if missing_information.is_empty() {
        String::new()
    } else {
        format!(
            r#"
A previous research pass could not find the following. Aim your queries at these gaps:
<missing_information>
{}
</missing_information>
"#,
            bullet_list(missing_information)
        )
    };

    format!(
        r#"You write web search queries to gather facts about one specific person.

The person: {person}

Write at most {max_search_queries} search queries that help fill in this schema:

<schema>
{schema}
</schema>

<user_notes>
{user_notes}
</user_notes>
{follow_up}
Guidelines for the queries:
1. Use the person's exact name; do not invent spellings.
2. Use hints about the employer when the company is not given outright.
3. Avoid speculative terms that would steer the search away from the real profile.
4. If a LinkedIn URL is known, put the raw URL in a query; it leads to the right page.

We mostly care about the person's work history.

Respond with JSON only, in the form {{"queries": ["...", "..."]}}."#
    )
}

/// 生成搜索关键词时附带的用户消息
pub const QUERY_WRITER_USER_MESSAGE: &str =
    "Generate the list of search queries for the schema you need to fill.";

/// 根据网页内容整理笔记的提示
pub fn notes_prompt(person: &str, schema: &str, sources: &str, user_notes: &str) -> String {
    format!(
        r#"You are researching a person on the web: {person}.

This schema shows what we want to learn:

<schema>
{schema}
</schema>

Below is content scraped from web pages. Take clear, organized notes about the person that focus on the schema topics.

<website_contents>
{sources}
</website_contents>

Additional notes from the user:
<user_notes>
{user_notes}
</user_notes>

Your notes should:
1. Be organized and easy to scan.
2. Stay on the schema topics.
3. Keep concrete facts such as dates, employers, titles and numbers.
4. Stay faithful to the sources.
5. Say explicitly when something important is missing or unclear.

Do not try to match the schema format; just capture the relevant facts."#
    )
}

/// 从笔记中抽取结构化信息的系统提示
pub fn extraction_prompt(person: &str, schema: &str, notes: &str) -> String {
    format!(
        r#"Turn research notes about a person into a structured record.

The person: {person}

<schema>
{schema}
</schema>

All notes gathered so far:

<web_research_notes>
{notes}
</web_research_notes>

Rules:
1. Only use facts stated in the notes. Use null (or an empty list) when a value is unknown.
2. "years_of_experience" is a whole number.
3. "prior_companies" is a list of objects with "company", "role" and "duration".
4. "education", "skills" and "notable_achievements" are lists of strings.

Respond with a single JSON object whose keys are exactly the schema fields."#
    )
}

/// 抽取时附带的用户消息
pub const EXTRACTION_USER_MESSAGE: &str = "Produce the structured record from these notes.";

/// 判断信息是否完整的系统提示
pub fn reflection_prompt(person: &str, schema: &str, extracted: &str) -> String {
    format!(
        r#"You review extracted information about a person for completeness and quality.

The person: {person}

The required schema:
<schema>
{schema}
</schema>

The extracted information:
<extracted_info>
{extracted}
</extracted_info>

Decide whether the record is good enough to stop researching. Consider:
1. Are required fields missing or null?
2. Are fields incomplete, vague or contradictory?
3. Do fields contain placeholders such as "unknown"?
Work history (years of experience, current company, current role, prior companies) matters most.

Respond with JSON only:
{{
  "is_satisfactory": true or false,
  "missing_information": ["what is missing or unclear"],
  "additional_search_suggestions": ["search queries that could fill the gaps"],
  "reasoning": "why more research is or is not needed",
  "confidence_score": a number between 0 and 1
}}"#
    )
}

/// 反思时附带的用户消息
pub const REFLECTION_USER_MESSAGE: &str = "Produce the structured reflection.";

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_prompt_mentions_limit_and_gaps() {
        let prompt = query_writer_prompt(
            "Email: ada@example.com",
            "{}",
            "None provided",
            2,
            &["current role".to_string()],
        );
        assert!(prompt.contains("at most 2 search queries"));
        assert!(prompt.contains("- current role"));
        assert!(prompt.contains(r#"{"queries": ["...", "..."]}"#));
    }

    #[test]
    fn test_first_pass_prompt_has_no_gap_section() {
        let prompt = query_writer_prompt("Email: a@b.c", "{}", "None provided", 3, &[]);
        assert!(!prompt.contains("<missing_information>"));
    }
}
