use crate::error::{ConfigError, Result};

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 每秒最多发起的 LLM 请求数，0 表示不限速
    pub llm_requests_per_second: f64,
    /// 限速器允许的最大突发请求数
    pub llm_max_burst: usize,
    // --- 搜索 API 配置 ---
    pub tavily_api_key: String,
    pub tavily_api_base_url: String,
    /// 只搜索最近多少天的内容，0 表示不限制
    pub search_days: u32,
    // --- 调研流程配置 ---
    /// 每轮最多生成的搜索关键词数量
    pub max_search_queries: usize,
    /// 每个关键词最多返回的搜索结果数量
    pub max_search_results: usize,
    /// 反思后最多重新调研的次数
    pub max_reflection_steps: usize,
    /// 每个来源保留的原文 token 数（按 4 字符/token 估算）
    pub max_tokens_per_source: usize,
    /// 是否在输出中附带去重后的搜索结果
    pub include_search_results: bool,
    // --- 批量运行配置 ---
    /// 同时调研的人数
    pub max_concurrent_requests: usize,
    /// 调研请求 TOML 文件存放目录
    pub input_folder: String,
    /// 调研结果 JSON 输出目录
    pub output_folder: String,
    /// 运行日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_requests_per_second: 4.0,
            llm_max_burst: 10,
            tavily_api_key: String::new(),
            tavily_api_base_url: "https://api.tavily.com".to_string(),
            search_days: 360,
            max_search_queries: 3,
            max_search_results: 3,
            max_reflection_steps: 2,
            max_tokens_per_source: 1000,
            include_search_results: false,
            max_concurrent_requests: 4,
            input_folder: "research_requests".to_string(),
            output_folder: "research_output".to_string(),
            output_log_file: "research_log.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置，未设置的项使用默认值
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 通过任意查找函数加载配置，便于在测试中注入变量
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        Ok(Self {
            llm_api_key: lookup("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: lookup("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: lookup("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_requests_per_second: parse_var(&lookup, "LLM_REQUESTS_PER_SECOND", "f64")?
                .unwrap_or(default.llm_requests_per_second),
            llm_max_burst: parse_var(&lookup, "LLM_MAX_BURST", "usize")?
                .unwrap_or(default.llm_max_burst),
            tavily_api_key: lookup("TAVILY_API_KEY").unwrap_or(default.tavily_api_key),
            tavily_api_base_url: lookup("TAVILY_API_BASE_URL")
                .unwrap_or(default.tavily_api_base_url),
            search_days: parse_var(&lookup, "SEARCH_DAYS", "u32")?.unwrap_or(default.search_days),
            max_search_queries: parse_var(&lookup, "MAX_SEARCH_QUERIES", "usize")?
                .unwrap_or(default.max_search_queries),
            max_search_results: parse_var(&lookup, "MAX_SEARCH_RESULTS", "usize")?
                .unwrap_or(default.max_search_results),
            max_reflection_steps: parse_var(&lookup, "MAX_REFLECTION_STEPS", "usize")?
                .unwrap_or(default.max_reflection_steps),
            max_tokens_per_source: parse_var(&lookup, "MAX_TOKENS_PER_SOURCE", "usize")?
                .unwrap_or(default.max_tokens_per_source),
            include_search_results: parse_var(&lookup, "INCLUDE_SEARCH_RESULTS", "bool")?
                .unwrap_or(default.include_search_results),
            max_concurrent_requests: parse_var(&lookup, "MAX_CONCURRENT_REQUESTS", "usize")?
                .unwrap_or(default.max_concurrent_requests),
            input_folder: lookup("INPUT_FOLDER").unwrap_or(default.input_folder),
            output_folder: lookup("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", "bool")?
                .unwrap_or(default.verbose_logging),
        })
    }

    /// 检查运行所需的配置项
    pub fn validate(&self) -> Result<()> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey {
                var_name: "LLM_API_KEY".to_string(),
            }
            .into());
        }
        if self.tavily_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey {
                var_name: "TAVILY_API_KEY".to_string(),
            }
            .into());
        }
        if self.max_search_queries == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_SEARCH_QUERIES".to_string(),
                reason: "至少需要 1 个搜索关键词".to_string(),
            }
            .into());
        }
        if !self.llm_requests_per_second.is_finite() || self.llm_requests_per_second < 0.0 {
            return Err(ConfigError::InvalidValue {
                name: "LLM_REQUESTS_PER_SECOND".to_string(),
                reason: "必须是非负数".to_string(),
            }
            .into());
        }
        if self.max_concurrent_requests == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_CONCURRENT_REQUESTS".to_string(),
                reason: "并发数必须大于 0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, expected_type: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => {
            let parsed = raw.trim().parse::<T>().ok();
            match parsed {
                Some(value) => Ok(Some(value)),
                None => Err(ConfigError::EnvVarParseFailed {
                    var_name: name.to_string(),
                    value: raw,
                    expected_type: expected_type.to_string(),
                }
                .into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.max_search_queries, 3);
        assert_eq!(config.max_search_results, 3);
        assert_eq!(config.max_reflection_steps, 2);
        assert!(!config.include_search_results);
        assert_eq!(config.llm_requests_per_second, 4.0);
        assert_eq!(config.llm_max_burst, 10);
        assert_eq!(config.search_days, 360);
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("MAX_REFLECTION_STEPS", "5"),
            ("INCLUDE_SEARCH_RESULTS", "true"),
            ("LLM_MODEL_NAME", "claude-3-5-sonnet-latest"),
            ("LLM_REQUESTS_PER_SECOND", "0.5"),
            ("SEARCH_DAYS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.llm_requests_per_second, 0.5);
        assert_eq!(config.search_days, 0);
        assert_eq!(config.max_reflection_steps, 5);
        assert!(config.include_search_results);
        assert_eq!(config.llm_model_name, "claude-3-5-sonnet-latest");
    }

    #[test]
    fn test_bad_number_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("MAX_SEARCH_RESULTS", "three")]))
            .unwrap_err();
        assert!(err.to_string().contains("MAX_SEARCH_RESULTS"));
    }

    #[test]
    fn test_validate_requires_both_keys() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.llm_api_key = "sk-test".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("TAVILY_API_KEY"));

        config.tavily_api_key = "tvly-test".to_string();
        assert!(config.validate().is_ok());

        config.llm_requests_per_second = -1.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("LLM_REQUESTS_PER_SECOND"));
    }
}
