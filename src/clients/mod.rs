pub mod llm_client;
pub mod rate_limiter;
pub mod tavily_client;

pub use llm_client::LlmClient;
pub use rate_limiter::RateLimiter;
pub use tavily_client::TavilyClient;
