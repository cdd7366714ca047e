pub mod research_ctx;
pub mod research_flow;

pub use research_ctx::{route_after_reflection, ResearchState, Route};
pub use research_flow::ResearchFlow;
