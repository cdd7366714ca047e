pub mod loaders;
pub mod output;
pub mod person;
pub mod person_info;
pub mod reflection;
pub mod schema;
pub mod search;

pub use loaders::{load_all_requests, load_request};
pub use output::ResearchOutput;
pub use person::{Person, ResearchRequest};
pub use person_info::{PersonInfo, PriorRole};
pub use reflection::ReflectionResult;
pub use schema::{ExtractionSchema, SchemaField};
pub use search::{SearchResponse, SearchResult};
