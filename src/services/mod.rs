pub mod extraction_service;
pub mod notes_service;
pub mod prompts;
pub mod query_service;
pub mod reflection_service;
pub mod search_service;

pub use extraction_service::ExtractionService;
pub use notes_service::{format_all_notes, NotesService};
pub use query_service::QueryService;
pub use reflection_service::ReflectionService;
pub use search_service::{dedupe_by_url, SearchService};
