pub mod json;
pub mod logging;

pub use json::extract_json_object;
pub use logging::truncate_text;
