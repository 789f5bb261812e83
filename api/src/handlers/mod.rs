pub mod envelope;

pub use envelope::{failure, json_error_handler, query_error_handler, respond, validation_failure};
