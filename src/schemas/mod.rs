//! Completion schemas for structured payloads and the validators that use them.

pub mod schema;
pub mod validation;
pub mod validator;

pub use schema::{apply_doc_comments, schema_type_name, CompletionSchema, SchemaHandle};
pub use validation::validate_structured_payload;
pub use validator::Validator;
