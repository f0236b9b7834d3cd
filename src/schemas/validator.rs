use crate::{
    schemas::{validate_structured_payload, CompletionSchema},
    types::response::deserialize_structured_response,
    Result,
};
use serde_json::Value;

/// How a discriminated payload is turned into its typed form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validator {
    /// Serde only; missing optional fields fall back to their defaults
    #[default]
    Lenient,
    /// Validate against the generated JSON Schema before deserializing
    Strict,
}

impl Validator {
    /// Validate and deserialize a payload into type T
    pub fn validate<T: CompletionSchema>(&self, payload: &Value) -> Result<T> {
        if *self == Validator::Strict {
            validate_structured_payload(T::schema(), payload)?;
        }
        deserialize_structured_response::<T>(payload)
    }

    pub fn from_strict_flag(strict: bool) -> Self {
        if strict {
            Validator::Strict
        } else {
            Validator::Lenient
        }
    }
}
