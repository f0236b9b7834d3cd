use serde_json::Value;

use crate::{
    error::{Result, ViewError},
    extract::Strategy,
    schemas::{CompletionSchema, Validator},
};

/// A JSON object located in message text that passed the shape discriminator.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedPayload {
    strategy: Strategy,
    value: Value,
}

impl ExtractedPayload {
    pub fn new(strategy: Strategy, value: Value) -> Self {
        Self { strategy, value }
    }

    /// Which matcher in the cascade found the candidate text
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Deserialize the payload using the given validator
    pub fn deserialize<T>(&self, validator: Validator) -> Result<T>
    where
        T: CompletionSchema,
    {
        validator.validate::<T>(&self.value)
    }
}

/// Deserialize a payload, reporting the JSON path of the first mismatch.
pub fn deserialize_structured_response<T>(payload: &Value) -> Result<T>
where
    T: CompletionSchema,
{
    serde_path_to_error::deserialize(payload).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        ViewError::Validation(format!(
            "failed to deserialize `{}` at {}: {}",
            T::schema().schema_name(),
            location,
            err.inner()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DatePlanResponse;
    use serde_json::json;

    #[test]
    fn test_deserialize_reports_path() {
        let payload = json!({
            "status": "ok",
            "plans": [{ "itinerary": [{ "start": 1000 }] }]
        });

        let err = deserialize_structured_response::<DatePlanResponse>(&payload).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("date_plan"), "{message}");
        assert!(message.contains("plans[0].itinerary[0].start"), "{message}");
    }

    #[test]
    fn test_extracted_payload_lenient_deserialize() {
        let extracted = ExtractedPayload::new(
            Strategy::BalancedBraces,
            json!({ "status": "needs_clarification", "clarifying_questions": ["何時？"] }),
        );

        let response: DatePlanResponse = extracted.deserialize(Validator::Lenient).unwrap();
        assert_eq!(response.clarifying_questions, vec!["何時？".to_string()]);
        assert_eq!(extracted.strategy(), Strategy::BalancedBraces);
    }
}
