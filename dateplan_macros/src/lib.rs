mod completion_schema;
mod schema_extraction;

use proc_macro::TokenStream;

/// Attach a cached JSON Schema handle to a payload struct.
///
/// Generates a `dateplan_view::schema::CompletionSchema` impl whose handle is
/// built once from `schemars::schema_for!`, titled after the struct (or the
/// `name = "..."` argument) and described by its doc comment (or the
/// `description = "..."` argument).
///
/// ```ignore
/// #[derive(Deserialize, JsonSchema)]
/// #[completion_schema(name = "date_plan")]
/// /// Itinerary payload embedded in an assistant reply.
/// pub struct DatePlanResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    completion_schema::completion_schema(attr, item)
}
