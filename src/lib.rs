//! dateplan-view: find the date plan JSON an assistant embedded in its reply
//! and render it as an itinerary view.
//!
//! Assistant replies mix prose, markdown and, sometimes, one JSON object
//! describing a date plan. [`extract`] recovers that object through a fixed
//! cascade of strategies and a shape check; [`render`] turns the typed result
//! into HTML. Anything that is not a date plan goes to the host's markdown
//! renderer unchanged, see [`route_message`].
//!
//! # Quick Start
//!
//! ```rust
//! use dateplan_view::{extract, render, PlanStatus};
//!
//! let reply = "Here you go:\n```json\n\
//!     {\"status\": \"needs_clarification\", \"clarifying_questions\": [\"予算は？\"]}\n```";
//!
//! let plan = extract(reply).expect("date plan");
//! assert_eq!(plan.status, PlanStatus::NeedsClarification);
//! assert!(render(&plan).contains("<li>予算は？</li>"));
//! ```

extern crate self as dateplan_view;

pub mod audit;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod links;
pub mod message;
pub mod render;
pub mod schedule;
pub mod schemas;
pub mod summary;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;

pub use audit::{audit_plan, verify_plan, CheckKind, CheckMismatch, TimeWindow};
pub use config::ViewConfig;
pub use dateplan_macros::completion_schema;
pub use error::{Result, ViewError};
pub use extract::{extract, extract_value, extract_with, ExtractOptions, Strategy};
pub use message::{route_message, AssistantMessage, MessageView};
pub use render::{render, render_with, RenderOptions};
pub use schedule::{align_itinerary, normalize_response, round_to_half_hour};
pub use schemas::{schema_type_name, CompletionSchema, SchemaHandle, Validator};
pub use summary::generate_markdown_summary;
pub use types::{
    BudgetEstimate, DatePlanResponse, ExtractedPayload, ItemKind, ItemLinks, ItineraryItem, Plan,
    PlanChecks, PlanMeta, PlanStatus, TransportMode,
};

pub use schemas as schema;
pub use schemas::validator;
pub use types::response;
