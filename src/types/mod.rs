pub mod date_plan;
pub mod response;

pub use date_plan::{
    BudgetEstimate, DatePlanResponse, ItemKind, ItemLinks, ItineraryItem, Plan, PlanChecks,
    PlanMeta, PlanStatus, TransportMode,
};
pub use response::{deserialize_structured_response, ExtractedPayload};
