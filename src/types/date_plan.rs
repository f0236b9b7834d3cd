use crate::completion_schema;
use schemars::JsonSchema;
use serde::{de::DeserializeOwned, de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// Date plan payload embedded in an assistant reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[completion_schema(name = "date_plan")]
pub struct DatePlanResponse {
    /// Discriminator selecting the clarification view or the itinerary view
    pub status: PlanStatus,
    /// Questions for the user, meaningful only when status is needs_clarification
    #[serde(default, deserialize_with = "null_as_default")]
    pub clarifying_questions: Vec<String>,
    /// Auxiliary display hints shared by every plan
    #[serde(default)]
    pub meta: Option<PlanMeta>,
    /// Candidate itineraries, required and non-empty when status is ok
    #[serde(default, deserialize_with = "null_as_default")]
    pub plans: Vec<Plan>,
    /// Free-form markdown rendered after the plans
    #[serde(default)]
    pub markdown_summary: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Ok,
    NeedsClarification,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Ok => "ok",
            PlanStatus::NeedsClarification => "needs_clarification",
        }
    }
}

/// Display hints shared across plans. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PlanMeta {
    /// Date assumed when the user gave none, `YYYY-MM-DD`
    #[serde(deserialize_with = "lenient_option")]
    pub assumed_date: Option<String>,
    /// Offset the timestamps are expressed in, e.g. `+09:00`
    #[serde(deserialize_with = "lenient_option")]
    pub timezone: Option<String>,
    /// Granularity the itinerary is rounded to
    #[serde(deserialize_with = "lenient_minutes")]
    pub rounding_minutes: Option<u32>,
    #[serde(deserialize_with = "lenient_option")]
    pub transport_mode: Option<TransportMode>,
    /// Free-text search radius, e.g. "徒歩15分圏内"
    #[serde(deserialize_with = "lenient_option")]
    pub radius_hint: Option<String>,
    /// `YYYY-MM-DD HH:MM`
    #[serde(deserialize_with = "lenient_option")]
    pub meetup_time: Option<String>,
    /// `YYYY-MM-DD HH:MM`
    #[serde(deserialize_with = "lenient_option")]
    pub breakup_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Walk,
    Transit,
    Car,
    #[serde(other)]
    Unspecified,
}

/// One candidate itinerary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Plan {
    /// Display label and list key; renderers fall back to the position
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub theme: String,
    #[serde(default, deserialize_with = "lenient_option")]
    pub summary: Option<String>,
    /// Dropped when either amount is not a plain yen figure
    #[serde(default, deserialize_with = "lenient_option")]
    pub budget_estimate_jpy: Option<BudgetEstimate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub constraints_respected: Vec<String>,
    /// Stops in chronological order
    #[serde(default, deserialize_with = "null_as_default")]
    pub itinerary: Vec<ItineraryItem>,
    /// Producer-reported timing checks
    #[serde(default, deserialize_with = "lenient_option")]
    pub checks: Option<PlanChecks>,
}

/// Budget range in yen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BudgetEstimate {
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub min: u64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub max: u64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ItineraryItem {
    /// `YYYY-MM-DD HH:MM`, UTC+9 wall clock
    #[serde(default, deserialize_with = "null_as_default")]
    pub start: String,
    /// `YYYY-MM-DD HH:MM`, UTC+9 wall clock
    #[serde(default, deserialize_with = "null_as_default")]
    pub end: String,
    /// Raw type tag; see [`ItemKind::from_tag`]
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub item_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub area: String,
    #[serde(default, deserialize_with = "lenient_option")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub links: Option<ItemLinks>,
}

impl ItineraryItem {
    pub fn kind(&self) -> ItemKind {
        ItemKind::from_tag(&self.item_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ItemLinks {
    pub google_maps_search_url: Option<String>,
    pub web_search_url: Option<String>,
    pub image_search_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PlanChecks {
    pub meets_exact_time_window: bool,
    pub no_gaps_or_overlaps: bool,
    pub rounded_to_30min: bool,
}

/// Itinerary item category. Unrecognised tags resolve to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Meetup,
    Move,
    Meal,
    Cafe,
    Activity,
    Shopping,
    Rest,
    Breakup,
    Other,
}

impl ItemKind {
    pub const ALL: [ItemKind; 9] = [
        ItemKind::Meetup,
        ItemKind::Move,
        ItemKind::Meal,
        ItemKind::Cafe,
        ItemKind::Activity,
        ItemKind::Shopping,
        ItemKind::Rest,
        ItemKind::Breakup,
        ItemKind::Other,
    ];

    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "meetup" => ItemKind::Meetup,
            "move" => ItemKind::Move,
            "meal" => ItemKind::Meal,
            "cafe" => ItemKind::Cafe,
            "activity" => ItemKind::Activity,
            "shopping" => ItemKind::Shopping,
            "rest" => ItemKind::Rest,
            "breakup" => ItemKind::Breakup,
            _ => ItemKind::Other,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            ItemKind::Meetup => "meetup",
            ItemKind::Move => "move",
            ItemKind::Meal => "meal",
            ItemKind::Cafe => "cafe",
            ItemKind::Activity => "activity",
            ItemKind::Shopping => "shopping",
            ItemKind::Rest => "rest",
            ItemKind::Breakup => "breakup",
            ItemKind::Other => "other",
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Optional fields the discriminator does not cover: a value of the wrong
/// shape drops only that field.
fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value)
        .map_err(|err| {
            debug!(
                target: "dateplan::extract",
                error = %err,
                "dropping malformed optional field"
            )
        })
        .ok())
}

/// Minutes as an integer, an integral float, or a numeric string.
fn lenient_minutes<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let minutes = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|value| value.fract() == 0.0 && *value >= 0.0)
                .map(|value| value as u64)
        }),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(minutes.and_then(|value| u32::try_from(value).ok()))
}

/// Yen amounts arrive as integers, floats, or strings like "12,000円".
fn deserialize_amount<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(number) => match number.as_u64() {
            Some(value) => Ok(value),
            None => match number.as_f64() {
                Some(value) if value.is_finite() && value >= 0.0 => Ok(value.round() as u64),
                _ => Err(D::Error::custom(format!("`{number}` is not a yen amount"))),
            },
        },
        Value::String(text) => parse_yen(&text)
            .ok_or_else(|| D::Error::custom(format!("`{text}` is not a yen amount"))),
        other => Err(D::Error::custom(format!(
            "expected a yen amount, found {other}"
        ))),
    }
}

/// A single figure such as `12,000`, `¥12,000` or `12,000円`. Ranges, signs,
/// decimals and units like 万 are rejected rather than guessed at.
fn parse_yen(text: &str) -> Option<u64> {
    let body = text
        .trim()
        .trim_start_matches(|c: char| c == '¥' || c == '￥')
        .trim_end_matches('円')
        .trim();
    if !body.starts_with(|c: char| c.is_ascii_digit())
        || !body.chars().all(|c| c.is_ascii_digit() || c == ',')
    {
        return None;
    }
    body.replace(',', "").parse().ok()
}
