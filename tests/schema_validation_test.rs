use dateplan_view::{
    completion_schema, extract, extract_with, CompletionSchema, DatePlanResponse, ExtractOptions,
    Validator,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

/// A venue suggestion attached to an itinerary stop
#[derive(Debug, Deserialize, JsonSchema)]
#[completion_schema(name = "venue")]
#[allow(dead_code)]
struct Venue {
    /// Display name of the venue
    name: String,
    /// Neighbourhood, e.g. "中目黒"
    #[serde(default)]
    area: Option<String>,
    #[serde(default)]
    capacity: Option<u32>,
}

fn valid_plan() -> Value {
    json!({
        "status": "ok",
        "meta": {"transport_mode": "walk", "rounding_minutes": 30},
        "plans": [{
            "plan_id": "A",
            "title": "中目黒で川沿い散歩",
            "theme": "のんびり",
            "budget_estimate_jpy": {"min": 2000, "max": 4000},
            "constraints_respected": [],
            "itinerary": [{
                "start": "2024-04-01 14:00",
                "end": "2024-04-01 15:00",
                "type": "activity",
                "name": "目黒川",
                "area": "中目黒",
                "links": {"google_maps_search_url": null}
            }]
        }]
    })
}

fn strict() -> ExtractOptions {
    ExtractOptions {
        validator: Validator::Strict,
    }
}

#[test]
fn test_custom_schema_carries_doc_comments() {
    let schema = Venue::schema();
    let json = schema.schema_json();

    assert_eq!(schema.schema_name(), "venue");
    assert_eq!(schema.type_name(), "Venue");
    assert_eq!(json["title"], "venue");
    assert_eq!(
        json["description"],
        "A venue suggestion attached to an itinerary stop"
    );
    assert_eq!(
        json["properties"]["name"]["description"],
        "Display name of the venue"
    );
    assert!(json["properties"]["capacity"].get("description").is_none());

    let required = json["required"].as_array().unwrap();
    assert_eq!(required, &vec![json!("name")]);
}

#[test]
fn test_custom_schema_validation_modes() {
    let payload = json!({"name": "青葉台の喫茶店", "capacity": 12});
    let venue: Venue = Validator::Strict.validate(&payload).unwrap();
    assert_eq!(venue.name, "青葉台の喫茶店");
    assert_eq!(venue.area, None);

    let err = Validator::Strict
        .validate::<Venue>(&json!({"area": "中目黒"}))
        .unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert!(err.to_string().contains("`venue` schema"), "{err}");

    let err = Validator::Lenient
        .validate::<Venue>(&json!({"area": "中目黒"}))
        .unwrap_err();
    assert!(err.to_string().contains("failed to deserialize `venue`"), "{err}");
}

#[test]
fn test_date_plan_schema_shape() {
    let json = DatePlanResponse::schema().schema_json();

    assert_eq!(json["title"], "date_plan");
    assert_eq!(json["required"], json!(["status"]));
    assert!(json["properties"]["plans"].is_object());
    assert!(json["properties"]["status"]["description"]
        .as_str()
        .unwrap()
        .contains("clarification"));
}

#[test]
fn test_strict_accepts_valid_plan() {
    let text = format!("```json\n{}\n```", valid_plan());
    let response = extract_with(&text, strict()).expect("strict payload");
    assert_eq!(response.plans[0].title, "中目黒で川沿い散歩");
}

#[test]
fn test_strict_rejects_what_lenient_coerces() {
    let mut payload = valid_plan();
    payload["plans"][0]["budget_estimate_jpy"]["min"] = json!("2,000円");
    let text = format!("```json\n{payload}\n```");

    assert!(extract(&text).is_some());
    assert!(extract_with(&text, strict()).is_none());

    let err = Validator::Strict
        .validate::<DatePlanResponse>(&payload)
        .unwrap_err();
    assert!(
        err.to_string().contains("/plans/0/budget_estimate_jpy/min"),
        "{err}"
    );
}

#[test]
fn test_strict_reports_at_most_three_errors() {
    let mut payload = valid_plan();
    let plan = &mut payload["plans"][0];
    plan["title"] = json!(1);
    plan["theme"] = json!(2);
    plan["plan_id"] = json!(3);
    plan["constraints_respected"] = json!("雨天可");

    let err = Validator::Strict
        .validate::<DatePlanResponse>(&payload)
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("additional errors truncated"), "{message}");
    assert_eq!(message.matches("/plans/0/").count(), 3, "{message}");
}

#[test]
fn test_strict_null_title_rejected_lenient_defaults() {
    let mut payload = valid_plan();
    payload["plans"][0]["title"] = Value::Null;

    let response: DatePlanResponse = Validator::Lenient.validate(&payload).unwrap();
    assert_eq!(response.plans[0].title, "");
    assert!(Validator::Strict
        .validate::<DatePlanResponse>(&payload)
        .is_err());
}
