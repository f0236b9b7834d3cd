//! Producer-side normalisation: pin itineraries to the meetup/breakup window,
//! lay them out contiguously on half-hour boundaries, and fill in what a
//! finished payload is expected to carry.

use chrono::{Duration, NaiveDateTime, Timelike};
use tracing::debug;

use crate::{
    audit::{verify_plan, TimeWindow},
    format::to_wire,
    links::{google_maps_search_url, image_search_url, place_query, web_search_url},
    summary::generate_markdown_summary,
    types::{
        DatePlanResponse, ItemKind, ItemLinks, ItineraryItem, Plan, PlanChecks, PlanMeta,
        PlanStatus,
    },
};

const MOVE_MINUTES: i64 = 15;
const STAY_MINUTES: i64 = 30;

/// Round to the nearest half hour: :00–:14 down, :15–:44 to :30, :45+ up.
pub fn round_to_half_hour(time: NaiveDateTime) -> NaiveDateTime {
    let base = time
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time);
    let minute = base.minute();
    let floor_hour = base - Duration::minutes(i64::from(minute));

    match minute {
        0..=14 => floor_hour,
        15..=44 => floor_hour + Duration::minutes(30),
        _ => floor_hour + Duration::hours(1),
    }
}

fn minimum_minutes(kind: ItemKind) -> i64 {
    match kind {
        ItemKind::Meetup | ItemKind::Breakup => 0,
        ItemKind::Move => MOVE_MINUTES,
        _ => STAY_MINUTES,
    }
}

/// Re-time a plan so it runs from meetup to breakup without gaps, then set
/// its checks from the result.
pub fn align_itinerary(plan: &mut Plan, window: &TimeWindow) {
    let Some((meetup, breakup)) = window.bounds() else {
        plan.checks = Some(PlanChecks::default());
        return;
    };
    if plan.itinerary.is_empty() {
        plan.checks = Some(PlanChecks::default());
        return;
    }

    let count = plan.itinerary.len();
    let total = (breakup - meetup).num_minutes();
    let minimum: i64 = plan
        .itinerary
        .iter()
        .map(|item| minimum_minutes(item.kind()))
        .sum();
    let available = (total - minimum).max(0);
    let middle = count.saturating_sub(2);

    let mut current = meetup;
    for (idx, item) in plan.itinerary.iter_mut().enumerate() {
        let kind = item.kind();
        let item_start = current;
        item.start = to_wire(&item_start);

        if idx + 1 == count {
            item.end = window.breakup.clone();
            current = breakup;
            continue;
        }

        let item_end = match kind {
            ItemKind::Meetup | ItemKind::Breakup => item_start,
            ItemKind::Move => item_start + Duration::minutes(MOVE_MINUTES),
            _ => {
                let floor = minimum_minutes(kind);
                let allocated = if available > 0 && middle > 0 {
                    floor.max(available / middle as i64)
                } else {
                    floor
                };
                round_to_half_hour(item_start + Duration::minutes(allocated))
            }
        };
        item.end = to_wire(&item_end);
        current = item_end;
    }

    if let Some(first) = plan.itinerary.first_mut() {
        first.start = window.meetup.clone();
    }

    plan.checks = Some(verify_plan(plan, Some(window)));
}

/// Fill each blank search link from the item's name and area.
fn backfill_links(item: &mut ItineraryItem) {
    let Some(query) = place_query(&item.name, &item.area) else {
        return;
    };
    let links = item.links.get_or_insert_with(ItemLinks::default);
    let slots: [(&mut Option<String>, fn(&str) -> String); 3] = [
        (&mut links.google_maps_search_url, google_maps_search_url),
        (&mut links.web_search_url, web_search_url),
        (&mut links.image_search_url, image_search_url),
    ];
    for (slot, build) in slots {
        if slot.as_deref().map_or(true, |url| url.trim().is_empty()) {
            *slot = Some(build(&query));
        }
    }
}

/// Normalise an `ok` response in place.
///
/// - aligns every plan to the window from `meta` (or the first plan)
/// - records that window back into `meta`
/// - fills blank map, web and image search links
/// - generates `markdown_summary` when it is missing or blank
pub fn normalize_response(response: &mut DatePlanResponse) {
    if response.status != PlanStatus::Ok || response.plans.is_empty() {
        return;
    }

    match TimeWindow::from_response(response) {
        Some(window) => {
            for plan in &mut response.plans {
                align_itinerary(plan, &window);
            }
            let meta = response.meta.get_or_insert_with(PlanMeta::default);
            meta.meetup_time.get_or_insert_with(|| window.meetup.clone());
            meta.breakup_time.get_or_insert_with(|| window.breakup.clone());
        }
        None => debug!(
            target: "dateplan::schedule",
            "no meetup/breakup window available; itineraries left as given"
        ),
    }

    for item in response
        .plans
        .iter_mut()
        .flat_map(|plan| plan.itinerary.iter_mut())
    {
        backfill_links(item);
    }

    let summary_missing = response
        .markdown_summary
        .as_deref()
        .map_or(true, |text| text.trim().is_empty());
    if summary_missing {
        response.markdown_summary = Some(generate_markdown_summary(response));
    }
}
