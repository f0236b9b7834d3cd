//! Independent recomputation of a plan's timing checks.
//!
//! Producers report `checks` themselves and the renderer displays them as
//! given. This module recomputes them from the timestamps so a caller can
//! flag claims that do not hold.

use chrono::{NaiveDateTime, Timelike};

use crate::{
    format::parse_naive,
    types::{DatePlanResponse, Plan, PlanChecks},
};

/// The meetup/breakup bounds every itinerary is expected to cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub meetup: String,
    pub breakup: String,
}

impl TimeWindow {
    pub fn new(meetup: impl Into<String>, breakup: impl Into<String>) -> Self {
        Self {
            meetup: meetup.into(),
            breakup: breakup.into(),
        }
    }

    /// Meetup/breakup from `meta`, falling back to the first plan's first
    /// start and last end for whichever is missing.
    pub fn from_response(response: &DatePlanResponse) -> Option<Self> {
        let meta = response.meta.as_ref();
        let first_itinerary = response.plans.first().map(|plan| &plan.itinerary);

        let meetup = meta
            .and_then(|meta| meta.meetup_time.clone())
            .filter(|time| !time.trim().is_empty())
            .or_else(|| {
                first_itinerary
                    .and_then(|items| items.first())
                    .map(|item| item.start.clone())
            })
            .filter(|time| !time.trim().is_empty())?;
        let breakup = meta
            .and_then(|meta| meta.breakup_time.clone())
            .filter(|time| !time.trim().is_empty())
            .or_else(|| {
                first_itinerary
                    .and_then(|items| items.last())
                    .map(|item| item.end.clone())
            })
            .filter(|time| !time.trim().is_empty())?;

        Some(Self { meetup, breakup })
    }

    /// Both bounds parsed, or `None` when either is malformed.
    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((parse_naive(&self.meetup)?, parse_naive(&self.breakup)?))
    }
}

/// One of the three timing checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    TimeWindow,
    Continuity,
    Rounding,
}

impl CheckKind {
    pub const ALL: [CheckKind; 3] = [
        CheckKind::TimeWindow,
        CheckKind::Continuity,
        CheckKind::Rounding,
    ];

    pub fn read(&self, checks: &PlanChecks) -> bool {
        match self {
            CheckKind::TimeWindow => checks.meets_exact_time_window,
            CheckKind::Continuity => checks.no_gaps_or_overlaps,
            CheckKind::Rounding => checks.rounded_to_30min,
        }
    }
}

/// A producer claim that disagrees with the recomputed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckMismatch {
    pub check: CheckKind,
    pub claimed: bool,
    pub recomputed: bool,
}

/// Recompute all three checks from the plan's timestamps.
pub fn verify_plan(plan: &Plan, window: Option<&TimeWindow>) -> PlanChecks {
    let parsed: Option<Vec<(NaiveDateTime, NaiveDateTime)>> = plan
        .itinerary
        .iter()
        .map(|item| Some((parse_naive(&item.start)?, parse_naive(&item.end)?)))
        .collect();

    let Some(times) = parsed.filter(|times| !times.is_empty()) else {
        return PlanChecks::default();
    };

    let rounded_to_30min = times
        .iter()
        .all(|(start, end)| on_half_hour(start) && on_half_hour(end));

    let no_gaps_or_overlaps = times.iter().all(|(start, end)| start <= end)
        && times.windows(2).all(|pair| pair[0].1 == pair[1].0);

    let meets_exact_time_window = match window {
        Some(window) => match window.bounds() {
            Some((meetup, breakup)) => {
                times.first().map(|(start, _)| *start) == Some(meetup)
                    && times.last().map(|(_, end)| *end) == Some(breakup)
            }
            None => false,
        },
        None => true,
    };

    PlanChecks {
        meets_exact_time_window,
        no_gaps_or_overlaps,
        rounded_to_30min,
    }
}

/// Compare the producer's claimed checks with recomputed ones. A plan
/// without claimed checks has nothing to disagree with.
pub fn audit_plan(plan: &Plan, window: Option<&TimeWindow>) -> Vec<CheckMismatch> {
    let Some(claimed) = plan.checks.as_ref() else {
        return Vec::new();
    };
    let recomputed = verify_plan(plan, window);

    CheckKind::ALL
        .iter()
        .filter_map(|check| {
            let claimed = check.read(claimed);
            let recomputed = check.read(&recomputed);
            (claimed != recomputed).then_some(CheckMismatch {
                check: *check,
                claimed,
                recomputed,
            })
        })
        .collect()
}

fn on_half_hour(time: &NaiveDateTime) -> bool {
    time.minute() % 30 == 0 && time.second() == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItineraryItem, PlanMeta, PlanStatus};

    fn item(start: &str, end: &str) -> ItineraryItem {
        ItineraryItem {
            start: start.to_string(),
            end: end.to_string(),
            item_type: "activity".to_string(),
            ..Default::default()
        }
    }

    fn plan(items: Vec<ItineraryItem>) -> Plan {
        Plan {
            itinerary: items,
            ..Default::default()
        }
    }

    #[test]
    fn test_contiguous_rounded_plan_passes() {
        let plan = plan(vec![
            item("2024-05-01 10:00", "2024-05-01 11:30"),
            item("2024-05-01 11:30", "2024-05-01 13:00"),
        ]);
        let window = TimeWindow::new("2024-05-01 10:00", "2024-05-01 13:00");

        let checks = verify_plan(&plan, Some(&window));
        assert!(checks.meets_exact_time_window);
        assert!(checks.no_gaps_or_overlaps);
        assert!(checks.rounded_to_30min);
    }

    #[test]
    fn test_gap_and_rounding_detected() {
        let plan = plan(vec![
            item("2024-05-01 10:00", "2024-05-01 11:15"),
            item("2024-05-01 11:30", "2024-05-01 13:00"),
        ]);
        let window = TimeWindow::new("2024-05-01 10:00", "2024-05-01 14:00");

        let checks = verify_plan(&plan, Some(&window));
        assert!(!checks.meets_exact_time_window);
        assert!(!checks.no_gaps_or_overlaps);
        assert!(!checks.rounded_to_30min);
    }

    #[test]
    fn test_unparseable_times_fail_everything() {
        let plan = plan(vec![item("夕方", "夜")]);
        assert_eq!(verify_plan(&plan, None), PlanChecks::default());
        assert_eq!(verify_plan(&Plan::default(), None), PlanChecks::default());
    }

    #[test]
    fn test_window_falls_back_to_first_plan() {
        let response = DatePlanResponse {
            status: PlanStatus::Ok,
            clarifying_questions: Vec::new(),
            meta: Some(PlanMeta {
                meetup_time: Some("2024-05-01 10:00".to_string()),
                ..Default::default()
            }),
            plans: vec![plan(vec![
                item("2024-05-01 10:30", "2024-05-01 11:00"),
                item("2024-05-01 11:00", "2024-05-01 18:00"),
            ])],
            markdown_summary: None,
        };

        let window = TimeWindow::from_response(&response).unwrap();
        assert_eq!(window, TimeWindow::new("2024-05-01 10:00", "2024-05-01 18:00"));
    }

    #[test]
    fn test_audit_reports_false_claims() {
        let mut plan = plan(vec![
            item("2024-05-01 10:00", "2024-05-01 11:00"),
            item("2024-05-01 11:30", "2024-05-01 12:00"),
        ]);
        plan.checks = Some(PlanChecks {
            meets_exact_time_window: true,
            no_gaps_or_overlaps: true,
            rounded_to_30min: true,
        });
        let window = TimeWindow::new("2024-05-01 10:00", "2024-05-01 12:00");

        let mismatches = audit_plan(&plan, Some(&window));
        assert_eq!(
            mismatches,
            vec![CheckMismatch {
                check: CheckKind::Continuity,
                claimed: true,
                recomputed: false,
            }]
        );
    }

    #[test]
    fn test_audit_without_claims_is_empty() {
        let plan = plan(vec![item("2024-05-01 10:00", "2024-05-01 10:45")]);
        assert!(audit_plan(&plan, None).is_empty());
    }
}
