//! Itinerary renderer: turns a validated date plan into HTML markup.
//!
//! The renderer branches on `status` but never re-validates it; the
//! extractor's shape check is the enforcement boundary. Optional fields that
//! are missing simply omit their section.

pub mod labels;
pub mod markdown;

use std::collections::HashMap;

use tracing::debug;

use crate::{
    audit::{audit_plan, CheckKind, CheckMismatch, TimeWindow},
    format::{escape_html, format_date, format_item_time, format_meta_time, format_yen},
    types::{
        BudgetEstimate, DatePlanResponse, ItemLinks, ItineraryItem, Plan, PlanMeta, PlanStatus,
    },
};

pub use labels::check_glyph;
pub use markdown::render_inline_markdown;

const CLARIFICATION_LEAD: &str = "プランを作成するために、以下の点を教えてください。";
const NO_PLAN_NOTICE: &str = "プランが生成されませんでした。";

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Recompute each plan's checks and mark claims that do not hold
    pub verify_checks: bool,
}

/// Which of the structured layouts a payload selects
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanView<'a> {
    Clarification(&'a [String]),
    NoPlans,
    Plans(&'a [Plan]),
}

impl<'a> PlanView<'a> {
    pub fn of(response: &'a DatePlanResponse) -> Self {
        match response.status {
            PlanStatus::NeedsClarification => {
                PlanView::Clarification(&response.clarifying_questions)
            }
            PlanStatus::Ok if response.plans.is_empty() => PlanView::NoPlans,
            PlanStatus::Ok => PlanView::Plans(&response.plans),
        }
    }
}

pub fn render(response: &DatePlanResponse) -> String {
    render_with(response, &RenderOptions::default())
}

pub fn render_with(response: &DatePlanResponse, options: &RenderOptions) -> String {
    let view = PlanView::of(response);
    debug!(
        target: "dateplan::render",
        status = response.status.as_str(),
        plans = response.plans.len(),
        "rendering date plan"
    );

    let plans = match view {
        PlanView::Clarification(questions) => return render_clarification(questions),
        PlanView::NoPlans => None,
        PlanView::Plans(plans) => Some(plans),
    };

    let mut out = String::from("<div class=\"date-plan\">");

    if let Some(meta) = response.meta.as_ref() {
        out.push_str(&render_meta(meta));
    }

    match plans {
        None => out.push_str(&format!("<p class=\"date-plan-empty\">{NO_PLAN_NOTICE}</p>")),
        Some(plans) => {
            let window = options
                .verify_checks
                .then(|| TimeWindow::from_response(response))
                .flatten();
            let keys = plan_keys(plans);
            for (idx, plan) in plans.iter().enumerate() {
                let mismatches = if options.verify_checks {
                    audit_plan(plan, window.as_ref())
                } else {
                    Vec::new()
                };
                out.push_str(&render_plan(plan, idx, &keys[idx], &mismatches));
            }
        }
    }

    if let Some(summary) = response
        .markdown_summary
        .as_deref()
        .filter(|text| !text.trim().is_empty())
    {
        out.push_str(&format!(
            "<section class=\"date-plan-markdown\">{}</section>",
            render_inline_markdown(summary)
        ));
    }

    out.push_str("</div>");
    out
}

pub fn render_clarification(questions: &[String]) -> String {
    let mut out = String::from("<div class=\"date-plan date-plan-clarification\">");
    out.push_str(&format!(
        "<p class=\"date-plan-clarification-lead\">{}</p>",
        CLARIFICATION_LEAD
    ));
    out.push_str("<ol class=\"date-plan-questions\">");
    for question in questions {
        out.push_str(&format!("<li>{}</li>", escape_html(question)));
    }
    out.push_str("</ol></div>");
    out
}

/// The meta strip; empty when none of its fields are present.
pub fn render_meta(meta: &PlanMeta) -> String {
    let mut entries: Vec<(&str, String)> = Vec::new();

    if let Some(time) = non_empty(meta.meetup_time.as_deref()) {
        entries.push(("集合", format_meta_time(time)));
    }
    if let Some(time) = non_empty(meta.breakup_time.as_deref()) {
        entries.push(("解散", format_meta_time(time)));
    }
    if let Some(label) = meta.transport_mode.and_then(|mode| mode.label()) {
        entries.push(("移動手段", label.to_string()));
    }
    if let Some(date) = non_empty(meta.assumed_date.as_deref()) {
        entries.push(("日付", format_date(date)));
    }

    if entries.is_empty() {
        return String::new();
    }

    let mut out = String::from("<div class=\"date-plan-meta\">");
    for (label, value) in entries {
        out.push_str(&format!(
            "<span class=\"date-plan-meta-item\"><span class=\"date-plan-meta-label\">{}</span> {}</span>",
            label,
            escape_html(&value)
        ));
    }
    out.push_str("</div>");
    out
}

fn render_plan(plan: &Plan, idx: usize, key: &str, mismatches: &[CheckMismatch]) -> String {
    let position = idx + 1;
    let badge = non_empty(plan.plan_id.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{position}"));
    let title = non_empty(Some(plan.title.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("プラン {position}"));

    let mut out = format!(
        "<section class=\"date-plan-card\" data-plan-key=\"{}\">",
        escape_html(key)
    );

    out.push_str("<header class=\"date-plan-header\">");
    out.push_str(&format!(
        "<h3 class=\"date-plan-title\">{}</h3>",
        escape_html(&title)
    ));
    out.push_str(&format!(
        "<span class=\"date-plan-id\">{}</span>",
        escape_html(&badge)
    ));
    if let Some(theme) = non_empty(Some(plan.theme.as_str())) {
        out.push_str(&format!(
            "<p class=\"date-plan-theme\">{}</p>",
            escape_html(theme)
        ));
    }
    out.push_str("</header>");

    if let Some(summary) = non_empty(plan.summary.as_deref()) {
        out.push_str(&format!(
            "<p class=\"date-plan-summary\">{}</p>",
            escape_html(summary)
        ));
    }

    if let Some(budget) = plan.budget_estimate_jpy.as_ref() {
        out.push_str(&render_budget(budget));
    }

    if !plan.constraints_respected.is_empty() {
        out.push_str("<ul class=\"date-plan-constraints\">");
        for constraint in &plan.constraints_respected {
            out.push_str(&format!(
                "<li class=\"date-plan-tag\">{}</li>",
                escape_html(constraint)
            ));
        }
        out.push_str("</ul>");
    }

    out.push_str(&render_itinerary(&plan.itinerary));

    if let Some(checks) = plan.checks.as_ref() {
        out.push_str("<ul class=\"date-plan-checks\">");
        for check in CheckKind::ALL {
            let passed = check.read(checks);
            let state = if passed { "pass" } else { "fail" };
            out.push_str(&format!(
                "<li class=\"date-plan-check {}\">{} {}",
                state,
                check_glyph(passed),
                check.caption()
            ));
            if let Some(mismatch) = mismatches.iter().find(|m| m.check == check) {
                out.push_str(&format!(
                    " <span class=\"date-plan-check-mismatch\" title=\"再計算: {}\">⚠️</span>",
                    check_glyph(mismatch.recomputed)
                ));
            }
            out.push_str("</li>");
        }
        out.push_str("</ul>");
    }

    out.push_str("</section>");
    out
}

pub fn render_budget(budget: &BudgetEstimate) -> String {
    let range = if budget.min == budget.max {
        format_yen(budget.min)
    } else {
        format!("{} 〜 {}", format_yen(budget.min), format_yen(budget.max))
    };

    let mut out = format!(
        "<div class=\"date-plan-budget\"><span class=\"date-plan-budget-label\">予算</span> {}",
        range
    );
    if let Some(notes) = non_empty(budget.notes.as_deref()) {
        out.push_str(&format!(
            " <span class=\"date-plan-budget-notes\">{}</span>",
            escape_html(notes)
        ));
    }
    out.push_str("</div>");
    out
}

pub fn render_itinerary(items: &[ItineraryItem]) -> String {
    let mut out = String::from(
        "<table class=\"date-plan-itinerary\"><thead><tr>\
         <th>時間</th><th>種類</th><th>内容</th><th>エリア</th><th>リンク</th>\
         </tr></thead><tbody>",
    );
    for item in items {
        out.push_str(&render_item(item));
    }
    out.push_str("</tbody></table>");
    out
}

fn render_item(item: &ItineraryItem) -> String {
    let kind = item.kind();
    let mut out = String::from("<tr>");

    out.push_str(&format!(
        "<td class=\"date-plan-time\">{} - {}</td>",
        escape_html(&format_item_time(&item.start)),
        escape_html(&format_item_time(&item.end))
    ));
    out.push_str(&format!(
        "<td><span class=\"date-plan-badge {}\">{}</span></td>",
        kind.color_class(),
        kind.label()
    ));

    out.push_str(&format!(
        "<td><div class=\"date-plan-name\">{}</div>",
        escape_html(&item.name)
    ));
    if let Some(notes) = non_empty(item.notes.as_deref()) {
        out.push_str(&format!(
            "<div class=\"date-plan-notes\">{}</div>",
            escape_html(notes)
        ));
    }
    out.push_str("</td>");

    out.push_str(&format!(
        "<td class=\"date-plan-area\">{}</td>",
        escape_html(&item.area)
    ));

    out.push_str("<td class=\"date-plan-links\">");
    if let Some(links) = item.links.as_ref() {
        out.push_str(&render_links(links));
    }
    out.push_str("</td></tr>");
    out
}

/// Link affordances for whichever URLs are present, in a fixed order.
pub fn render_links(links: &ItemLinks) -> String {
    let candidates = [
        (links.google_maps_search_url.as_deref(), "map", "🗺️", "地図"),
        (links.web_search_url.as_deref(), "web", "🔍", "Web検索"),
        (links.image_search_url.as_deref(), "image", "🖼️", "画像"),
    ];

    let anchors: Vec<String> = candidates
        .into_iter()
        .filter_map(|(url, class, icon, label)| {
            let url = non_empty(url)?;
            Some(format!(
                "<li><a class=\"date-plan-link date-plan-link-{}\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{} {}</a></li>",
                class,
                escape_html(url.trim()),
                icon,
                label
            ))
        })
        .collect();

    if anchors.is_empty() {
        return String::new();
    }
    format!("<ul class=\"date-plan-link-list\">{}</ul>", anchors.concat())
}

/// List keys: the plan id when present and unique, else the 1-based position.
fn plan_keys(plans: &[Plan]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for id in plans.iter().filter_map(|plan| non_empty(plan.plan_id.as_deref())) {
        *counts.entry(id).or_default() += 1;
    }

    plans
        .iter()
        .enumerate()
        .map(|(idx, plan)| match non_empty(plan.plan_id.as_deref()) {
            Some(id) if counts.get(id) == Some(&1) => id.to_string(),
            _ => format!("plan-{}", idx + 1),
        })
        .collect()
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|value| !value.trim().is_empty())
}
