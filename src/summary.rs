//! Markdown summary generated when a producer omits `markdown_summary`.

use std::collections::HashSet;

use crate::types::DatePlanResponse;

/// Build the three-section summary: proposals, comparison, caveats.
pub fn generate_markdown_summary(response: &DatePlanResponse) -> String {
    if response.plans.is_empty() {
        return "## エラー\nプランが生成されませんでした。".to_string();
    }

    let mut markdown = String::from("## 3つの提案\n\n");
    for plan in &response.plans {
        let title = [Some(plan.title.as_str()), plan.plan_id.as_deref()]
            .into_iter()
            .flatten()
            .find(|text| !text.trim().is_empty())
            .unwrap_or("プラン");
        markdown.push_str(&format!("### {title}\n"));
        if !plan.theme.trim().is_empty() {
            markdown.push_str(&format!("**テーマ**: {}\n\n", plan.theme));
        }
        if let Some(summary) = plan.summary.as_deref().filter(|s| !s.trim().is_empty()) {
            markdown.push_str(&format!("{summary}\n\n"));
        }
    }

    markdown.push_str("## 比較（どれがおすすめ？）\n\n");
    markdown.push_str("各プランの特徴を比較して、あなたの好みに合ったものを選んでください。\n\n");

    markdown.push_str("## 注意点（制約・禁止事項・確認事項）\n\n");
    let mut seen = HashSet::new();
    let constraints: Vec<&str> = response
        .plans
        .iter()
        .flat_map(|plan| plan.constraints_respected.iter())
        .map(String::as_str)
        .filter(|constraint| seen.insert(*constraint))
        .collect();

    if constraints.is_empty() {
        markdown.push_str("- 特に制約はありません。\n");
    } else {
        for constraint in constraints {
            markdown.push_str(&format!("- {constraint}\n"));
        }
    }

    markdown
}
