//! Restricted inline markdown for `markdown_summary`.
//!
//! Only `##`/`###` headings, `**bold**`, `*italic*` and line breaks are
//! understood. Everything else passes through as escaped text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::format::escape_html;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold regex"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").expect("valid italic regex"));

enum Segment {
    Block(String),
    Inline(String),
}

pub fn render_inline_markdown(text: &str) -> String {
    let segments: Vec<Segment> = text.lines().map(render_line).collect();

    let mut out = String::new();
    let mut previous_inline = false;
    for segment in segments {
        match segment {
            Segment::Block(html) => {
                out.push_str(&html);
                previous_inline = false;
            }
            Segment::Inline(html) => {
                if previous_inline {
                    out.push_str("<br>");
                }
                out.push_str(&html);
                previous_inline = true;
            }
        }
    }
    out
}

fn render_line(line: &str) -> Segment {
    let escaped = escape_html(line);
    if let Some(heading) = escaped.strip_prefix("### ") {
        Segment::Block(format!("<h4>{}</h4>", emphasis(heading.trim())))
    } else if let Some(heading) = escaped.strip_prefix("## ") {
        Segment::Block(format!("<h3>{}</h3>", emphasis(heading.trim())))
    } else {
        Segment::Inline(emphasis(&escaped))
    }
}

fn emphasis(text: &str) -> String {
    let bold = BOLD.replace_all(text, "<strong>$1</strong>");
    ITALIC.replace_all(&bold, "<em>$1</em>").into_owned()
}
