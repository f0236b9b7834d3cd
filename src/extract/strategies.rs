use once_cell::sync::Lazy;
use regex::Regex;

/// A triple-backtick fence, optionally tagged `json`, around one object.
static FENCED_JSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```(?:json)?\s*(\{[\s\S]*?\})\s*```").expect("valid fenced json regex")
});

/// A line starting with the bare word `json`, then the object to end of text.
static TAGGED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^json\s+(\{[\s\S]*)").expect("valid tagged json regex"));

/// Matchers in the extraction cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    FencedBlock,
    TaggedJson,
    BalancedBraces,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::FencedBlock => "fenced_block",
            Strategy::TaggedJson => "tagged_json",
            Strategy::BalancedBraces => "balanced_braces",
        }
    }
}

type Matcher = fn(&str) -> Option<&str>;

/// Cascade order. The first matcher returning a candidate wins.
pub static STRATEGIES: &[(Strategy, Matcher)] = &[
    (Strategy::FencedBlock, fenced_block),
    (Strategy::TaggedJson, tagged_json),
    (Strategy::BalancedBraces, balanced_braces),
];

pub fn fenced_block(text: &str) -> Option<&str> {
    FENCED_JSON
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn tagged_json(text: &str) -> Option<&str> {
    TAGGED_JSON
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Span from the first `{` to its matching `}`.
///
/// Braces inside JSON string literals do not count. When the text ends
/// before the depth returns to zero, the rest of the text is the candidate.
pub fn balanced_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    Some(&text[start..])
}
