//! Host-side routing of an assistant message to the view that displays it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::ViewConfig,
    extract::{extract_with, strip_code_fence},
    format::escape_html,
    render::{render_clarification, render_with},
    schedule::normalize_response,
    types::{DatePlanResponse, PlanStatus},
};

/// An assistant turn as the host receives it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub content: String,
    /// Transport-level failure reported instead of (or alongside) content
    #[serde(default)]
    pub error: Option<String>,
}

impl AssistantMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageView {
    Error(String),
    Clarification(DatePlanResponse),
    Itinerary(DatePlanResponse),
    /// Fence-stripped text for the host's markdown renderer
    Markdown(String),
}

impl MessageView {
    pub fn kind(&self) -> &'static str {
        match self {
            MessageView::Error(_) => "error",
            MessageView::Clarification(_) => "clarification",
            MessageView::Itinerary(_) => "itinerary",
            MessageView::Markdown(_) => "markdown",
        }
    }

    pub fn payload(&self) -> Option<&DatePlanResponse> {
        match self {
            MessageView::Clarification(response) | MessageView::Itinerary(response) => {
                Some(response)
            }
            _ => None,
        }
    }

    pub fn to_html(&self, config: &ViewConfig) -> String {
        match self {
            MessageView::Error(error) => format!(
                "<div class=\"message-error\" role=\"alert\">{}</div>",
                escape_html(error)
            ),
            MessageView::Clarification(response) => {
                render_clarification(&response.clarifying_questions)
            }
            MessageView::Itinerary(response) => render_with(response, &config.render_options()),
            MessageView::Markdown(text) => format!(
                "<div class=\"message-markdown\" data-render=\"markdown\">{}</div>",
                escape_html(text)
            ),
        }
    }
}

/// Pick the view for a message. A transport error wins over any content.
pub fn route_message(message: &AssistantMessage, config: &ViewConfig) -> MessageView {
    if let Some(error) = message
        .error
        .as_deref()
        .filter(|error| !error.trim().is_empty())
    {
        return MessageView::Error(error.to_string());
    }

    let Some(mut response) = extract_with(&message.content, config.extract_options()) else {
        debug!(target: "dateplan::extract", "no date plan in message; using markdown view");
        return MessageView::Markdown(strip_code_fence(&message.content).to_string());
    };

    if config.normalize {
        normalize_response(&mut response);
    }

    match response.status {
        PlanStatus::NeedsClarification => MessageView::Clarification(response),
        PlanStatus::Ok => MessageView::Itinerary(response),
    }
}
