use std::env;

use crate::{
    error::{Result, ViewError},
    extract::ExtractOptions,
    render::RenderOptions,
    schemas::Validator,
};

pub const VERIFY_CHECKS_VAR: &str = "DATEPLAN_VERIFY_CHECKS";
pub const STRICT_SCHEMA_VAR: &str = "DATEPLAN_STRICT_SCHEMA";
pub const NORMALIZE_VAR: &str = "DATEPLAN_NORMALIZE";

/// Switches shared by the extractor, the renderer and the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewConfig {
    /// Recompute plan checks and flag disagreements
    pub verify_checks: bool,
    /// Validate payloads against the generated JSON Schema before conversion
    pub strict_schema: bool,
    /// Run the schedule normaliser over extracted payloads
    pub normalize: bool,
}

impl ViewConfig {
    /// Read the `DATEPLAN_*` variables. Unset variables keep their default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |name: &str| -> Result<bool> {
            match lookup(name) {
                Some(raw) => parse_flag(name, &raw),
                None => Ok(false),
            }
        };

        Ok(Self {
            verify_checks: flag(VERIFY_CHECKS_VAR)?,
            strict_schema: flag(STRICT_SCHEMA_VAR)?,
            normalize: flag(NORMALIZE_VAR)?,
        })
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            validator: Validator::from_strict_flag(self.strict_schema),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            verify_checks: self.verify_checks,
        }
    }
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => Err(ViewError::Config(format!(
            "{name} must be a boolean flag, got `{other}`"
        ))),
    }
}
