//! Environment variable overrides applied on top of the parsed file.

use tracing::info;

use crate::schema::ChatConfig;

pub const SECRET_VAR: &str = "GATECHAT_SECRET";
pub const API_KEYS_VAR: &str = "GATECHAT_API_KEYS";
pub const MODEL_VAR: &str = "GATECHAT_MODEL";

/// Apply `GATECHAT_*` overrides using `lookup` to read variables.
///
/// Blank values are ignored. `GATECHAT_API_KEYS` is split on commas and
/// replaces the whole pool.
pub fn apply_overrides<F>(config: &mut ChatConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(secret) = non_blank(lookup(SECRET_VAR)) {
        info!("access secret overridden from {SECRET_VAR}");
        config.access.valid_secret = secret;
    }

    if let Some(raw) = non_blank(lookup(API_KEYS_VAR)) {
        let keys: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
            .collect();
        info!(count = keys.len(), "API key pool overridden from {API_KEYS_VAR}");
        config.gemini.api_keys = keys;
    }

    if let Some(model) = non_blank(lookup(MODEL_VAR)) {
        config.gemini.model = model;
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
