//! Full configuration validation.
//!
//! Each check pushes a human-readable message; all problems are reported
//! together in a single `ConfigError`.

mod helpers;


use crate::schema::ChatConfig;
use gatechat_common::ConfigError;

use helpers::{validate_non_empty, validate_range};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ChatConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_access(&mut errors, config);
    validate_gemini(&mut errors, config);
    validate_attachments(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_access(errors: &mut Vec<String>, config: &ChatConfig) {
    validate_non_empty(errors, "access.valid_secret", &config.access.valid_secret);
    validate_range(errors, "access.expiry_hours", config.access.expiry_hours, 1, 8760);
}

fn validate_gemini(errors: &mut Vec<String>, config: &ChatConfig) {
    let gemini = &config.gemini;

    if gemini.api_keys.is_empty() {
        errors.push("gemini.api_keys must contain at least one key".into());
    }
    for (i, key) in gemini.api_keys.iter().enumerate() {
        if key.trim().is_empty() {
            errors.push(format!("gemini.api_keys[{i}] is blank"));
        }
    }

    validate_non_empty(errors, "gemini.model", &gemini.model);

    if !(gemini.base_url.starts_with("https://") || gemini.base_url.starts_with("http://")) {
        errors.push(format!(
            "gemini.base_url = {:?} must start with http:// or https://",
            gemini.base_url
        ));
    }

    if gemini.request_timeout_secs == 0 {
        errors.push("gemini.request_timeout_secs must be greater than 0".into());
    }
}

fn validate_attachments(errors: &mut Vec<String>, config: &ChatConfig) {
    if config.attachments.max_file_size == 0 {
        errors.push("attachments.max_file_size must be greater than 0".into());
    }
}
