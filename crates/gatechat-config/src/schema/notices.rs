//! User-facing notice strings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticesConfig {
    pub unlocked: String,
    pub restored: String,
    pub rejected: String,
    pub locked_developer: String,
    pub send_failed: String,
}

impl Default for NoticesConfig {
    fn default() -> Self {
        Self {
            unlocked: "Key verified! You can now use Gatechat.".into(),
            restored: "Key detected! You can use Gatechat right away.".into(),
            rejected: "Wrong key! Please try again.".into(),
            locked_developer: "Enter your key first.".into(),
            send_failed: "Sorry, something went wrong. Please try again.".into(),
        }
    }
}
