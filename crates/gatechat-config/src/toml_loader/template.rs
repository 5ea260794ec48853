//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# Gatechat Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# GATECHAT_SECRET, GATECHAT_API_KEYS (comma separated) and GATECHAT_MODEL
# environment variables take precedence over this file.

[access]
# Passphrase that unlocks the chat. Required.
valid_secret = ""
# expiry_hours = 24      # 1-8760

[gemini]
# At least one key is required; later keys are used when earlier ones fail.
api_keys = []
# model = "gemini-2.0-flash"
# base_url = "https://generativelanguage.googleapis.com/v1beta/models"
# connect_timeout_secs = 10
# request_timeout_secs = 120

[persona]
# preamble = "You are Gatechat, a concise and friendly assistant. Answer plainly and use fenced code blocks for code."
# greeting = "Hello, welcome to Gatechat."
# multimodal_ack = "Understood. Which image should I look at?"
# image_prompt = "Describe and analyse this image."
# developer_question = "Who is your developer?"
# developer_info = "I am Gatechat, built and maintained by the Gatechat developers."

[notices]
# unlocked = "Key verified! You can now use Gatechat."
# restored = "Key detected! You can use Gatechat right away."
# rejected = "Wrong key! Please try again."
# locked_developer = "Enter your key first."
# send_failed = "Sorry, something went wrong. Please try again."

[attachments]
# max_file_size = 20971520   # bytes (20 MiB)
# allowed_mime_prefix = "image/"

[logging]
# level = "info"         # trace, debug, info, warn, error
"##
}
