//! Canned text the controller speaks with.

/// Fixed strings for the seed turns, the developer shortcut, and notices.
#[derive(Debug, Clone)]
pub struct ConversationScript {
    /// First user turn of the history.
    pub preamble: String,
    /// First model turn of the history.
    pub greeting: String,
    /// Recorded as the user text when only images are sent.
    pub image_prompt: String,
    pub developer_question: String,
    pub developer_info: String,
    pub notices: Notices,
}

#[derive(Debug, Clone)]
pub struct Notices {
    /// Confirmation after a correct secret.
    pub unlocked: String,
    /// Confirmation when a stored credential opens the gate at startup.
    pub restored: String,
    /// Model message after a wrong secret.
    pub rejected: String,
    /// Model message for the developer shortcut while locked.
    pub locked_developer: String,
    /// Model message replacing any failed send.
    pub send_failed: String,
}

impl Default for ConversationScript {
    fn default() -> Self {
        Self {
            preamble: "You are Gatechat, a concise and friendly assistant.".into(),
            greeting: "Hello, welcome to Gatechat.".into(),
            image_prompt: "Describe and analyse this image.".into(),
            developer_question: "Who is your developer?".into(),
            developer_info: "I am Gatechat, built and maintained by the Gatechat developers."
                .into(),
            notices: Notices::default(),
        }
    }
}

impl Default for Notices {
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
