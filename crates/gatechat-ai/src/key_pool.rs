//! Circular pool of interchangeable API keys.

use std::fmt;

use crate::AiError;

/// Ordered API keys plus the index of the one in use.
///
/// The index always stays in `0..keys.len()`.
#[derive(Clone)]
pub struct KeyPool {
    keys: Vec<String>,
    index: usize,
}

impl fmt::Debug for KeyPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPool")
            .field("keys", &format_args!("[{} REDACTED]", self.keys.len()))
            .field("index", &self.index)
            .finish()
    }
}

impl KeyPool {
    pub fn new(keys: Vec<String>) -> Result<Self, AiError> {
        if keys.is_empty() {
            return Err(AiError::Config("key pool must not be empty".into()));
        }
        Ok(Self { keys, index: 0 })
    }

    pub fn current(&self) -> &str {
        &self.keys[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Advance to the next key, wrapping around, and return it.
    pub fn rotate(&mut self) -> &str {
        self.index = (self.index + 1) % self.keys.len();
        tracing::debug!(index = self.index, "switched API key");
        self.current()
    }
}
