//! Request context

/// Uuid of the system default language
pub const DEFAULT_LANGUAGE_UUID: &str = "2fbb5fe2e29a4d70aa5854ce7ce3e20b";

/// Per-request settings that shape how translated fields are read
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    /// Language whose translations are joined
    pub language_uuid: String,
    /// Language used when a translation is missing in `language_uuid`
    pub fallback_language_uuid: Option<String>,
}

impl Context {
    pub fn new(language_uuid: impl Into<String>) -> Self {
        Self {
            language_uuid: language_uuid.into(),
            fallback_language_uuid: None,
        }
    }

    pub fn with_fallback(mut self, language_uuid: impl Into<String>) -> Self {
        self.fallback_language_uuid = Some(language_uuid.into());
        self
    }

    /// Fallback language, if set and different from the primary one
    pub fn effective_fallback(&self) -> Option<&str> {
        self.fallback_language_uuid
            .as_deref()
            .filter(|fallback| *fallback != self.language_uuid)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE_UUID)
    }
}
