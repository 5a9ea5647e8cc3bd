use crate::error::ConsentError;
use std::time::Duration;

/// App id used when the deployment does not configure one.
pub const DEFAULT_APP_ID: &str = "lscf_main";

/// Delay before the banner is shown when no decision was found.
pub const DEFAULT_BANNER_DELAY: Duration = Duration::from_millis(500);

const KEY_PREFIX: &str = "cookie_consent_";

/// Per-deployment consent settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentConfig {
    app_id: String,
    pub banner_delay: Duration,
}

impl ConsentConfig {
    /// Build a config for `app_id`. The id becomes part of a storage key,
    /// so it is restricted to ASCII alphanumerics, `_` and `-`.
    pub fn new(app_id: impl Into<String>) -> Result<Self, ConsentError> {
        let app_id = app_id.into();
        Self::validate_app_id(&app_id)?;
        Ok(Self {
            app_id,
            banner_delay: DEFAULT_BANNER_DELAY,
        })
    }

    pub fn with_banner_delay(mut self, delay: Duration) -> Self {
        self.banner_delay = delay;
        self
    }

    fn validate_app_id(app_id: &str) -> Result<(), ConsentError> {
        if app_id.is_empty() {
            return Err(ConsentError::InvalidAppId(
                app_id.into(),
                "app id cannot be empty".into(),
            ));
        }
        if let Some(c) = app_id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(ConsentError::InvalidAppId(
                app_id.replace('\0', "\\0"),
                format!("character {:?} is not allowed", c),
            ));
        }
        Ok(())
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// The key the decision is stored under: `cookie_consent_<app-id>`.
    pub fn storage_key(&self) -> String {
        format!("{}{}", KEY_PREFIX, self.app_id)
    }
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.into(),
            banner_delay: DEFAULT_BANNER_DELAY,
        }
    }
}
