//! Per-screen upload parameters: model, access token, locale.

use resumedrop_i18n::Locale;
use tracing::debug;

use crate::config::UploadConfig;
use crate::error::UploadError;

/// Parameters attached to every request from the upload screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    selected_model: String,
    access_token: Option<String>,
    locale: Locale,
}

impl UploadSession {
    pub fn new(config: &UploadConfig, locale: Locale) -> Self {
        Self {
            selected_model: config.default_model.clone(),
            access_token: None,
            locale,
        }
    }

    pub fn selected_model(&self) -> &str {
        &self.selected_model
    }

    /// The access token, if one was entered. Blank input counts as none.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Switches model. The model must be in the catalog and selection must
    /// be enabled.
    pub fn select_model(&mut self, config: &UploadConfig, model: &str) -> Result<(), UploadError> {
        if model == self.selected_model {
            return Ok(());
        }
        if !config.model_selection_enabled {
            return Err(UploadError::ModelSelectionDisabled);
        }
        if !config.knows_model(model) {
            return Err(UploadError::UnknownModel(model.to_string()));
        }

        debug!(from = %self.selected_model, to = %model, "model selected");
        self.selected_model = model.to_string();
        Ok(())
    }

    /// Stores a token, trimmed. An empty string clears it.
    pub fn set_access_token(&mut self, token: &str) {
        let trimmed = token.trim();
        self.access_token = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    /// True when the selected model is premium and no token is present.
    pub fn upload_disabled(&self, config: &UploadConfig) -> bool {
        config.is_premium(&self.selected_model) && self.access_token.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_default_model_without_token() {
        let cfg = UploadConfig::default();
        let session = UploadSession::new(&cfg, Locale::EnUs);
        assert_eq!(session.selected_model(), "gpt-4.1-mini");
        assert_eq!(session.access_token(), None);
        assert!(!session.upload_disabled(&cfg));
    }

    #[test]
    fn premium_model_needs_token() {
        let cfg = UploadConfig::default();
        let mut session = UploadSession::new(&cfg, Locale::EnUs);
        session.select_model(&cfg, "gpt-4o").unwrap();
        assert!(session.upload_disabled(&cfg));

        session.set_access_token("   ");
        assert!(session.upload_disabled(&cfg));

        session.set_access_token(" tok-1 ");
        assert_eq!(session.access_token(), Some("tok-1"));
        assert!(!session.upload_disabled(&cfg));
    }

    #[test]
    fn unknown_model_rejected() {
        let cfg = UploadConfig::default();
        let mut session = UploadSession::new(&cfg, Locale::EnUs);
        assert_eq!(
            session.select_model(&cfg, "gpt-2"),
            Err(UploadError::UnknownModel("gpt-2".into()))
        );
        assert_eq!(session.selected_model(), "gpt-4.1-mini");
    }

    #[test]
    fn selection_can_be_disabled() {
        let cfg = UploadConfig {
            model_selection_enabled: false,
            ..Default::default()
        };
        let mut session = UploadSession::new(&cfg, Locale::ZhCn);
        assert_eq!(
            session.select_model(&cfg, "gpt-5"),
            Err(UploadError::ModelSelectionDisabled)
        );
        // Re-selecting the current model is always fine.
        assert!(session.select_model(&cfg, "gpt-4.1-mini").is_ok());
    }
}
