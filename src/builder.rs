use std::time::Duration;

use crate::{FormConfig, FormError, RecipeDraft, RecipeForm, UserReference};

/// Where the initial draft comes from
#[derive(Debug, Clone, Default)]
enum DraftSource {
    /// One blank row per list
    #[default]
    Blank,
    /// JSON document using the backend's field names
    Json(String),
}

/// Builder for configuring a [`RecipeForm`]
#[derive(Debug, Default)]
pub struct RecipeFormBuilder {
    owner: UserReference,
    source: DraftSource,
    config: Option<FormConfig>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_image_bytes: Option<u64>,
}

impl RecipeFormBuilder {
    /// Set the signed-in user the recipe belongs to
    ///
    /// # Example
    /// ```
    /// use recipe_form::{RecipeForm, UserReference};
    /// use serde_json::json;
    ///
    /// let builder = RecipeForm::builder()
    ///     .owner(UserReference::new(json!({"username": "cook"})));
    /// ```
    pub fn owner(mut self, owner: UserReference) -> Self {
        self.owner = owner;
        self
    }

    /// Prefill the form from a JSON draft document
    ///
    /// Keys follow the backend contract (`recipe`, `cuisine`, `ingredients`,
    /// `instructions`, `imageurl`, ...). An `owner` in the document takes
    /// precedence over [`owner`](Self::owner).
    ///
    /// # Example
    /// ```
    /// use recipe_form::RecipeForm;
    ///
    /// let form = RecipeForm::builder()
    ///     .draft_json(r#"{"recipe": "Pasta", "cuisine": "Italian"}"#)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(form.draft().title, "Pasta");
    /// ```
    pub fn draft_json(mut self, document: impl Into<String>) -> Self {
        self.source = DraftSource::Json(document.into());
        self
    }

    /// Use a loaded configuration instead of the defaults
    pub fn config(mut self, config: FormConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the backend base URL
    ///
    /// # Example
    /// ```
    /// use recipe_form::RecipeForm;
    ///
    /// let form = RecipeForm::builder()
    ///     .base_url("http://localhost:8080")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(form.config().base_url, "http://localhost:8080");
    /// ```
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a timeout for the submit request; `Duration::ZERO` disables it
    ///
    /// # Example
    /// ```
    /// use recipe_form::RecipeForm;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeForm::builder()
    ///     .timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Override the image size ceiling in bytes
    pub fn max_image_bytes(mut self, bytes: u64) -> Self {
        self.max_image_bytes = Some(bytes);
        self
    }

    /// Build the form
    ///
    /// # Errors
    /// Returns [`FormError::Draft`] if the draft document is not valid JSON.
    pub fn build(self) -> Result<RecipeForm, FormError> {
        let mut config = self.config.unwrap_or_default();
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        }
        if let Some(bytes) = self.max_image_bytes {
            config.max_image_bytes = bytes;
        }

        let draft = match self.source {
            DraftSource::Blank => RecipeDraft::new(self.owner),
            DraftSource::Json(document) => RecipeDraft::from_json(&document, self.owner)?,
        };

        Ok(RecipeForm::from_draft(draft, config))
    }
}

impl RecipeForm {
    /// Creates a new builder for a recipe form
    ///
    /// # Example
    /// ```
    /// use recipe_form::RecipeForm;
    ///
    /// let form = RecipeForm::builder().build().unwrap();
    /// assert_eq!(form.draft().ingredients.len(), 1);
    /// ```
    pub fn builder() -> RecipeFormBuilder {
        RecipeFormBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_on_top_of_config() {
        let form = RecipeForm::builder()
            .config(FormConfig {
                timeout_ms: 5_000,
                ..FormConfig::default()
            })
            .max_image_bytes(512)
            .build()
            .unwrap();

        assert_eq!(form.config().timeout_ms, 5_000);
        assert_eq!(form.config().max_image_bytes, 512);
    }

    #[test]
    fn test_timeout_keeps_sub_second_and_zero() {
        let form = RecipeForm::builder()
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();
        assert_eq!(
            form.config().request_timeout(),
            Some(Duration::from_millis(500))
        );

        let form = RecipeForm::builder().timeout(Duration::ZERO).build().unwrap();
        assert_eq!(form.config().request_timeout(), None);
    }

    #[test]
    fn test_invalid_draft_json() {
        let result = RecipeForm::builder().draft_json("{not json").build();
        assert!(matches!(result, Err(FormError::Draft(_))));
    }
}
