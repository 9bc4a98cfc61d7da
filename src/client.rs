use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;

use crate::config::FormConfig;
use crate::error::FormError;
use crate::model::RecipePayload;

/// Thin client for the recipe backend's create endpoint.
#[derive(Debug, Clone)]
pub struct RecipeClient {
    client: Client,
    endpoint: String,
}

impl RecipeClient {
    /// Create a client from configuration, applying its request timeout.
    pub fn new(config: &FormConfig) -> Result<Self, FormError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        let endpoint = format!(
            "{}{}",
            config.base_url.trim_end_matches('/'),
            config.create_path
        );
        Ok(Self { client, endpoint })
    }

    /// Create a client pointed at `base_url` with default settings.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FormError> {
        Self::new(&FormConfig {
            base_url: base_url.into(),
            ..FormConfig::default()
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the recipe and return the identifier assigned by the server.
    ///
    /// # Errors
    /// - [`FormError::Http`] for transport failures, including timeouts
    /// - [`FormError::Submit`] for non-success statuses or a body without an id
    pub async fn create(&self, payload: &RecipePayload) -> Result<String, FormError> {
        debug!("Posting recipe '{}' to {}", payload.title, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Recipe creation failed with status: {}", status);
            return Err(FormError::create_failed());
        }

        let body: Value = response.json().await?;
        debug!("Create response: {:?}", body);

        recipe_id(&body).ok_or_else(|| {
            warn!("Create response did not include a recipe id");
            FormError::create_failed()
        })
    }
}

/// Pull the server-assigned id out of a create response.
fn recipe_id(body: &Value) -> Option<String> {
    ["_id", "id"].iter().find_map(|key| match &body[*key] {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    })
}
