use tracing::{debug, info};
use yup_oauth2::authenticator::{ApplicationDefaultCredentialsTypes, DefaultAuthenticator};
use yup_oauth2::{ApplicationDefaultCredentialsAuthenticator, ApplicationDefaultCredentialsFlowOpts};

use super::ModelError;

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Where bearer tokens for the model endpoint come from.
pub enum AccessTokenSource {
    Static(String),
    /// Application default credentials: `GOOGLE_APPLICATION_CREDENTIALS` when set,
    /// otherwise the Cloud Run / GCE metadata server.
    ApplicationDefault(DefaultAuthenticator),
}

impl AccessTokenSource {
    pub async fn from_config(token: Option<&str>) -> Result<Self, ModelError> {
        match token {
            Some(token) => Ok(Self::Static(token.to_string())),
            None => Self::application_default().await,
        }
    }

    pub async fn application_default() -> Result<Self, ModelError> {
        let opts = ApplicationDefaultCredentialsFlowOpts::default();

        let authenticator = match ApplicationDefaultCredentialsAuthenticator::builder(opts).await {
            ApplicationDefaultCredentialsTypes::ServiceAccount(auth) => {
                info!("Using service account credentials");
                auth.build().await
            }
            ApplicationDefaultCredentialsTypes::InstanceMetadata(auth) => {
                info!("Using instance metadata credentials");
                auth.build().await
            }
        }
        .map_err(auth_error)?;

        Ok(Self::ApplicationDefault(authenticator))
    }

    pub async fn token(&self) -> Result<String, ModelError> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::ApplicationDefault(authenticator) => {
                debug!("Fetching access token");

                let token = authenticator
                    .token(&[CLOUD_PLATFORM_SCOPE])
                    .await
                    .map_err(auth_error)?;

                require_token(token.token())
            }
        }
    }
}

fn auth_error(e: impl std::fmt::Display) -> ModelError {
    ModelError::Auth(e.to_string())
}

fn require_token(token: Option<&str>) -> Result<String, ModelError> {
    token
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ModelError::Auth("credentials returned no access token".to_string()))
}
