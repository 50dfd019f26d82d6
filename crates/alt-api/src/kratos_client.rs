//! HTTP-backed [`KratosClient`] implementation, talking to an ORY
//! Kratos-compatible identity service's public API (spec §4, "the
//! identity provider's own protocol" is explicitly out of scope — this
//! is just enough of a client to log in, register, and map its errors).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use alt_types::ports::kratos::{KratosClient, KratosIdentity};
use alt_types::CoreError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct HttpKratosClient {
    client: Client,
    public_url: String,
}

impl HttpKratosClient {
    pub fn new(public_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("reqwest client builds with static TLS config"),
            public_url,
        }
    }
}

#[derive(Debug, Serialize)]
struct CredentialsRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct IdentityResponse {
    user_id: String,
    role: String,
    tenant_id: String,
}

impl From<IdentityResponse> for KratosIdentity {
    fn from(response: IdentityResponse) -> Self {
        Self { user_id: response.user_id, role: response.role, tenant_id: response.tenant_id }
    }
}

#[async_trait]
impl KratosClient for HttpKratosClient {
    async fn login(&self, username: &str, password: &str) -> Result<KratosIdentity, CoreError> {
        let url = format!("{}/self-service/login", self.public_url);
        let response = self
            .client
            .post(&url)
            .json(&CredentialsRequest { username, password })
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "identity provider unreachable during login");
                CoreError::external_api(format!("identity provider unreachable: {err}"))
            })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(CoreError::unauthenticated("bad credentials"));
        }
        if !response.status().is_success() {
            warn!(status = %response.status(), "identity provider returned an error for login");
            return Err(CoreError::external_api(format!(
                "identity provider returned {}",
                response.status()
            )));
        }

        let identity: IdentityResponse = response
            .json()
            .await
            .map_err(|err| CoreError::external_api(format!("malformed identity response: {err}")))?;
        Ok(identity.into())
    }

    async fn register(&self, username: &str, password: &str) -> Result<KratosIdentity, CoreError> {
        let url = format!("{}/self-service/registration", self.public_url);
        let response = self
            .client
            .post(&url)
            .json(&CredentialsRequest { username, password })
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "identity provider unreachable during registration");
                CoreError::external_api(format!("identity provider unreachable: {err}"))
            })?;

        if response.status() == reqwest::StatusCode::CONFLICT {
            return Err(CoreError::validation("username already taken"));
        }
        if !response.status().is_success() {
            warn!(status = %response.status(), "identity provider returned an error for registration");
            return Err(CoreError::external_api(format!(
                "identity provider returned {}",
                response.status()
            )));
        }

        let identity: IdentityResponse = response
            .json()
            .await
            .map_err(|err| CoreError::external_api(format!("malformed identity response: {err}")))?;
        Ok(identity.into())
    }
}
