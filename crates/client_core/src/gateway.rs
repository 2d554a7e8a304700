//! HTTP binding to the hosted auth and table APIs.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use shared::{
    domain::{Entry, NewEntry, Session},
    error::service_error_message,
    protocol::{AuthUser, Ordering, PasswordGrantRequest, TokenResponse},
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use crate::{config::GatewayConfig, error::GatewayError, BackendGateway};

const AUTH_TOKEN_PATH: &str = "auth/v1/token";
const AUTH_USER_PATH: &str = "auth/v1/user";
const AUTH_LOGOUT_PATH: &str = "auth/v1/logout";
const REST_PREFIX: &str = "rest/v1";

pub struct HttpGateway {
    http: Client,
    config: GatewayConfig,
    session: RwLock<Option<Session>>,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: Client, config: GatewayConfig) -> Self {
        Self {
            http,
            config,
            session: RwLock::new(None),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.config
            .supabase_url
            .join(path)
            .map_err(|err| GatewayError::InvalidEndpoint {
                path: path.to_string(),
                reason: err.to_string(),
            })
    }

    fn table_path(&self) -> String {
        format!("{REST_PREFIX}/{}", self.config.table)
    }

    async fn bearer(&self) -> String {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.expose().to_string())
            .unwrap_or_else(|| self.config.anon_key.clone())
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        bearer: &str,
    ) -> Result<RequestBuilder, GatewayError> {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "gateway: request");
        Ok(self
            .http
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer))
    }

    async fn fetch_user(&self, stored: &Session) -> Result<Option<AuthUser>, GatewayError> {
        let response = self
            .request(Method::GET, AUTH_USER_PATH, stored.access_token.expose())?
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            warn!(user_id = %stored.user_id, "auth: stored session rejected by backend");
            return Ok(None);
        }

        decode(check(response).await?).await.map(Some)
    }
}

async fn check(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let status_text = status.canonical_reason().unwrap_or("request failed");
    Err(GatewayError::Service {
        status: status.as_u16(),
        message: service_error_message(&body, status_text),
    })
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    response
        .json::<T>()
        .await
        .map_err(|err| GatewayError::Decode(err.to_string()))
}

#[async_trait]
impl BackendGateway for HttpGateway {
    /// A token that cannot be confirmed is dropped, so the caller and the
    /// gateway both end up signed out.
    async fn current_session(&self) -> Result<Option<Session>, GatewayError> {
        let Some(stored) = self.session.read().await.clone() else {
            return Ok(None);
        };

        let user = match self.fetch_user(&stored).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                *self.session.write().await = None;
                return Ok(None);
            }
            Err(err) => {
                *self.session.write().await = None;
                return Err(err);
            }
        };

        let refreshed = Session {
            user_id: user.id,
            email: user.email,
            access_token: stored.access_token,
        };
        *self.session.write().await = Some(refreshed.clone());
        Ok(Some(refreshed))
    }

    /// Any previous session is dropped first; a failed attempt leaves none.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        if let Some(previous) = self.session.write().await.take() {
            debug!(user_id = %previous.user_id, "auth: replacing stored session");
        }

        let response = self
            .request(Method::POST, AUTH_TOKEN_PATH, &self.config.anon_key)?
            .query(&[("grant_type", "password")])
            .json(&PasswordGrantRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        let token: TokenResponse = decode(check(response).await?).await?;
        let session = token.into_session();
        info!(user_id = %session.user_id, "auth: signed in");
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), GatewayError> {
        let Some(stored) = self.session.write().await.take() else {
            return Ok(());
        };

        let response = self
            .request(Method::POST, AUTH_LOGOUT_PATH, stored.access_token.expose())?
            .send()
            .await?;
        check(response).await?;
        info!(user_id = %stored.user_id, "auth: signed out");
        Ok(())
    }

    async fn list_entries(&self, ordering: &Ordering) -> Result<Vec<Entry>, GatewayError> {
        let bearer = self.bearer().await;
        let response = self
            .request(Method::GET, &self.table_path(), &bearer)?
            .query(&[("select", "*".to_string()), ("order", ordering.to_query_value())])
            .send()
            .await?;
        decode(check(response).await?).await
    }

    async fn insert_entry(&self, entry: &NewEntry) -> Result<(), GatewayError> {
        let Some(stored) = self.session.read().await.clone() else {
            return Err(GatewayError::NotSignedIn);
        };

        let response = self
            .request(Method::POST, &self.table_path(), stored.access_token.expose())?
            .header("Prefer", "return=minimal")
            .json(entry)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
