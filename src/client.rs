use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

use crate::config::Credentials;
use crate::error::{PulseError, Result};

/// Authenticated client for the Jira Cloud REST API (v3).
pub struct JiraClient {
    http: Client,
    base: Url,
    email: String,
    api_token: String,
}

impl JiraClient {
    pub fn new(site_url: &str, email: String, api_token: String) -> Result<Self> {
        let base = Url::parse(site_url.trim_end_matches('/')).map_err(|e| {
            PulseError::InvalidSiteUrl {
                url: site_url.to_string(),
                source: e,
            }
        })?;

        Ok(Self {
            http: Client::new(),
            base,
            email,
            api_token,
        })
    }

    pub fn from_credentials(credentials: Credentials) -> Result<Self> {
        Self::new(
            &credentials.site_url,
            credentials.email,
            credentials.api_token,
        )
    }

    pub fn site(&self) -> &str {
        self.base.host_str().unwrap_or_else(|| self.base.as_str())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| PulseError::InvalidSiteUrl {
                url: format!("{}{path}", self.base),
                source: e,
            })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        self.send(self.request(Method::GET, url).query(query)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        self.send(self.request(Method::POST, url).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PulseError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            return Err(PulseError::ApiError {
                status: status.as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }

        Ok(response.json().await?)
    }
}
