// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP session to a Lan2RF gateway.
//!
//! The gateway speaks plain HTTP GET with JSON-ish bodies. Firmware with
//! user accounts serves the API under `/protect/` and expects basic auth;
//! older firmware serves the same endpoints at the root without
//! credentials. Which scheme to use follows from whether credentials are
//! configured.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::error::{AuthenticationError, CommunicationError, Error};
use crate::protocol::parse_lenient;

/// Configuration for the HTTP session to a gateway.
///
/// # Examples
///
/// ```
/// use lan2rf_lib::HttpConfig;
/// use std::time::Duration;
///
/// // Older firmware, no credentials
/// let config = HttpConfig::new("192.168.0.10");
///
/// // Newer firmware with user accounts
/// let config = HttpConfig::new("192.168.0.10")
///     .with_credentials("admin", "secret")
///     .with_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    host: String,
    port: u16,
    credentials: Option<(String, String)>,
    timeout: Duration,
}

impl HttpConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default request timeout.
    ///
    /// The gateway's RF polling makes it slow to answer at times, so the
    /// default is generous.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

    /// Creates a new configuration for the specified gateway host.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            credentials: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets authentication credentials.
    ///
    /// Configuring credentials switches all requests to the firmware's
    /// protected path and attaches a basic-auth header.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the credentials if set.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.credentials
            .as_ref()
            .map(|(u, p)| (u.as_str(), p.as_str()))
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the URL prefix every endpoint path is appended to.
    ///
    /// Credentials route requests through the firmware's `/protect/` path.
    #[must_use]
    pub fn url_base(&self) -> String {
        let port_suffix = if self.port == Self::DEFAULT_PORT {
            String::new()
        } else {
            format!(":{}", self.port)
        };
        let path = if self.credentials.is_some() {
            "/protect/"
        } else {
            "/"
        };
        format!("http://{}{port_suffix}{path}", self.host)
    }

    /// Creates an [`HttpClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, CommunicationError> {
        let url_base = self.url_base();

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(CommunicationError::Http)?;

        let credentials = self
            .credentials
            .map(|(username, password)| Credentials { username, password });

        Ok(HttpClient {
            url_base,
            client,
            credentials,
        })
    }
}

/// Basic-auth credentials for newer gateway firmware.
#[derive(Debug, Clone)]
struct Credentials {
    username: String,
    password: String,
}

/// HTTP client bound to one gateway.
///
/// Credentials and timeout are fixed at construction; the client carries no
/// other mutable session state, so concurrent requests on clones of one
/// client are safe.
#[derive(Debug, Clone)]
pub struct HttpClient {
    url_base: String,
    client: Client,
    credentials: Option<Credentials>,
}

impl HttpClient {
    /// Returns the URL prefix requests are issued against.
    #[must_use]
    pub fn url_base(&self) -> &str {
        &self.url_base
    }

    /// Issues a GET against a gateway endpoint and parses the JSON body.
    ///
    /// `path_and_query` is the firmware endpoint, e.g. `heaterlist.json`
    /// or `data.json?heater=0`.
    ///
    /// # Errors
    ///
    /// - [`Error::Authentication`] on HTTP 401/403
    /// - [`Error::Communication`] on transport failure, timeout, or any
    ///   other non-success status
    /// - [`Error::UnexpectedResponse`] if the body is not parseable JSON,
    ///   even leniently
    pub(crate) async fn get_json(&self, path_and_query: &str) -> Result<Value, Error> {
        let url = format!("{}{path_and_query}", self.url_base);

        tracing::debug!(
            url = %url,
            auth = if self.credentials.is_some() { "REDACTED" } else { "none" },
            "sending gateway request"
        );

        let mut request = self.client.get(&url);
        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Communication(CommunicationError::Http(e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication(AuthenticationError::Rejected {
                status: status.as_u16(),
            }));
        }
        if !status.is_success() {
            return Err(Error::Communication(CommunicationError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            }));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Communication(CommunicationError::Http(e)))?;

        tracing::debug!(url = %url, body = %body, "received gateway response");

        Ok(parse_lenient(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = HttpConfig::new("192.168.0.10");
        assert_eq!(config.host(), "192.168.0.10");
        assert_eq!(config.port(), 80);
        assert!(config.credentials().is_none());
        assert_eq!(config.timeout(), Duration::from_secs(20));
    }

    #[test]
    fn url_base_without_credentials() {
        let config = HttpConfig::new("192.168.0.10");
        assert_eq!(config.url_base(), "http://192.168.0.10/");
    }

    #[test]
    fn url_base_with_credentials_uses_protected_path() {
        let config = HttpConfig::new("192.168.0.10").with_credentials("admin", "secret");
        assert_eq!(config.url_base(), "http://192.168.0.10/protect/");
    }

    #[test]
    fn url_base_with_custom_port() {
        let config = HttpConfig::new("192.168.0.10").with_port(8080);
        assert_eq!(config.url_base(), "http://192.168.0.10:8080/");
    }

    #[test]
    fn into_client_preserves_base() {
        let client = HttpConfig::new("192.168.0.10")
            .with_credentials("admin", "secret")
            .into_client()
            .unwrap();
        assert_eq!(client.url_base(), "http://192.168.0.10/protect/");
        assert!(client.credentials.is_some());
    }
}
