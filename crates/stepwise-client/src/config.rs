use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::ClientError;

/// Version of the remote API this client speaks.
pub const API_VERSION: &str = "0.1";

const DEFAULT_HOST: &str = "flomosa.appspot.com";
const DEFAULT_PORT: u16 = 80;
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Connection and credential settings for [`HttpTransport`](crate::HttpTransport).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
  pub host: String,
  pub port: u16,
  pub api_version: String,
  pub timeout_ms: u64,
  /// Overrides the default `Stepwise Rust Client v<version>` user agent.
  pub user_agent: Option<String>,
  pub consumer_key: String,
  pub consumer_secret: String,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      host: DEFAULT_HOST.to_string(),
      port: DEFAULT_PORT,
      api_version: API_VERSION.to_string(),
      timeout_ms: DEFAULT_TIMEOUT_MS,
      user_agent: None,
      consumer_key: String::new(),
      consumer_secret: String::new(),
    }
  }
}

impl ClientConfig {
  pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
    Self {
      consumer_key: consumer_key.into(),
      consumer_secret: consumer_secret.into(),
      ..Self::default()
    }
  }

  pub fn with_host(mut self, host: impl Into<String>, port: u16) -> Self {
    self.host = host.into();
    self.port = port;
    self
  }

  /// Base URI of the remote store. Port 443 selects https.
  pub fn base_url(&self) -> Result<Url, ClientError> {
    let uri = if self.port == 443 {
      format!("https://{}/", self.host)
    } else {
      format!("http://{}:{}/", self.host, self.port)
    };
    Ok(Url::parse(&uri)?)
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_millis(self.timeout_ms)
  }

  pub fn user_agent(&self) -> String {
    self
      .user_agent
      .clone()
      .unwrap_or_else(|| format!("Stepwise Rust Client v{}", self.api_version))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_base_url_http() {
    let config = ClientConfig::new("key", "secret").with_host("127.0.0.1", 8080);
    assert_eq!(config.base_url().unwrap().as_str(), "http://127.0.0.1:8080/");
  }

  #[test]
  fn test_base_url_https_on_443() {
    let config = ClientConfig::new("key", "secret").with_host("example.com", 443);
    assert_eq!(config.base_url().unwrap().as_str(), "https://example.com/");
  }

  #[test]
  fn test_defaults() {
    let config: ClientConfig = serde_json::from_str(r#"{ "consumer_key": "k" }"#).unwrap();
    assert_eq!(config.host, "flomosa.appspot.com");
    assert_eq!(config.port, 80);
    assert_eq!(config.consumer_key, "k");
    assert_eq!(config.user_agent(), "Stepwise Rust Client v0.1");
    assert_eq!(config.timeout(), Duration::from_secs(30));
  }
}
