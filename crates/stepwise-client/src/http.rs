use hmac::{Hmac, Mac};
use reqwest::{Client, Method};
use sha2::Sha256;
use url::Url;

use async_trait::async_trait;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transport::{Transport, Verb};

type HmacSha256 = Hmac<Sha256>;

/// [`Transport`] over HTTP using reqwest, signing every request with the
/// consumer credentials.
///
/// The signature is HMAC-SHA256 (hex) over
/// `{verb}&{url}&{timestamp}&{nonce}`, keyed by the consumer secret, and is
/// sent in the `Authorization` header together with the consumer key,
/// timestamp and nonce.
pub struct HttpTransport {
  http: Client,
  config: ClientConfig,
  base: Url,
}

impl std::fmt::Debug for HttpTransport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("HttpTransport")
      .field("base", &self.base.as_str())
      .field("consumer_key", &self.config.consumer_key)
      .finish_non_exhaustive()
  }
}

impl HttpTransport {
  pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
    let base = config.base_url()?;
    let http = Client::builder()
      .timeout(config.timeout())
      .user_agent(config.user_agent())
      .build()?;

    tracing::debug!(base = %base, "created http transport");
    Ok(Self { http, config, base })
  }

  pub fn config(&self) -> &ClientConfig {
    &self.config
  }

  pub fn base_url(&self) -> &Url {
    &self.base
  }

  /// Sign a request with the consumer secret.
  pub fn sign(
    secret: &str,
    verb: Verb,
    url: &str,
    timestamp: i64,
    nonce: &str,
  ) -> Result<String, ClientError> {
    let signing_input = format!("{}&{}&{}&{}", verb, url, timestamp, nonce);
    let mut mac =
      HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| ClientError::InvalidCredentials)?;
    mac.update(signing_input.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
  }

  fn authorization(&self, verb: Verb, url: &Url) -> Result<String, ClientError> {
    let timestamp = chrono::Utc::now().timestamp();
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    let signature = Self::sign(
      &self.config.consumer_secret,
      verb,
      url.as_str(),
      timestamp,
      &nonce,
    )?;
    Ok(format!(
      "Stepwise key=\"{}\", timestamp=\"{}\", nonce=\"{}\", signature=\"{}\"",
      self.config.consumer_key, timestamp, nonce, signature
    ))
  }
}

#[async_trait]
impl Transport for HttpTransport {
  async fn request(
    &self,
    path: &str,
    verb: Verb,
    body: Option<serde_json::Value>,
  ) -> Result<Option<serde_json::Value>, ClientError> {
    let mut url = self.base.join(path)?;

    // GET parameters travel in the query string.
    let body = match (verb, body) {
      (Verb::Get, Some(serde_json::Value::Object(params))) => {
        {
          let mut query = url.query_pairs_mut();
          for (name, value) in &params {
            match value {
              serde_json::Value::String(s) => query.append_pair(name, s),
              other => query.append_pair(name, &other.to_string()),
            };
          }
        }
        None
      }
      (_, body) => body,
    };

    let authorization = self.authorization(verb, &url)?;
    let mut request = self
      .http
      .request(method(verb), url.clone())
      .header("Authorization", authorization);
    if let Some(body) = &body {
      request = request.json(body);
    }

    tracing::debug!(verb = %verb, url = %url, "sending request");
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;
    tracing::debug!(verb = %verb, url = %url, status = status.as_u16(), "received response");

    let content = if text.trim().is_empty() {
      None
    } else {
      match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(value) => Some(value),
        Err(_) => {
          return Err(ClientError::Decode {
            status: status.as_u16(),
            body: text,
          });
        }
      }
    };

    if !status.is_success() {
      return Err(api_error(status.as_u16(), content));
    }
    Ok(content)
  }
}

fn method(verb: Verb) -> Method {
  match verb {
    Verb::Get => Method::GET,
    Verb::Put => Method::PUT,
    Verb::Post => Method::POST,
    Verb::Delete => Method::DELETE,
  }
}

/// Build an API error, preferring the `code`/`message` fields of an error
/// document over the HTTP status.
fn api_error(status: u16, content: Option<serde_json::Value>) -> ClientError {
  match content {
    Some(serde_json::Value::Object(fields)) => {
      let code = fields
        .get("code")
        .and_then(|c| c.as_u64())
        .and_then(|c| u16::try_from(c).ok())
        .unwrap_or(status);
      let message = match fields.get("message") {
        Some(serde_json::Value::String(m)) => m.clone(),
        Some(other) => other.to_string(),
        None => serde_json::Value::Object(fields).to_string(),
      };
      ClientError::api(code, message)
    }
    Some(serde_json::Value::String(message)) => ClientError::api(status, message),
    Some(other) => ClientError::api(status, other.to_string()),
    None => ClientError::api(status, "empty response"),
  }
}
