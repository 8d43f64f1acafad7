use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

use super::errors::WebDriverError;
use crate::domain::models::Locator;

/// Key under which W3C WebDriver returns and accepts element references
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecc";

/// Envelope every WebDriver response is wrapped in
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
struct ErrorValue {
    error: String,
    #[serde(default)]
    message: String,
}

/// Minimal W3C WebDriver HTTP client
///
/// Holds at most one session. Commands other than session creation fail
/// with [`WebDriverError::NoSession`] until a session exists.
pub struct WebDriverClient {
    /// Reusable HTTP client with connection pooling
    http_client: ReqwestClient,

    /// WebDriver endpoint, without trailing slash
    base_url: String,

    session_id: RwLock<Option<String>>,
}

impl WebDriverClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, WebDriverError> {
        let http_client = ReqwestClient::builder()
            .timeout(request_timeout)
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_id: RwLock::new(None),
        })
    }

    pub async fn session_id(&self) -> Option<String> {
        self.session_id.read().await.clone()
    }

    /// Send one command and unwrap the `value` of its response
    async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, WebDriverError> {
        let url = format!("{}{}", self.base_url, path);
        trace!(%method, %url, "webdriver command");

        let mut request = self.http_client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let envelope: Envelope = serde_json::from_slice(&bytes).map_err(|_| {
            WebDriverError::UnexpectedResponse(format!(
                "{status}: {}",
                String::from_utf8_lossy(&bytes)
            ))
        })?;

        if status.is_success() {
            return Ok(envelope.value);
        }

        let error: ErrorValue = serde_json::from_value(envelope.value)?;
        Err(WebDriverError::Command {
            status: status.as_u16(),
            error: error.error,
            message: error.message,
        })
    }

    async fn session_command(
        &self,
        method: Method,
        suffix: &str,
        body: Option<Value>,
    ) -> Result<Value, WebDriverError> {
        let session_id = self.session_id().await.ok_or(WebDriverError::NoSession)?;
        self.command(method, &format!("/session/{session_id}{suffix}"), body)
            .await
    }

    /// Create a session with the given `alwaysMatch` capabilities
    #[instrument(skip_all)]
    pub async fn new_session(&self, capabilities: Value) -> Result<String, WebDriverError> {
        let value = self
            .command(
                Method::POST,
                "/session",
                Some(json!({ "capabilities": { "alwaysMatch": capabilities } })),
            )
            .await?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| WebDriverError::UnexpectedResponse(value.to_string()))?
            .to_string();

        debug!(%session_id, "webdriver session created");
        *self.session_id.write().await = Some(session_id.clone());
        Ok(session_id)
    }

    /// Delete the current session, if any
    pub async fn delete_session(&self) -> Result<(), WebDriverError> {
        let Some(session_id) = self.session_id.write().await.take() else {
            return Ok(());
        };
        self.command(Method::DELETE, &format!("/session/{session_id}"), None)
            .await?;
        debug!(%session_id, "webdriver session deleted");
        Ok(())
    }

    pub async fn navigate(&self, url: &str) -> Result<(), WebDriverError> {
        self.session_command(Method::POST, "/url", Some(json!({ "url": url })))
            .await?;
        Ok(())
    }

    /// All elements matching `locator`, in document order
    pub async fn find_elements(&self, locator: &Locator) -> Result<Vec<String>, WebDriverError> {
        let value = self
            .session_command(
                Method::POST,
                "/elements",
                Some(json!({ "using": locator.using.as_wire(), "value": locator.value })),
            )
            .await?;

        let elements = value
            .as_array()
            .ok_or_else(|| WebDriverError::UnexpectedResponse(value.to_string()))?;

        elements
            .iter()
            .map(|element| {
                element
                    .get(ELEMENT_KEY)
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| WebDriverError::UnexpectedResponse(element.to_string()))
            })
            .collect()
    }

    /// First element matching `locator`
    pub async fn find_first(&self, locator: &Locator) -> Result<Option<String>, WebDriverError> {
        Ok(self.find_elements(locator).await?.into_iter().next())
    }

    pub async fn element_text(&self, element: &str) -> Result<String, WebDriverError> {
        let value = self
            .session_command(Method::GET, &format!("/element/{element}/text"), None)
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// DOM property of an element; `None` when the property is null
    pub async fn element_property(
        &self,
        element: &str,
        name: &str,
    ) -> Result<Option<String>, WebDriverError> {
        let value = self
            .session_command(
                Method::GET,
                &format!("/element/{element}/property/{name}"),
                None,
            )
            .await?;
        Ok(match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }

    pub async fn element_displayed(&self, element: &str) -> Result<bool, WebDriverError> {
        let value = self
            .session_command(Method::GET, &format!("/element/{element}/displayed"), None)
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    pub async fn element_clear(&self, element: &str) -> Result<(), WebDriverError> {
        self.session_command(
            Method::POST,
            &format!("/element/{element}/clear"),
            Some(json!({})),
        )
        .await?;
        Ok(())
    }

    pub async fn element_send_keys(&self, element: &str, text: &str) -> Result<(), WebDriverError> {
        self.session_command(
            Method::POST,
            &format!("/element/{element}/value"),
            Some(json!({ "text": text })),
        )
        .await?;
        Ok(())
    }

    pub async fn element_click(&self, element: &str) -> Result<(), WebDriverError> {
        self.session_command(
            Method::POST,
            &format!("/element/{element}/click"),
            Some(json!({})),
        )
        .await?;
        Ok(())
    }

    /// Run a synchronous script in the page and return its result
    pub async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, WebDriverError> {
        self.session_command(
            Method::POST,
            "/execute/sync",
            Some(json!({ "script": script, "args": args })),
        )
        .await
    }
}

/// Script argument referring to an element
pub fn element_arg(element: &str) -> Value {
    json!({ ELEMENT_KEY: element })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = WebDriverClient::new("http://localhost:4444/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "http://localhost:4444");
    }

    #[test]
    fn test_element_arg_shape() {
        assert_eq!(element_arg("abc")[ELEMENT_KEY], "abc");
    }

    #[tokio::test]
    async fn test_commands_require_session() {
        let client = WebDriverClient::new("http://localhost:4444", Duration::from_secs(5)).unwrap();
        assert!(matches!(
            client.navigate("https://example.com").await,
            Err(WebDriverError::NoSession)
        ));
        assert!(client.delete_session().await.is_ok());
    }
}
