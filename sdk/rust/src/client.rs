use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ClientError, Payload};

/// Client for the gateway's proxied API.
///
/// Keeps a cookie store, so the session cookie set by login or the OAuth
/// callback travels with every later call.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    gateway_url: String,
    prefix: String,
}

impl GatewayClient {
    pub fn new(gateway_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(client, gateway_url))
    }

    /// Use a preconfigured client. It should have a cookie store enabled.
    pub fn with_client(client: Client, gateway_url: &str) -> Self {
        Self {
            client,
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            prefix: "/api".to_string(),
        }
    }

    /// Change the proxy prefix (default `/api`).
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = format!("/{}", prefix.trim_matches('/'));
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.gateway_url,
            self.prefix,
            path.trim_start_matches('/')
        )
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request::<T, ()>(Method::DELETE, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, body).await
    }

    pub async fn put<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, body).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, body).await
    }

    /// Send a request and classify the response.
    ///
    /// The body is read as text first: a non-2xx status yields
    /// [`ClientError::Status`] with the JSON (or raw text) payload, a 2xx
    /// body that does not parse as `T` yields [`ClientError::Unparseable`].
    /// An empty body parses as JSON `null`.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut builder = self.client.request(method.clone(), self.url(path));
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        tracing::debug!(method = %method, path = %path, status = %status, "Gateway response");

        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                payload: Payload::from_text(text),
            });
        }

        parse_body(status, text)
    }
}

fn parse_body<T: DeserializeOwned>(status: StatusCode, text: String) -> Result<T, ClientError> {
    let source = if text.trim().is_empty() { "null" } else { text.as_str() };
    serde_json::from_str(source).map_err(|source| ClientError::Unparseable {
        status,
        body: text,
        source,
    })
}
