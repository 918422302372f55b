//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder};
use url::Url;

use crate::api::{AssistantsApi, FilesApi, MessagesApi, RunsApi, ThreadsApi};
use crate::error::{Error, ErrorResponse, Result};

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// API root for OpenAI.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1/";

/// Azure OpenAI API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2024-05-01-preview";

const ASSISTANTS_BETA: &str = "assistants=v2";

/// Assistants API client.
///
/// # Example
///
/// ```no_run
/// use gptman_client::GptmanClient;
///
/// # async fn example() -> gptman_client::Result<()> {
/// let client = GptmanClient::builder()
///     .azure("https://example.openai.azure.com", "secret")
///     .build()?;
///
/// let assistant = client.assistants().retrieve("asst_abc123").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GptmanClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for GptmanClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GptmanClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("api_version", &self.inner.api_version)
            .finish_non_exhaustive()
    }
}

pub(crate) struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    /// Sent as `api-version` on every request (Azure only).
    api_version: Option<String>,
}

impl GptmanClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the assistants API.
    pub fn assistants(&self) -> AssistantsApi {
        AssistantsApi::new(self.clone())
    }

    /// Access the threads API.
    pub fn threads(&self) -> ThreadsApi {
        ThreadsApi::new(self.clone())
    }

    /// Access the messages API.
    pub fn messages(&self) -> MessagesApi {
        MessagesApi::new(self.clone())
    }

    /// Access the runs API.
    pub fn runs(&self) -> RunsApi {
        RunsApi::new(self.clone())
    }

    /// Access the files API.
    pub fn files(&self) -> FilesApi {
        FilesApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner.base_url.join(path).map_err(Error::from)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        let mut request = self
            .inner
            .http
            .request(method, url)
            .timeout(self.inner.timeout);
        if let Some(version) = &self.inner.api_version {
            request = request.query(&[("api-version", version)]);
        }
        Ok(request)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path)?.send().await?;
        self.handle_response(response).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let response = self.request(Method::GET, path)?.query(query).send().await?;
        self.handle_response(response).await
    }

    /// Make a POST request.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let response = self.request(Method::POST, path)?.json(body).send().await?;
        self.handle_response(response).await
    }

    /// Make a multipart POST request.
    pub(crate) async fn post_multipart<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let response = self
            .request(Method::POST, path)?
            .multipart(form)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make a DELETE request.
    pub(crate) async fn delete<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::DELETE, path)?.send().await?;
        self.handle_response(response).await
    }

    /// Handle a response, extracting the body or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract an error from a failed response.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();

        match response.json::<ErrorResponse>().await {
            Ok(ErrorResponse { error }) => {
                tracing::debug!(
                    status,
                    code = %error.code(),
                    message = %error.message,
                    "API error"
                );
                if status == 404 {
                    Error::NotFound(error.message)
                } else if status == 401 {
                    Error::Auth(error.message)
                } else {
                    Error::Api {
                        status,
                        code: error.code(),
                        message: error.message,
                    }
                }
            }
            Err(_) => Error::Api {
                status,
                code: "unknown".to_string(),
                message: format!("HTTP {}", status),
            },
        }
    }
}

/// Which service the client talks to.
#[derive(Debug, Clone)]
enum Provider {
    OpenAi { api_key: String },
    Azure { endpoint: String, api_key: String },
}

/// Builder for creating a GptmanClient.
#[derive(Debug)]
pub struct ClientBuilder {
    provider: Option<Provider>,
    base_url: Option<String>,
    api_version: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            provider: None,
            base_url: None,
            api_version: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Talk to OpenAI with a bearer API key.
    pub fn openai(mut self, api_key: impl Into<String>) -> Self {
        self.provider = Some(Provider::OpenAi {
            api_key: api_key.into(),
        });
        self
    }

    /// Talk to an Azure OpenAI resource.
    pub fn azure(mut self, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.provider = Some(Provider::Azure {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        });
        self
    }

    /// Set the Azure API version.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Override the API root.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<GptmanClient> {
        let provider = self
            .provider
            .ok_or_else(|| Error::Config("an OpenAI or Azure API key is required".to_string()))?;

        let (base_url, api_version) = match &provider {
            Provider::OpenAi { .. } => (
                self.base_url
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
                None,
            ),
            Provider::Azure { endpoint, .. } => (
                self.base_url
                    .unwrap_or_else(|| format!("{}/openai/", endpoint.trim_end_matches('/'))),
                Some(
                    self.api_version
                        .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
                ),
            ),
        };

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("openai-beta"),
            HeaderValue::from_static(ASSISTANTS_BETA),
        );
        match &provider {
            Provider::OpenAi { api_key } => {
                let value = HeaderValue::from_str(&format!("Bearer {}", api_key))
                    .map_err(|_| Error::Config("Invalid API key".to_string()))?;
                headers.insert(AUTHORIZATION, value);
            }
            Provider::Azure { api_key, .. } => {
                let value = HeaderValue::from_str(api_key)
                    .map_err(|_| Error::Config("Invalid API key".to_string()))?;
                headers.insert(HeaderName::from_static("api-key"), value);
            }
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("gptman/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        Ok(GptmanClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
                api_version,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
