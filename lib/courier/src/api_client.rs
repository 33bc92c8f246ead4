//! Client bound to one API.
//!
//! [`ApiClient`] combines an [`HttpRequestClient`] with a base URL, default
//! [`RequestOptions`] and a [`Middleware`] chain, so calls only name the
//! [`Endpoint`].

use courier_core::{
    BuildError, Decoder, Endpoint, Exchange, HttpRequestClient, JsonDecoder, Middleware,
    RequestOptions, Response, ResponseBody, Result, SuccessResponse, Transport,
};
use serde::de::DeserializeOwned;
use url::Url;

/// An [`HttpRequestClient`] bound to a base URL.
///
/// Cloning is cheap when the transport is; one transport (and its connection
/// pool) can back several `ApiClient`s.
///
/// # Example
///
/// ```
/// use courier::{ApiClient, Endpoint};
/// use courier::middleware::bearer_auth;
///
/// # #[derive(serde::Deserialize)]
/// # struct User;
/// # async fn demo() -> courier::Result<()> {
/// let github = ApiClient::new(courier::live(), "https://api.github.com")
///     .expect("valid URL")
///     .with_step(bearer_auth("ghp_token"));
///
/// let user: User = github.send_value(Endpoint::get("/user")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient<T, D = JsonDecoder> {
    client: HttpRequestClient<T, D>,
    base_url: Url,
    options: RequestOptions,
    middleware: Middleware<Endpoint>,
}

impl<T, D> ApiClient<T, D>
where
    T: Transport,
    D: Decoder,
{
    /// Bind `client` to `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn new(
        client: HttpRequestClient<T, D>,
        base_url: impl AsRef<str>,
    ) -> std::result::Result<Self, BuildError> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self::with_url(client, base_url))
    }

    /// Bind `client` to an already parsed URL.
    #[must_use]
    pub fn with_url(client: HttpRequestClient<T, D>, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            options: RequestOptions::default(),
            middleware: Middleware::identity(),
        }
    }

    /// Options applied to every call.
    #[must_use]
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Append a step to the middleware chain.
    #[must_use]
    pub fn with_step<F>(mut self, step: F) -> Self
    where
        F: Fn(Endpoint) -> Endpoint + Send + Sync + 'static,
    {
        self.middleware = self.middleware.then(step);
        self
    }

    /// Replace the middleware chain.
    #[must_use]
    pub fn with_middleware(mut self, middleware: Middleware<Endpoint>) -> Self {
        self.middleware = middleware;
        self
    }

    /// The base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Options applied to every call.
    #[must_use]
    pub const fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// The middleware chain.
    #[must_use]
    pub const fn middleware(&self) -> &Middleware<Endpoint> {
        &self.middleware
    }

    /// The underlying client.
    #[must_use]
    pub const fn inner(&self) -> &HttpRequestClient<T, D> {
        &self.client
    }

    /// Dispatch without decoding.
    pub async fn raw(&self, endpoint: Endpoint) -> Result<Exchange> {
        self.client
            .send_raw_endpoint(endpoint, &self.base_url, &self.options, &self.middleware)
            .await
    }

    /// Dispatch and decode the body as `V`.
    pub async fn send<V: ResponseBody>(&self, endpoint: Endpoint) -> Result<SuccessResponse<V>> {
        self.client
            .send_endpoint(endpoint, &self.base_url, &self.options, &self.middleware)
            .await
    }

    /// Dispatch and return only the decoded value.
    pub async fn send_value<V: ResponseBody>(&self, endpoint: Endpoint) -> Result<V> {
        self.send(endpoint).await.map(SuccessResponse::into_value)
    }

    /// Dispatch and decode as `V`, falling back to the server-error shape `E`.
    pub async fn send_union<V, E>(&self, endpoint: Endpoint) -> Result<Response<V, E>>
    where
        V: ResponseBody,
        E: DeserializeOwned,
    {
        self.client
            .send_union_endpoint(endpoint, &self.base_url, &self.options, &self.middleware)
            .await
    }
}
