//! Fully-built HTTP requests.
//!
//! A [`Request`] is ready to hand to a [`Transport`](crate::Transport): the URL is
//! absolute, headers are final, and the body is already serialized.
//!
//! # Example
//!
//! ```
//! use courier_core::{Method, Request};
//!
//! let request = Request::builder(Method::Get, "https://api.example.com/users".parse().unwrap())
//!     .header("Accept", "application/json")
//!     .query("page", "1")
//!     .build();
//! assert_eq!(request.url().as_str(), "https://api.example.com/users?page=1");
//! ```

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use url::Url;

use crate::{Method, RequestId};

/// Default timeout applied by [`RequestOptions::default`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// How intermediaries should treat cached responses for this request.
///
/// The pipeline itself never caches; the policy is only rendered as a
/// `Cache-Control` request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CachePolicy {
    /// Leave caching to the protocol defaults (no header).
    #[default]
    UseProtocol,
    /// Ask for a fresh response (`Cache-Control: no-cache`).
    ReloadIgnoringCache,
    /// Forbid storing the response (`Cache-Control: no-store`).
    NoStore,
}

impl CachePolicy {
    /// The `Cache-Control` value for this policy, if any.
    #[must_use]
    pub const fn cache_control(self) -> Option<&'static str> {
        match self {
            Self::UseProtocol => None,
            Self::ReloadIgnoringCache => Some("no-cache"),
            Self::NoStore => Some("no-store"),
        }
    }
}

/// Per-call options used when building a request from a logical description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    /// Cache policy.
    pub cache_policy: CachePolicy,
    /// Deadline for the whole exchange, enforced by the transport.
    pub timeout: Duration,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            cache_policy: CachePolicy::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RequestOptions {
    /// Override the cache policy.
    #[must_use]
    pub const fn with_cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.cache_policy = cache_policy;
        self
    }

    /// Override the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// An HTTP request ready to be sent.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    body: Option<Bytes>,
    cache_policy: CachePolicy,
    timeout: Option<Duration>,
    extensions: http::Extensions,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Cache policy.
    #[must_use]
    pub const fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }

    /// Timeout the transport should enforce, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Request extensions.
    #[must_use]
    pub const fn extensions(&self) -> &http::Extensions {
        &self.extensions
    }

    /// Mutable access to extensions.
    #[must_use]
    pub fn extensions_mut(&mut self) -> &mut http::Extensions {
        &mut self.extensions
    }

    /// The correlation id assigned at dispatch, once dispatched.
    #[must_use]
    pub fn request_id(&self) -> Option<RequestId> {
        self.extensions.get::<RequestId>().copied()
    }

    /// Consume into (method, url, headers, body, extensions).
    #[must_use]
    pub fn into_parts(
        self,
    ) -> (
        Method,
        Url,
        HashMap<String, String>,
        Option<Bytes>,
        http::Extensions,
    ) {
        (
            self.method,
            self.url,
            self.headers,
            self.body,
            self.extensions,
        )
    }
}

/// Builder for [`Request`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            request: Request {
                method,
                url,
                headers: HashMap::new(),
                body: None,
                cache_policy: CachePolicy::default(),
                timeout: None,
                extensions: http::Extensions::new(),
            },
        }
    }

    /// Sets a header, replacing any value set under the same name in any case.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert_header(&mut self.request.headers, name.into(), value.into());
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        for (name, value) in headers {
            insert_header(&mut self.request.headers, name, value);
        }
        self
    }

    /// Appends a query parameter to the URL.
    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.request.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.request.body = Some(body.into());
        self
    }

    /// Sets the cache policy and renders its `Cache-Control` header.
    ///
    /// [`CachePolicy::UseProtocol`] adds nothing and leaves an existing
    /// `Cache-Control` header in place.
    #[must_use]
    pub fn cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.request.cache_policy = cache_policy;
        if let Some(value) = cache_policy.cache_control() {
            insert_header(
                &mut self.request.headers,
                "Cache-Control".to_string(),
                value.to_string(),
            );
        }
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = Some(timeout);
        self
    }

    /// Applies both fields of [`RequestOptions`].
    #[must_use]
    pub fn options(self, options: RequestOptions) -> Self {
        self.cache_policy(options.cache_policy)
            .timeout(options.timeout)
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        self.request
    }
}

/// Header names are case-insensitive: a new value replaces every entry whose
/// name matches ignoring ASCII case.
pub(crate) fn insert_header(headers: &mut HashMap<String, String>, name: String, value: String) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
    headers.insert(name, value);
}

pub(crate) fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
