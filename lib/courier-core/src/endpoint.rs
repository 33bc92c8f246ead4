//! Logical requests.
//!
//! An [`Endpoint`] describes a call relative to a base URL. It becomes a
//! [`Request`] through [`BuildRequest`], which resolves the path against the
//! base URL and applies [`RequestOptions`].
//!
//! # Example
//!
//! ```
//! use courier_core::{BuildRequest, Endpoint, RequestOptions};
//!
//! let base = "https://api.example.com/v1".parse().unwrap();
//! let request = Endpoint::get("/users/42")
//!     .query("fields", "name")
//!     .build_request(&base, &RequestOptions::default())
//!     .unwrap();
//! assert_eq!(request.url().as_str(), "https://api.example.com/v1/users/42?fields=name");
//! ```

use std::collections::HashMap;

use bytes::Bytes;
use url::Url;

use derive_more::Display;

use crate::request::{find_header, insert_header};
use crate::{BuildError, Method, Request, RequestOptions};

/// Content types set by the [`Endpoint`] body builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ContentType {
    /// `application/json`
    #[display("application/json")]
    Json,
    /// `application/x-www-form-urlencoded`
    #[display("application/x-www-form-urlencoded")]
    FormUrlEncoded,
    /// `text/plain`
    #[display("text/plain")]
    PlainText,
    /// `application/octet-stream`
    #[display("application/octet-stream")]
    OctetStream,
}

impl ContentType {
    /// MIME type string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::PlainText => "text/plain",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

/// The request-builder contract: turn a logical request into a ready [`Request`].
pub trait BuildRequest {
    /// Build against `base_url` with the given options.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be resolved or the body cannot be
    /// serialized.
    fn build_request(&self, base_url: &Url, options: &RequestOptions)
    -> Result<Request, BuildError>;
}

/// A logical HTTP request, relative to a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HashMap<String, String>,
    body: Option<Bytes>,
}

impl Endpoint {
    /// Creates an endpoint.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// `GET path`
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// `POST path`
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// `PUT path`
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// `PATCH path`
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    /// `DELETE path`
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Path relative to the base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters, in insertion order.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name, ignoring ASCII case.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Body bytes.
    #[must_use]
    pub const fn body_bytes(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Sets a header, replacing any value set under the same name in any case.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert_header(&mut self.headers, name.into(), value.into());
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Appends every field of `params` as query parameters.
    ///
    /// Uses `serde_html_form`, so `Vec<T>` fields become repeated parameters.
    pub fn query_struct<T: serde::Serialize>(mut self, params: &T) -> Result<Self, BuildError> {
        let encoded = serde_html_form::to_string(params)?;
        self.query.extend(
            url::form_urlencoded::parse(encoded.as_bytes())
                .map(|(name, value)| (name.into_owned(), value.into_owned())),
        );
        Ok(self)
    }

    /// Sets a raw body with its content type.
    #[must_use]
    pub fn body(mut self, content_type: ContentType, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self.header("Content-Type", content_type.as_str())
    }

    /// Sets a JSON body.
    pub fn json<T: serde::Serialize>(self, value: &T) -> Result<Self, BuildError> {
        let body = serde_json::to_vec(value)?;
        Ok(self.body(ContentType::Json, body))
    }

    /// Sets a form URL-encoded body.
    pub fn form<T: serde::Serialize>(self, value: &T) -> Result<Self, BuildError> {
        let body = serde_html_form::to_string(value)?;
        Ok(self.body(ContentType::FormUrlEncoded, body))
    }
}

impl BuildRequest for Endpoint {
    fn build_request(
        &self,
        base_url: &Url,
        options: &RequestOptions,
    ) -> Result<Request, BuildError> {
        let url = resolve(base_url, &self.path)?;

        // Explicit headers override the ones rendered from the options
        let mut builder = Request::builder(self.method, url)
            .options(*options)
            .headers(self.headers.clone());
        for (name, value) in &self.query {
            builder = builder.query(name, value);
        }
        if let Some(body) = &self.body {
            builder = builder.body(body.clone());
        }

        Ok(builder.build())
    }
}

/// Join `path` under `base`, treating the base as a directory.
///
/// The result must stay under the base: same scheme, host and port, and a
/// path inside the base directory.
fn resolve(base: &Url, path: &str) -> Result<Url, BuildError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let directory = format!("{}/", base.path());
        base.set_path(&directory);
    }
    let url = base.join(path.trim_start_matches('/'))?;

    let same_origin = url.scheme() == base.scheme()
        && url.host_str() == base.host_str()
        && url.port_or_known_default() == base.port_or_known_default();
    if !same_origin || !url.path().starts_with(base.path()) {
        return Err(BuildError::OutsideBase(url.to_string()));
    }

    Ok(url)
}
