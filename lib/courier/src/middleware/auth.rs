//! Authentication steps for a [`Middleware<Endpoint>`](courier_core::Middleware) chain.
//!
//! ```
//! use courier::middleware::{basic_auth, bearer_auth};
//! use courier::{Endpoint, Middleware};
//!
//! let chain = Middleware::identity().then(bearer_auth("my-token"));
//! let endpoint = chain.apply(Endpoint::get("me"));
//! assert_eq!(endpoint.header_value("Authorization"), Some("Bearer my-token"));
//!
//! let chain = Middleware::identity().then(basic_auth("user", "pass"));
//! let endpoint = chain.apply(Endpoint::get("me"));
//! assert_eq!(endpoint.header_value("Authorization"), Some("Basic dXNlcjpwYXNz"));
//! ```

use std::sync::Arc;

use base64::Engine;
use courier_core::Endpoint;

/// Adds `Authorization: Bearer <token>`.
pub fn bearer_auth(
    token: impl Into<String>,
) -> impl Fn(Endpoint) -> Endpoint + Send + Sync + 'static {
    authorization(format!("Bearer {}", token.into()))
}

/// Adds `Authorization: Basic <base64(username:password)>`.
pub fn basic_auth(
    username: impl AsRef<str>,
    password: impl AsRef<str>,
) -> impl Fn(Endpoint) -> Endpoint + Send + Sync + 'static {
    let credentials = format!("{}:{}", username.as_ref(), password.as_ref());
    let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
    authorization(format!("Basic {encoded}"))
}

fn authorization(value: String) -> impl Fn(Endpoint) -> Endpoint + Send + Sync + 'static {
    let value: Arc<str> = Arc::from(value);
    move |endpoint| endpoint.header("Authorization", &*value)
}
