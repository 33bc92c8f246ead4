//! Request-transforming middleware.
//!
//! A [`Middleware`] is an ordered chain of `R -> R` steps applied to a logical
//! request before it is built. Steps run left to right; the empty chain is the
//! identity.
//!
//! ```
//! use courier_core::{Endpoint, Middleware};
//!
//! let chain = Middleware::identity()
//!     .then(|endpoint: Endpoint| endpoint.header("X-Client", "courier"))
//!     .then(|endpoint: Endpoint| endpoint.query("v", "2"));
//!
//! let endpoint = chain.apply(Endpoint::get("items"));
//! assert_eq!(endpoint.header_value("X-Client"), Some("courier"));
//! assert_eq!(endpoint.query_pairs().len(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

type Step<R> = Arc<dyn Fn(R) -> R + Send + Sync>;

/// Ordered chain of request transformations.
pub struct Middleware<R> {
    steps: Vec<Step<R>>,
}

impl<R> Middleware<R> {
    /// The empty chain.
    #[must_use]
    pub fn identity() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends a step that runs after every existing one.
    #[must_use]
    pub fn then<F>(mut self, step: F) -> Self
    where
        F: Fn(R) -> R + Send + Sync + 'static,
    {
        self.steps.push(Arc::new(step));
        self
    }

    /// Appends every step of `other`, keeping their order.
    #[must_use]
    pub fn chain(mut self, other: &Self) -> Self {
        self.steps.extend(other.steps.iter().cloned());
        self
    }

    /// Runs the chain.
    pub fn apply(&self, request: R) -> R {
        self.steps.iter().fold(request, |request, step| step(request))
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` for the identity chain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<R> Default for Middleware<R> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<R> Clone for Middleware<R> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
        }
    }
}

impl<R> fmt::Debug for Middleware<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware")
            .field("steps", &self.steps.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_returns_input() {
        let chain = Middleware::<Vec<u8>>::identity();
        assert!(chain.is_empty());
        assert_eq!(chain.apply(vec![1, 2]), vec![1, 2]);
    }

    #[test]
    fn steps_run_left_to_right() {
        let chain = Middleware::identity()
            .then(|mut trace: Vec<&str>| {
                trace.push("first");
                trace
            })
            .then(|mut trace: Vec<&str>| {
                trace.push("second");
                trace
            });

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.apply(Vec::new()), vec!["first", "second"]);
    }

    #[test]
    fn chain_appends_other_steps() {
        let double = Middleware::identity().then(|n: i32| n * 2);
        let add_one = Middleware::identity().then(|n: i32| n + 1);

        assert_eq!(double.clone().chain(&add_one).apply(5), 11);
        assert_eq!(add_one.chain(&double).apply(5), 12);
    }
}
