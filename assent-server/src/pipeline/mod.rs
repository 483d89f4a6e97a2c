//! Composable request pipeline.
//!
//! An endpoint is a [`Next`]. A [`Chain`] holds an ordered list of
//! [`Middleware`] and wraps an endpoint once, at startup: the first
//! middleware added runs outermost. Every stage returns
//! `Result<Response, FailureRecord>`, so failures travel outwards as values
//! until a stage turns them into a response.

mod scope;

use std::{fmt, future::Future, sync::Arc};

use async_trait::async_trait;
use axum::{extract::Request, response::Response};
use futures_util::future::BoxFuture;

use assent_slo::Result;

pub use scope::{authorization_request, Context, Scope};
pub(crate) use scope::PARSE_FAILURE;

type Endpoint = dyn Fn(Scope) -> BoxFuture<'static, Result<Response>> + Send + Sync;

/// The rest of a chain, as seen from one stage.
#[derive(Clone)]
pub struct Next(Arc<Endpoint>);

impl Next {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Scope) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response>> + Send + 'static,
    {
        Self(Arc::new(
            move |scope| -> BoxFuture<'static, Result<Response>> {
                Box::pin(f(scope))
            },
        ))
    }

    pub async fn run(&self, scope: Scope) -> Result<Response> {
        (self.0)(scope).await
    }

    /// Adapts the chain to an axum handler. Each call gets a fresh [`Scope`].
    pub fn into_handler(
        self,
    ) -> impl Fn(Request) -> BoxFuture<'static, Result<Response>>
           + Clone
           + Send
           + Sync
           + 'static {
        move |request: Request| -> BoxFuture<'static, Result<Response>> {
            let next = self.clone();
            Box::pin(async move { next.run(Scope::new(request)).await })
        }
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// Cross-cutting stage wrapped around an endpoint.
#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    async fn handle(&self, scope: Scope, next: Next) -> Result<Response>;
}

#[derive(Clone, Default)]
pub struct Chain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `middleware`; it runs inside every middleware added before.
    pub fn with<M: Middleware>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Wraps `endpoint` in every middleware of the chain.
    pub fn then(&self, endpoint: Next) -> Next {
        self.middlewares.iter().rev().fold(endpoint, |next, middleware| {
            let middleware = Arc::clone(middleware);
            Next::new(move |scope| {
                let middleware = Arc::clone(&middleware);
                let next = next.clone();
                async move { middleware.handle(scope, next).await }
            })
        })
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::{body::Body, response::IntoResponse};
    use http::StatusCode;

    use assent_slo::errors;

    use super::*;

    struct Record {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Middleware for Record {
        async fn handle(&self, scope: Scope, next: Next) -> Result<Response> {
            self.log.lock().unwrap().push(format!("{} in", self.name));
            let response = next.run(scope).await;
            self.log.lock().unwrap().push(format!("{} out", self.name));
            response
        }
    }

    struct Reject;

    #[async_trait]
    impl Middleware for Reject {
        async fn handle(&self, _scope: Scope, _next: Next) -> Result<Response> {
            Err(errors::bad_request("rejected"))
        }
    }

    fn scope() -> Scope {
        Scope::new(Request::builder().uri("/").body(Body::empty()).unwrap())
    }

    #[tokio::test]
    async fn runs_in_declaration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = Chain::new()
            .with(Record {
                name: "outer",
                log: Arc::clone(&log),
            })
            .with(Record {
                name: "inner",
                log: Arc::clone(&log),
            });

        let handler_log = Arc::clone(&log);
        let next = chain.then(Next::new(move |_scope| {
            let log = Arc::clone(&handler_log);
            async move {
                log.lock().unwrap().push("handler".to_owned());
                Ok(StatusCode::OK.into_response())
            }
        }));

        let response = next.run(scope()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["outer in", "inner in", "handler", "inner out", "outer out"]
        );
    }

    #[tokio::test]
    async fn failures_short_circuit() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = Chain::new()
            .with(Record {
                name: "outer",
                log: Arc::clone(&log),
            })
            .with(Reject);
        let handler_log = Arc::clone(&log);
        let next = chain.then(Next::new(move |_scope| {
            let log = Arc::clone(&handler_log);
            async move {
                log.lock().unwrap().push("handler".to_owned());
                Ok(StatusCode::OK.into_response())
            }
        }));

        let err = next.run(scope()).await.unwrap_err();
        assert_eq!(err, errors::bad_request("rejected"));
        assert_eq!(*log.lock().unwrap(), vec!["outer in", "outer out"]);
    }

    #[tokio::test]
    async fn empty_chain_is_the_endpoint() {
        let next = Chain::new().then(Next::new(|_scope| async {
            Ok(StatusCode::IM_A_TEAPOT.into_response())
        }));
        let response = next.run(scope()).await.unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }
}
