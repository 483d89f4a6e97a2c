use std::sync::Arc;

use axum::{body::Body, extract::Request};
use http::{request::Parts, Extensions, Method, Uri};

use assent_pim::Request as AuthorizationRequest;
use assent_slo::{errors, Result};

pub(crate) const PARSE_FAILURE: &str = "Can't parse input json";

/// One inbound request as it travels through a middleware chain.
///
/// A scope is created when the chain starts, is moved from stage to stage,
/// and is dropped once the response exists. Nothing in it is visible to any
/// other request.
#[derive(Debug)]
pub struct Scope {
    parts: Parts,
    body: Body,
    context: Context,
}

impl Scope {
    pub fn new(request: Request) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            parts,
            body,
            context: Context::default(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// Takes the request body, leaving an empty one behind.
    pub fn take_body(&mut self) -> Body {
        std::mem::take(&mut self.body)
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }
}

/// Request-scoped values handed from middleware to handlers, keyed by type.
#[derive(Debug, Default)]
pub struct Context {
    values: Extensions,
}

impl Context {
    /// Stores `value`, returning the previous value of the same type.
    pub fn insert<T: Clone + Send + Sync + 'static>(
        &mut self,
        value: T,
    ) -> Option<T> {
        self.values.insert(value)
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.values.get::<T>()
    }
}

/// The decoded access request of this scope. Fails with `400` when the body
/// was never parsed.
pub fn authorization_request(scope: &Scope) -> Result<Arc<AuthorizationRequest>> {
    scope
        .context()
        .get::<Arc<AuthorizationRequest>>()
        .cloned()
        .ok_or_else(|| errors::bad_request(PARSE_FAILURE))
}
