use crate::context::{ParamVec, RequestContext};
use crate::errors::{extract_error_info, Code};
use crate::handlers::{HandlerTarget, Method, Outcome, ReturnShape};
use crate::responder::Responder;
use axum::body::Bytes;
use axum::extract::rejection::RawPathParamsRejection;
use axum::extract::{FromRequestParts, RawPathParams, Request};
use axum::response::Response;
use http::request::Parts;
use http::StatusCode;
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

/// Message placed in every success envelope.
pub const SUCCESS_MESSAGE: &str = "success";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("handler name is empty")]
    EmptyMethodName,
    #[error("handler {method:?} not found on {target_type}")]
    HandlerNotFound {
        method: String,
        target_type: &'static str,
    },
}

/// A handler method resolved once at startup and shared by every request on
/// its route.
pub struct BoundHandler {
    handler: String,
    target_type: &'static str,
    method: Method,
    responder: Arc<dyn Responder>,
}

/// Resolve `handler` on `target` and pair it with the responder.
///
/// The returned [`BoundHandler`] never looks the method up again.
pub fn bind(
    target: &Arc<dyn HandlerTarget>,
    handler: &str,
    responder: Arc<dyn Responder>,
) -> Result<BoundHandler, BindError> {
    if handler.is_empty() {
        return Err(BindError::EmptyMethodName);
    }

    let target_type = target.target_type();
    let method = Arc::clone(target)
        .method(handler)
        .ok_or_else(|| BindError::HandlerNotFound {
            method: handler.to_string(),
            target_type,
        })?;

    debug!(handler, target_type, shape = %method.shape(), "bound handler");

    Ok(BoundHandler {
        handler: handler.to_string(),
        target_type,
        method,
        responder,
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

impl BoundHandler {
    #[must_use]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    #[must_use]
    pub fn target_type(&self) -> &'static str {
        self.target_type
    }

    #[must_use]
    pub fn shape(&self) -> ReturnShape {
        self.method.shape()
    }

    /// Invoke the handler and let the responder write whatever it produced.
    ///
    /// A panicking handler is answered as an internal error.
    pub fn call(&self, ctx: &mut RequestContext) {
        let outcome = match catch_unwind(AssertUnwindSafe(|| self.method.invoke(ctx))) {
            Ok(outcome) => outcome,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(
                    request_id = %ctx.request_id(),
                    handler = %self.handler,
                    panic = message,
                    "handler panicked"
                );
                Outcome::Failed(anyhow::anyhow!(
                    "handler {} panicked: {message}",
                    self.handler
                ))
            }
        };

        match outcome {
            Outcome::Done => {}
            Outcome::Failed(err) => {
                let info = extract_error_info(&err);
                self.responder
                    .error(ctx, info.status, &info.code, &info.message, &err);
            }
            Outcome::Data(payload) => {
                self.responder
                    .success(ctx, StatusCode::OK, &Code::OK, SUCCESS_MESSAGE, payload);
            }
        }
    }

    /// Serve one request: collect path parameters and up to `body_limit`
    /// bytes of body, then [`call`](Self::call) the handler.
    ///
    /// Undecodable path parameters and unreadable bodies are answered
    /// `400 BAD_REQUEST` without running the handler.
    pub async fn serve(&self, request: Request, body_limit: usize) -> Response {
        let (mut parts, body) = request.into_parts();
        let path_params: ParamVec = match RawPathParams::from_request_parts(&mut parts, &()).await
        {
            Ok(params) => params
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            // Only happens when served outside a router.
            Err(RawPathParamsRejection::MissingPathParams(_)) => ParamVec::new(),
            Err(rejection) => {
                let err = anyhow::Error::new(rejection).context("decoding path parameters");
                return self.reject(parts, "invalid path parameters", &err);
            }
        };

        match axum::body::to_bytes(body, body_limit).await {
            Ok(bytes) => {
                let mut ctx = RequestContext::new(parts, path_params, bytes);
                self.call(&mut ctx);
                ctx.into_response()
            }
            Err(err) => {
                let err = anyhow::Error::new(err).context("reading request body");
                self.reject(parts, "invalid request body", &err)
            }
        }
    }

    fn reject(&self, parts: Parts, message: &str, err: &anyhow::Error) -> Response {
        let mut ctx = RequestContext::new(parts, ParamVec::new(), Bytes::new());
        self.responder.error(
            &mut ctx,
            StatusCode::BAD_REQUEST,
            &Code::BAD_REQUEST,
            message,
            err,
        );
        ctx.into_response()
    }
}

impl fmt::Debug for BoundHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundHandler")
            .field("handler", &self.handler)
            .field("target_type", &self.target_type)
            .field("shape", &self.method.shape())
            .finish_non_exhaustive()
    }
}
