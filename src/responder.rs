//! Response envelopes.
//!
//! Bound handlers never format responses themselves: success payloads and
//! translated errors are handed to a [`Responder`], which owns the wire shape.
//! [`JsonResponder`] is the default and writes:
//!
//! ```json
//! {"code": "OK", "message": "success", "data": {"id": 1}}
//! {"code": "USER_NOT_FOUND", "message": "user not found"}
//! ```
//!
//! A verbose responder adds a `detail` field with the full error chain to
//! error envelopes. Keep it off outside development.

use crate::context::RequestContext;
use crate::errors::Code;
use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

/// Writes success and error envelopes into the request context.
pub trait Responder: Send + Sync + 'static {
    fn success(
        &self,
        ctx: &mut RequestContext,
        status: StatusCode,
        code: &Code,
        message: &str,
        payload: Value,
    );

    /// `source` is the original handler error. It is meant for logging; the
    /// client sees `code` and `message`.
    fn error(
        &self,
        ctx: &mut RequestContext,
        status: StatusCode,
        code: &Code,
        message: &str,
        source: &anyhow::Error,
    );
}

#[derive(Serialize)]
struct SuccessEnvelope<'a> {
    code: &'a Code,
    message: &'a str,
    data: Value,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    code: &'a Code,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

/// JSON envelope writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResponder {
    verbose: bool,
}

impl JsonResponder {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

impl Responder for JsonResponder {
    fn success(
        &self,
        ctx: &mut RequestContext,
        status: StatusCode,
        code: &Code,
        message: &str,
        payload: Value,
    ) {
        let envelope = SuccessEnvelope {
            code,
            message,
            data: payload,
        };
        if let Err(err) = ctx.write_json(status, &envelope) {
            // Value-backed envelopes always serialize; keep the request answered anyway.
            error!(request_id = %ctx.request_id(), error = %err, "failed to encode success envelope");
            ctx.write_text(StatusCode::INTERNAL_SERVER_ERROR, "internal server error");
        }
    }

    fn error(
        &self,
        ctx: &mut RequestContext,
        status: StatusCode,
        code: &Code,
        message: &str,
        source: &anyhow::Error,
    ) {
        let detail = format!("{source:#}");
        if status.is_server_error() {
            error!(
                request_id = %ctx.request_id(),
                method = %ctx.method(),
                path = %ctx.path(),
                status = status.as_u16(),
                code = %code,
                error = %detail,
                "handler failed"
            );
        } else {
            debug!(
                request_id = %ctx.request_id(),
                method = %ctx.method(),
                path = %ctx.path(),
                status = status.as_u16(),
                code = %code,
                error = %detail,
                "handler rejected request"
            );
        }

        let envelope = ErrorEnvelope {
            code,
            message,
            detail: self.verbose.then_some(detail),
        };
        if ctx.write_json(status, &envelope).is_err() {
            ctx.write_text(StatusCode::INTERNAL_SERVER_ERROR, "internal server error");
        }
    }
}
