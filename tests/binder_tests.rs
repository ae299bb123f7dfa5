#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Tests for handler binding outside of a router
//!
//! # Test Coverage
//!
//! - Typed handler sets and hand-written dynamic targets
//! - Lookup failures and their messages
//! - Shape-specific dispatch through `BoundHandler::call`
//! - Error translation for wrapped and plain errors

mod common;

use axum::body::Bytes;
use common::fixtures::{ok_envelope, Users};
use http::StatusCode;
use routebind::handlers::SetTarget;
use routebind::{
    bind, extract_error_info, ApiError, BindError, HandlerRegistry, HandlerTarget, JsonResponder,
    Method, RequestContext, Responder, ReturnShape,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn responder() -> Arc<dyn Responder> {
    Arc::new(JsonResponder::default())
}

fn ctx(method: &str, uri: &str) -> RequestContext {
    RequestContext::from_request(
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Bytes::new())
            .unwrap(),
    )
}

fn body(ctx: &RequestContext) -> Value {
    serde_json::from_slice(ctx.response_body()).unwrap()
}

/// Target whose methods are decided at runtime.
struct Counter {
    hits: AtomicUsize,
}

impl HandlerTarget for Counter {
    fn target_type(&self) -> &'static str {
        "Counter"
    }

    fn method(self: Arc<Self>, name: &str) -> Option<Method> {
        match name {
            "Hit" => Some(Method::returning(move |_ctx: &mut RequestContext| {
                let hits = self.hits.fetch_add(1, Ordering::SeqCst) + 1;
                Ok::<_, ApiError>(json!({ "hits": hits }))
            })),
            "Reset" => Some(Method::fallible(move |_ctx: &mut RequestContext| {
                if self.hits.swap(0, Ordering::SeqCst) == 0 {
                    return Err(ApiError::new("ALREADY_ZERO", "nothing to reset").with_status(409));
                }
                Ok(())
            })),
            "Ping" => Some(Method::unit(|_ctx: &mut RequestContext| {})),
            _ => None,
        }
    }
}

#[test]
fn test_registry_targets_bind_by_group() {
    let registry = HandlerRegistry::new()
        .with_set("users", Users)
        .with_target("counter", Counter { hits: AtomicUsize::new(0) });

    let users = registry.get("users").unwrap();
    let bound = bind(users, "GetUser", responder()).unwrap();
    assert_eq!(bound.handler(), "GetUser");
    assert_eq!(bound.shape(), ReturnShape::ValueAndError);

    let counter = registry.get("counter").unwrap();
    assert_eq!(bind(counter, "Reset", responder()).unwrap().shape(), ReturnShape::Error);
}

#[test]
fn test_lookup_is_exact() {
    let target: Arc<dyn HandlerTarget> = Arc::new(SetTarget::new(Users));
    for name in ["getUser", "GETUSER", "get_user", "GetUser "] {
        let err = bind(&target, name, responder()).unwrap_err();
        assert!(
            matches!(&err, BindError::HandlerNotFound { method, .. } if method == name),
            "{name}"
        );
    }
    assert!(matches!(
        bind(&target, "", responder()).unwrap_err(),
        BindError::EmptyMethodName
    ));
}

#[test]
fn test_dynamic_target_state_is_shared_across_calls() {
    let target: Arc<dyn HandlerTarget> = Arc::new(Counter {
        hits: AtomicUsize::new(0),
    });
    let hit = bind(&target, "Hit", responder()).unwrap();
    let reset = bind(&target, "Reset", responder()).unwrap();

    for expected in 1..=3 {
        let mut ctx = ctx("POST", "/hit");
        hit.call(&mut ctx);
        assert_eq!(body(&ctx), ok_envelope(json!({ "hits": expected })));
    }

    let mut ctx1 = ctx("POST", "/reset");
    reset.call(&mut ctx1);
    assert_eq!(ctx1.response_status(), StatusCode::OK);
    assert!(!ctx1.response_written());

    let mut ctx2 = ctx("POST", "/reset");
    reset.call(&mut ctx2);
    assert_eq!(ctx2.response_status(), StatusCode::CONFLICT);
    assert_eq!(
        body(&ctx2),
        json!({"code": "ALREADY_ZERO", "message": "nothing to reset"})
    );
}

#[test]
fn test_unit_handler_that_writes_nothing_gets_no_response() {
    let target: Arc<dyn HandlerTarget> = Arc::new(Counter {
        hits: AtomicUsize::new(3),
    });
    let ping = bind(&target, "Ping", responder()).unwrap();
    assert_eq!(ping.shape(), ReturnShape::Nothing);

    let mut ctx = ctx("GET", "/ping");
    ping.call(&mut ctx);
    assert!(!ctx.response_written());
    assert_eq!(ctx.response_status(), StatusCode::OK);
    assert!(ctx.response_body().is_empty());
    assert!(ctx.response_headers().is_empty());
}

#[test]
fn test_bound_handlers_are_shareable_across_threads() {
    let target: Arc<dyn HandlerTarget> = Arc::new(Counter {
        hits: AtomicUsize::new(0),
    });
    let hit = Arc::new(bind(&target, "Hit", responder()).unwrap());

    let threads: Vec<_> = (0..4)
        .map(|_| {
            let hit = Arc::clone(&hit);
            std::thread::spawn(move || {
                for _ in 0..25 {
                    let mut ctx = ctx("POST", "/hit");
                    hit.call(&mut ctx);
                    assert_eq!(ctx.response_status(), StatusCode::OK);
                }
            })
        })
        .collect();
    for thread in threads {
        thread.join().unwrap();
    }

    let mut last = ctx("POST", "/hit");
    hit.call(&mut last);
    assert_eq!(body(&last)["data"]["hits"], 101);
}

#[test]
fn test_error_translation_through_context_layers() {
    use anyhow::Context;

    let inner: Result<(), ApiError> =
        Err(ApiError::new("RATE_LIMITED", "slow down").with_status(429));
    let err = inner
        .context("calling upstream")
        .context("handling request")
        .unwrap_err();
    let info = extract_error_info(&err);
    assert_eq!(info.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(info.code.as_str(), "RATE_LIMITED");
    assert_eq!(info.message, "slow down");

    let plain = anyhow::anyhow!("secret connection string");
    let info = extract_error_info(&plain);
    assert_eq!(info.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(info.message, "internal server error");
}
