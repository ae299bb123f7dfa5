use super::method::Method;
use super::target::HandlerTarget;
use crate::context::RequestContext;
use serde_json::{json, Map, Value};
use std::convert::Infallible;
use std::sync::Arc;

/// Target that answers every handler name by echoing the request back.
///
/// Used by `routebind serve` to exercise a route file before real handlers
/// exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandlers;

impl HandlerTarget for EchoHandlers {
    fn target_type(&self) -> &'static str {
        "EchoHandlers"
    }

    fn method(self: Arc<Self>, name: &str) -> Option<Method> {
        if name.is_empty() {
            return None;
        }
        let handler = name.to_string();
        Some(Method::returning(move |ctx: &mut RequestContext| {
            Ok::<_, Infallible>(echo(&handler, ctx))
        }))
    }
}

fn pairs(params: &[(String, String)]) -> Value {
    let map: Map<String, Value> = params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    Value::Object(map)
}

fn echo(handler: &str, ctx: &RequestContext) -> Value {
    let body = if ctx.body().is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(ctx.body())
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(ctx.body()).into_owned()))
    };

    json!({
        "handler": handler,
        "method": ctx.method().as_str(),
        "path": ctx.path(),
        "params": pairs(ctx.path_params()),
        "query": pairs(ctx.query_params()),
        "body": body,
    })
}
