use crate::context::RequestContext;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Result type for fallible handler methods.
pub type HandlerResult<T = ()> = Result<T, anyhow::Error>;

/// The three call shapes a handler method may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnShape {
    /// `fn(&self, &mut RequestContext)`: the handler writes its own response.
    Nothing,
    /// `fn(&self, &mut RequestContext) -> Result<(), E>`: only failures are answered.
    Error,
    /// `fn(&self, &mut RequestContext) -> Result<T, E>`: the payload is answered
    /// with a success envelope, failures with an error envelope.
    ValueAndError,
}

impl fmt::Display for ReturnShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReturnShape::Nothing => "()",
            ReturnShape::Error => "Result<(), E>",
            ReturnShape::ValueAndError => "Result<T, E>",
        };
        f.write_str(s)
    }
}

/// What a single handler invocation produced, normalised across shapes.
#[derive(Debug)]
pub enum Outcome {
    /// Nothing for the responder to write.
    Done,
    Failed(anyhow::Error),
    Data(Value),
}

impl Outcome {
    fn from_status<E: Into<anyhow::Error>>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Outcome::Done,
            Err(err) => Outcome::Failed(err.into()),
        }
    }

    /// A payload that fails to serialize is reported as a handler failure.
    fn from_payload<R: Serialize, E: Into<anyhow::Error>>(result: Result<R, E>) -> Self {
        let payload = match result {
            Ok(payload) => payload,
            Err(err) => return Outcome::Failed(err.into()),
        };
        match serde_json::to_value(payload) {
            Ok(value) => Outcome::Data(value),
            Err(err) => Outcome::Failed(err.into()),
        }
    }
}

type Invoke = dyn Fn(&mut RequestContext) -> Outcome + Send + Sync;

/// A handler method resolved on its target, ready to be invoked.
///
/// Constructed through [`Method::unit`], [`Method::fallible`] or
/// [`Method::returning`]; each accepts only functions of the matching shape
/// taking a single `&mut RequestContext`.
#[derive(Clone)]
pub struct Method {
    shape: ReturnShape,
    invoke: Arc<Invoke>,
}

impl Method {
    pub fn unit<F>(f: F) -> Self
    where
        F: Fn(&mut RequestContext) + Send + Sync + 'static,
    {
        Self {
            shape: ReturnShape::Nothing,
            invoke: Arc::new(move |ctx: &mut RequestContext| {
                f(ctx);
                Outcome::Done
            }),
        }
    }

    pub fn fallible<F, E>(f: F) -> Self
    where
        F: Fn(&mut RequestContext) -> Result<(), E> + Send + Sync + 'static,
        E: Into<anyhow::Error>,
    {
        Self {
            shape: ReturnShape::Error,
            invoke: Arc::new(move |ctx: &mut RequestContext| Outcome::from_status(f(ctx))),
        }
    }

    pub fn returning<F, R, E>(f: F) -> Self
    where
        F: Fn(&mut RequestContext) -> Result<R, E> + Send + Sync + 'static,
        R: Serialize,
        E: Into<anyhow::Error>,
    {
        Self {
            shape: ReturnShape::ValueAndError,
            invoke: Arc::new(move |ctx: &mut RequestContext| Outcome::from_payload(f(ctx))),
        }
    }

    #[must_use]
    pub fn shape(&self) -> ReturnShape {
        self.shape
    }

    pub fn invoke(&self, ctx: &mut RequestContext) -> Outcome {
        (self.invoke)(ctx)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method").field("shape", &self.shape).finish()
    }
}

type TypedInvoke<T> = dyn Fn(&T, &mut RequestContext) -> Outcome + Send + Sync;

struct TableEntry<T> {
    shape: ReturnShape,
    invoke: Arc<TypedInvoke<T>>,
}

/// Name-to-method table of a [`HandlerSet`](super::HandlerSet).
///
/// Registering a name twice keeps the last registration.
pub struct MethodTable<T> {
    entries: HashMap<&'static str, TableEntry<T>>,
}

impl<T> Default for MethodTable<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Send + Sync + 'static> MethodTable<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unit<F>(&mut self, name: &'static str, f: F) -> &mut Self
    where
        F: Fn(&T, &mut RequestContext) + Send + Sync + 'static,
    {
        self.insert(
            name,
            ReturnShape::Nothing,
            Arc::new(move |target: &T, ctx: &mut RequestContext| {
                f(target, ctx);
                Outcome::Done
            }),
        )
    }

    pub fn fallible<F, E>(&mut self, name: &'static str, f: F) -> &mut Self
    where
        F: Fn(&T, &mut RequestContext) -> Result<(), E> + Send + Sync + 'static,
        E: Into<anyhow::Error>,
    {
        self.insert(
            name,
            ReturnShape::Error,
            Arc::new(move |target: &T, ctx: &mut RequestContext| {
                Outcome::from_status(f(target, ctx))
            }),
        )
    }

    pub fn returning<F, R, E>(&mut self, name: &'static str, f: F) -> &mut Self
    where
        F: Fn(&T, &mut RequestContext) -> Result<R, E> + Send + Sync + 'static,
        R: Serialize,
        E: Into<anyhow::Error>,
    {
        self.insert(
            name,
            ReturnShape::ValueAndError,
            Arc::new(move |target: &T, ctx: &mut RequestContext| {
                Outcome::from_payload(f(target, ctx))
            }),
        )
    }

    fn insert(
        &mut self,
        name: &'static str,
        shape: ReturnShape,
        invoke: Arc<TypedInvoke<T>>,
    ) -> &mut Self {
        self.entries.insert(name, TableEntry { shape, invoke });
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Resolve `name` against a concrete target instance.
    pub(crate) fn resolve(&self, target: &Arc<T>, name: &str) -> Option<Method> {
        let entry = self.entries.get(name)?;
        let invoke = Arc::clone(&entry.invoke);
        let target = Arc::clone(target);
        Some(Method {
            shape: entry.shape,
            invoke: Arc::new(move |ctx: &mut RequestContext| invoke(target.as_ref(), ctx)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiError;
    use axum::body::Bytes;
    use http::StatusCode;

    fn ctx() -> RequestContext {
        RequestContext::from_request(http::Request::builder().uri("/").body(Bytes::new()).unwrap())
    }

    struct Counter {
        start: u32,
    }

    impl Counter {
        fn write(&self, ctx: &mut RequestContext) {
            ctx.write_text(StatusCode::ACCEPTED, self.start.to_string());
        }

        fn check(&self, _ctx: &mut RequestContext) -> Result<(), ApiError> {
            Err(ApiError::bad_request("nope"))
        }

        fn next(&self, _ctx: &mut RequestContext) -> HandlerResult<u32> {
            Ok(self.start + 1)
        }
    }

    fn table() -> MethodTable<Counter> {
        let mut table = MethodTable::new();
        table
            .unit("Write", Counter::write)
            .fallible("Check", Counter::check)
            .returning("Next", Counter::next);
        table
    }

    #[test]
    fn test_table_records_shapes() {
        let table = table();
        let target = Arc::new(Counter { start: 41 });
        assert_eq!(table.names(), vec!["Check", "Next", "Write"]);
        assert_eq!(
            table.resolve(&target, "Write").unwrap().shape(),
            ReturnShape::Nothing
        );
        assert_eq!(
            table.resolve(&target, "Check").unwrap().shape(),
            ReturnShape::Error
        );
        assert_eq!(
            table.resolve(&target, "Next").unwrap().shape(),
            ReturnShape::ValueAndError
        );
        assert!(table.resolve(&target, "next").is_none());
    }

    #[test]
    fn test_resolved_methods_invoke_the_target() {
        let table = table();
        let target = Arc::new(Counter { start: 41 });
        let mut ctx = ctx();

        let outcome = table.resolve(&target, "Next").unwrap().invoke(&mut ctx);
        assert!(matches!(outcome, Outcome::Data(v) if v == serde_json::json!(42)));

        let outcome = table.resolve(&target, "Check").unwrap().invoke(&mut ctx);
        assert!(matches!(outcome, Outcome::Failed(_)));

        let outcome = table.resolve(&target, "Write").unwrap().invoke(&mut ctx);
        assert!(matches!(outcome, Outcome::Done));
        assert_eq!(ctx.response_status(), StatusCode::ACCEPTED);
        assert_eq!(ctx.response_body().as_ref(), b"41");
    }

    #[test]
    fn test_closure_methods_share_table_semantics() {
        let silent = Method::unit(|_ctx: &mut RequestContext| {});
        let mut quiet = ctx();
        assert_eq!(silent.shape(), ReturnShape::Nothing);
        assert!(matches!(silent.invoke(&mut quiet), Outcome::Done));
        assert!(!quiet.response_written());

        let check = Method::fallible(|ctx: &mut RequestContext| match ctx.query_param("ok") {
            Some(_) => Ok(()),
            None => Err(ApiError::bad_request("missing ok")),
        });
        assert!(matches!(check.invoke(&mut ctx()), Outcome::Failed(_)));
    }

    #[test]
    fn test_unserializable_payload_fails() {
        use std::collections::HashMap;
        let method = Method::returning(|_ctx: &mut RequestContext| {
            let mut map = HashMap::new();
            map.insert((1, 2), "tuple keys are not JSON");
            Ok::<_, anyhow::Error>(map)
        });
        assert!(matches!(method.invoke(&mut ctx()), Outcome::Failed(_)));
    }
}
