use super::method::{Method, MethodTable};
use std::sync::Arc;

/// An object whose handler methods can be looked up by name.
///
/// This is the only capability the binder needs from a handler target. Most
/// applications implement [`HandlerSet`] instead and get this trait for free
/// through [`SetTarget`]; implement it directly when method names are only
/// known at runtime.
pub trait HandlerTarget: Send + Sync + 'static {
    /// Type name used in binding errors.
    fn target_type(&self) -> &'static str;

    /// Resolve the method registered under `name`, exactly as written.
    fn method(self: Arc<Self>, name: &str) -> Option<Method>;
}

/// Statically typed handler collection.
///
/// ```
/// use routebind::{HandlerResult, HandlerSet, MethodTable, RequestContext};
///
/// struct Users;
///
/// impl Users {
///     fn get_user(&self, ctx: &mut RequestContext) -> HandlerResult<serde_json::Value> {
///         Ok(serde_json::json!({ "id": ctx.path_param("id") }))
///     }
/// }
///
/// impl HandlerSet for Users {
///     fn methods(table: &mut MethodTable<Self>) {
///         table.returning("GetUser", Users::get_user);
///     }
/// }
/// ```
pub trait HandlerSet: Sized + Send + Sync + 'static {
    fn methods(table: &mut MethodTable<Self>);
}

/// A [`HandlerSet`] instance paired with its method table.
pub struct SetTarget<T> {
    target: Arc<T>,
    table: MethodTable<T>,
}

impl<T: HandlerSet> SetTarget<T> {
    #[must_use]
    pub fn new(target: T) -> Self {
        Self::from_arc(Arc::new(target))
    }

    #[must_use]
    pub fn from_arc(target: Arc<T>) -> Self {
        let mut table = MethodTable::new();
        T::methods(&mut table);
        Self { target, table }
    }
}

impl<T: HandlerSet> HandlerTarget for SetTarget<T> {
    fn target_type(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn method(self: Arc<Self>, name: &str) -> Option<Method> {
        self.table.resolve(&self.target, name)
    }
}
