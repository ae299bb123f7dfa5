use super::target::{HandlerSet, HandlerTarget, SetTarget};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Group name to handler target mapping supplied by the embedder.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    targets: HashMap<String, Arc<dyn HandlerTarget>>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed handler set for `group`.
    #[must_use]
    pub fn with_set<T: HandlerSet>(mut self, group: impl Into<String>, set: T) -> Self {
        self.insert_set(group, set);
        self
    }

    /// Register a dynamic target for `group`.
    #[must_use]
    pub fn with_target(mut self, group: impl Into<String>, target: impl HandlerTarget) -> Self {
        self.insert_target(group, target);
        self
    }

    /// Returns the target previously registered under `group`, if any.
    pub fn insert_set<T: HandlerSet>(
        &mut self,
        group: impl Into<String>,
        set: T,
    ) -> Option<Arc<dyn HandlerTarget>> {
        self.insert_arc(group, Arc::new(SetTarget::new(set)))
    }

    pub fn insert_target(
        &mut self,
        group: impl Into<String>,
        target: impl HandlerTarget,
    ) -> Option<Arc<dyn HandlerTarget>> {
        self.insert_arc(group, Arc::new(target))
    }

    pub fn insert_arc(
        &mut self,
        group: impl Into<String>,
        target: Arc<dyn HandlerTarget>,
    ) -> Option<Arc<dyn HandlerTarget>> {
        self.targets.insert(group.into(), target)
    }

    #[must_use]
    pub fn get(&self, group: &str) -> Option<&Arc<dyn HandlerTarget>> {
        self.targets.get(group)
    }

    #[must_use]
    pub fn contains(&self, group: &str) -> bool {
        self.targets.contains_key(group)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Registered group names in sorted order.
    #[must_use]
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<_> = self.targets.keys().map(String::as_str).collect();
        groups.sort_unstable();
        groups
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for group in self.groups() {
            if let Some(target) = self.targets.get(group) {
                map.entry(&group, &target.target_type());
            }
        }
        map.finish()
    }
}
