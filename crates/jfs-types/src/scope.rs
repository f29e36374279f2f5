use std::fmt;

use serde::{Deserialize, Serialize};

use crate::key::Key;

/// The set of keys covered by a list, watch, or collection delete.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Every object in the store, cluster-scoped and namespaced alike.
    #[default]
    All,
    /// Only objects inside one namespace. An empty namespace behaves as
    /// [`Scope::All`].
    Namespace(String),
}

impl Scope {
    /// Scope for an optional namespace; `None` or `""` covers the whole store.
    pub fn from_namespace(namespace: Option<&str>) -> Self {
        match namespace {
            Some(ns) if !ns.is_empty() => Self::Namespace(ns.to_string()),
            _ => Self::All,
        }
    }

    pub fn contains(&self, key: &Key) -> bool {
        match self.namespace() {
            None => true,
            Some(ns) => key.namespace() == Some(ns),
        }
    }

    /// The namespace this scope is limited to, or `None` for the whole store.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::Namespace(ns) if !ns.is_empty() => Some(ns),
            _ => None,
        }
    }

    pub fn is_all(&self) -> bool {
        self.namespace().is_none()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace().unwrap_or("*"))
    }
}
