use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Logical identity of a stored object.
///
/// A key without a namespace addresses a cluster-scoped object. Uniqueness is
/// the pair `(namespace, name)`; an empty namespace string is the same as no
/// namespace.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key {
    name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_empty_namespace"
    )]
    namespace: Option<String>,
}

fn non_empty_namespace<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let namespace = Option::<String>::deserialize(deserializer)?;
    Ok(namespace.filter(|ns| !ns.is_empty()))
}

impl Key {
    /// Key for a cluster-scoped object.
    pub fn cluster(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    /// Key for an object inside `namespace`.
    ///
    /// An empty namespace yields a cluster-scoped key.
    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            name: name.into(),
            namespace: (!namespace.is_empty()).then_some(namespace),
        }
    }

    /// Build a key from an optional namespace.
    pub fn new(namespace: Option<&str>, name: impl Into<String>) -> Self {
        match namespace {
            Some(ns) => Self::namespaced(ns, name),
            None => Self::cluster(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn is_namespaced(&self) -> bool {
        self.namespace.is_some()
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({self})")
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{ns}/{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Objects that know their own name.
///
/// The resource facade uses this to derive the key of an object handed to
/// `create`; the namespace always comes from the request.
pub trait Named {
    fn name(&self) -> &str;
}
