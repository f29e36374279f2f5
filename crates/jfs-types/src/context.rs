/// Per-request values handed through the store to validators.
///
/// The host builds one of these for every request. The only value the store
/// itself reads is the namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
    namespace: Option<String>,
}

impl RequestContext {
    /// A context with no namespace (cluster-scoped or all-namespace requests).
    pub fn new() -> Self {
        Self::default()
    }

    /// A context carrying `namespace`. An empty string carries none.
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            namespace: (!namespace.is_empty()).then_some(namespace),
        }
    }

    /// The request namespace, if the request carries one.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}
