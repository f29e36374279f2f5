//! Request-level facade over a [`FileStore`] for one resource type.
//!
//! A host routes typed requests here by name and request context; the facade
//! turns them into keys and scopes. Each resource type gets its own store
//! rooted at `<base>/<group>/<resource>`.

use std::fmt;
use std::path::{Path, PathBuf};

use jfs_types::{Key, Named, RequestContext, Scope};
use jfs_watch::Subscription;
use serde::{Deserialize, Serialize};

use crate::codec::{Codec, JsonCodec};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::list::ObjectList;
use crate::store::FileStore;
use crate::validation::Validator;

/// API group and plural resource name, e.g. `example.com` / `widgets`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupResource {
    pub group: String,
    pub resource: String,
}

impl GroupResource {
    pub fn new(group: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            resource: resource.into(),
        }
    }

    /// Store root for this resource under `base`. The core (empty) group
    /// has no group directory.
    pub fn root_under(&self, base: &Path) -> PathBuf {
        if self.group.is_empty() {
            base.join(&self.resource)
        } else {
            base.join(&self.group).join(&self.resource)
        }
    }
}

impl fmt::Display for GroupResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            f.write_str(&self.resource)
        } else {
            write!(f, "{}.{}", self.resource, self.group)
        }
    }
}

/// Storage for one resource type, addressed by request context and name.
pub struct ResourceStorage<T, C = JsonCodec> {
    group_resource: GroupResource,
    namespaced: bool,
    store: FileStore<T, C>,
}

impl<T> ResourceStorage<T, JsonCodec>
where
    T: Clone + Send + Sync + 'static,
    JsonCodec: Codec<T>,
{
    /// Open JSON storage for `group_resource` under `config.root`.
    pub fn open(group_resource: GroupResource, namespaced: bool, config: StoreConfig) -> StoreResult<Self> {
        Self::with_codec(group_resource, namespaced, config, JsonCodec)
    }
}

impl<T, C> ResourceStorage<T, C>
where
    T: Clone + Send + Sync + 'static,
    C: Codec<T>,
{
    /// Open storage for `group_resource`. `config.root` is the base data
    /// directory shared by all resource types.
    pub fn with_codec(
        group_resource: GroupResource,
        namespaced: bool,
        config: StoreConfig,
        codec: C,
    ) -> StoreResult<Self> {
        let root = group_resource.root_under(&config.root);
        let store = FileStore::with_codec(StoreConfig { root, ..config }, codec)?;
        Ok(Self {
            group_resource,
            namespaced,
            store,
        })
    }

    pub fn group_resource(&self) -> &GroupResource {
        &self.group_resource
    }

    /// Whether objects of this type live inside namespaces.
    pub fn namespace_scoped(&self) -> bool {
        self.namespaced
    }

    /// The underlying key-addressed store.
    pub fn store(&self) -> &FileStore<T, C> {
        &self.store
    }

    pub fn new_list(&self) -> ObjectList<T> {
        ObjectList::new()
    }

    pub fn new_object(&self) -> T
    where
        T: Default,
    {
        T::default()
    }

    /// Key for `name` in this request. Namespaced resources require the
    /// request to carry a namespace; cluster-scoped ones ignore it.
    pub fn key_for(&self, ctx: &RequestContext, name: &str) -> StoreResult<Key> {
        if !self.namespaced {
            return Ok(Key::cluster(name));
        }
        let ns = ctx.namespace().ok_or_else(|| StoreError::NamespaceRequired {
            resource: self.group_resource.to_string(),
        })?;
        Ok(Key::namespaced(ns, name))
    }

    /// Scope of a collection request: the request namespace for namespaced
    /// resources, otherwise the whole store.
    pub fn scope_for(&self, ctx: &RequestContext) -> Scope {
        if self.namespaced {
            Scope::from_namespace(ctx.namespace())
        } else {
            Scope::All
        }
    }

    pub fn get(&self, ctx: &RequestContext, name: &str) -> StoreResult<T> {
        self.store.get(&self.key_for(ctx, name)?)
    }

    /// Update `name`, creating it when absent and `force_allow_create` is set.
    pub fn update<F>(
        &self,
        ctx: &RequestContext,
        name: &str,
        mutate: F,
        force_allow_create: bool,
        validator: &dyn Validator<T>,
    ) -> StoreResult<(T, bool)>
    where
        F: FnOnce(Option<&T>) -> StoreResult<T>,
    {
        let key = self.key_for(ctx, name)?;
        self.store.update(ctx, &key, mutate, force_allow_create, validator)
    }

    pub fn delete(&self, ctx: &RequestContext, name: &str, validator: &dyn Validator<T>) -> StoreResult<T> {
        let key = self.key_for(ctx, name)?;
        self.store.delete(ctx, &key, validator)
    }

    pub fn list(&self, ctx: &RequestContext) -> StoreResult<ObjectList<T>> {
        self.store.list(&self.scope_for(ctx))
    }

    pub fn delete_collection(
        &self,
        ctx: &RequestContext,
        validator: &dyn Validator<T>,
    ) -> StoreResult<ObjectList<T>> {
        self.store.delete_collection(ctx, &self.scope_for(ctx), validator)
    }

    pub fn watch(&self, ctx: &RequestContext) -> StoreResult<Subscription<T>> {
        self.store.watch(&self.scope_for(ctx))
    }
}

impl<T, C> ResourceStorage<T, C>
where
    T: Named + Clone + Send + Sync + 'static,
    C: Codec<T>,
{
    /// Create `object` under its own name in the request namespace.
    pub fn create(&self, ctx: &RequestContext, object: T, validator: &dyn Validator<T>) -> StoreResult<T> {
        let key = self.key_for(ctx, object.name())?;
        self.store.create(ctx, &key, object, validator)
    }
}

impl<T, C> fmt::Debug for ResourceStorage<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceStorage")
            .field("group_resource", &self.group_resource)
            .field("namespaced", &self.namespaced)
            .field("store", &self.store)
            .finish()
    }
}
