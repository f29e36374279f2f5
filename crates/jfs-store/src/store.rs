use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use jfs_types::{Key, RequestContext, Scope};
use jfs_watch::{Event, Subscription, WatchFilter, WatchHub};
use tracing::{debug, info};

use crate::codec::{Codec, JsonCodec};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::file::{ensure_dir, read_object, write_atomic, WriteMode};
use crate::layout::Layout;
use crate::list::ObjectList;
use crate::validation::Validator;
use crate::walker::walk;

/// Filesystem-backed object store: one encoded file per object, with a live
/// watch stream.
///
/// # Concurrency
///
/// Create, update, delete, collection delete, and watch registration are
/// serialized by one per-store mutation lock, so existence checks and
/// read-modify-write sequences cannot interleave within a process. Events are
/// broadcast while that lock is held, so every subscriber sees mutations in
/// the same order. Get and list take no lock; they rely on writes being
/// atomic renames.
///
/// Several stores (or processes) pointed at the same root are not
/// coordinated with each other.
pub struct FileStore<T, C = JsonCodec> {
    layout: Layout,
    codec: C,
    config: StoreConfig,
    hub: Arc<WatchHub<T>>,
    mutation: Mutex<()>,
}

impl<T> FileStore<T, JsonCodec>
where
    T: Clone + Send + Sync + 'static,
    JsonCodec: Codec<T>,
{
    /// Open a JSON-encoded store rooted at `config.root`.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        Self::with_codec(config, JsonCodec)
    }
}

impl<T, C> FileStore<T, C>
where
    T: Clone + Send + Sync + 'static,
    C: Codec<T>,
{
    /// Open a store that encodes objects with `codec`. Creates the root
    /// directory if needed.
    pub fn with_codec(config: StoreConfig, codec: C) -> StoreResult<Self> {
        config.validate()?;
        ensure_dir(&config.root)?;
        info!(root = %config.root.display(), sync_mode = ?config.sync_mode, "file store opened");

        Ok(Self {
            layout: Layout::new(config.root.clone()),
            hub: WatchHub::new(config.watch_capacity),
            codec,
            config,
            mutation: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of live watch subscriptions.
    pub fn watcher_count(&self) -> usize {
        self.hub.subscriber_count()
    }

    /// Read the object stored under `key`.
    pub fn get(&self, key: &Key) -> StoreResult<T> {
        self.read(key)?
            .ok_or_else(|| StoreError::NotFound { key: key.clone() })
    }

    /// Store a new object under `key` and broadcast `Added`.
    ///
    /// Fails with `AlreadyExists` if the key is taken; the stored object is
    /// left untouched.
    pub fn create(
        &self,
        ctx: &RequestContext,
        key: &Key,
        object: T,
        validator: &dyn Validator<T>,
    ) -> StoreResult<T> {
        validator.validate_create(ctx, &object)?;

        let _guard = self.lock();
        let path = self.layout.path_for(key);
        match fs::symlink_metadata(&path) {
            Ok(_) => return Err(StoreError::AlreadyExists { key: key.clone() }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io("stat", &path, e)),
        }
        self.write(key, &path, &object, WriteMode::CreateNew)?;

        debug!(%key, "object created");
        self.hub.broadcast(&Event::added(key.clone(), object.clone()));
        Ok(object)
    }

    /// Replace the object under `key` with the result of `mutate`.
    ///
    /// `mutate` receives the current object, or `None` when the key is
    /// absent and `allow_create` is set. Returns the stored object and
    /// whether it was created. A missing key without `allow_create` fails
    /// with `NotFound`.
    pub fn update<F>(
        &self,
        ctx: &RequestContext,
        key: &Key,
        mutate: F,
        allow_create: bool,
        validator: &dyn Validator<T>,
    ) -> StoreResult<(T, bool)>
    where
        F: FnOnce(Option<&T>) -> StoreResult<T>,
    {
        let _guard = self.lock();
        let path = self.layout.path_for(key);
        let current = self.read(key)?;
        if current.is_none() && !allow_create {
            return Err(StoreError::NotFound { key: key.clone() });
        }

        let updated = mutate(current.as_ref())?;

        match current {
            None => {
                validator.validate_create(ctx, &updated)?;
                self.write(key, &path, &updated, WriteMode::CreateNew)?;
                debug!(%key, "object created by update");
                self.hub.broadcast(&Event::added(key.clone(), updated.clone()));
                Ok((updated, true))
            }
            Some(old) => {
                validator.validate_update(ctx, &updated, &old)?;
                self.write(key, &path, &updated, WriteMode::Replace)?;
                debug!(%key, "object updated");
                self.hub.broadcast(&Event::modified(key.clone(), updated.clone()));
                Ok((updated, false))
            }
        }
    }

    /// Remove the object under `key`, broadcast `Deleted`, and return the
    /// value it held immediately before removal.
    pub fn delete(
        &self,
        ctx: &RequestContext,
        key: &Key,
        validator: &dyn Validator<T>,
    ) -> StoreResult<T> {
        let _guard = self.lock();
        let object = self
            .read(key)?
            .ok_or_else(|| StoreError::NotFound { key: key.clone() })?;
        validator.validate_delete(ctx, &object)?;

        let path = self.layout.path_for(key);
        fs::remove_file(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound { key: key.clone() },
            _ => StoreError::io("remove", &path, e),
        })?;

        debug!(%key, "object deleted");
        self.hub.broadcast(&Event::deleted(key.clone(), object.clone()));
        Ok(object)
    }

    /// Every object under `scope`, in filesystem traversal order.
    pub fn list(&self, scope: &Scope) -> StoreResult<ObjectList<T>> {
        let mut list = ObjectList::new();
        walk(&self.layout, &self.codec, scope, |_, _, object| {
            list.push(object);
            Ok(())
        })?;
        Ok(list)
    }

    /// Remove every object under `scope` and return the removed values.
    ///
    /// Each object is validated, removed, and announced with `Deleted` as the
    /// walk reaches it. A validation or I/O failure stops the walk; objects
    /// already removed stay removed.
    pub fn delete_collection(
        &self,
        ctx: &RequestContext,
        scope: &Scope,
        validator: &dyn Validator<T>,
    ) -> StoreResult<ObjectList<T>> {
        let _guard = self.lock();
        let mut removed = ObjectList::new();
        walk(&self.layout, &self.codec, scope, |path, key, object| {
            validator.validate_delete(ctx, &object)?;
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
                Err(e) => return Err(StoreError::io("remove", path, e)),
            }
            self.hub.broadcast(&Event::deleted(key, object.clone()));
            removed.push(object);
            Ok(())
        })?;

        debug!(%scope, count = removed.len(), "collection deleted");
        Ok(removed)
    }

    /// Open a watch over `scope`.
    ///
    /// The subscription first yields one `Added` event per object currently
    /// in scope, then every later mutation in scope. Listing and registration
    /// happen under the mutation lock, so each mutation shows up either in
    /// the snapshot or as a live event, exactly once.
    pub fn watch(&self, scope: &Scope) -> StoreResult<Subscription<T>> {
        let _guard = self.lock();
        let mut snapshot = Vec::new();
        walk(&self.layout, &self.codec, scope, |_, key, object| {
            snapshot.push((key, object));
            Ok(())
        })?;
        Ok(self.hub.subscribe(WatchFilter::new(scope.clone()), snapshot)?)
    }

    /// Stop a subscription. Equivalent to dropping it.
    pub fn stop(&self, subscription: Subscription<T>) {
        subscription.stop();
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.mutation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self, key: &Key) -> StoreResult<Option<T>> {
        read_object(&self.codec, &self.layout.path_for(key))
    }

    fn write(&self, key: &Key, path: &Path, object: &T, mode: WriteMode) -> StoreResult<()> {
        let bytes = self.codec.encode(object).map_err(|source| StoreError::Encode {
            key: key.clone(),
            source,
        })?;
        // Namespace directories appear on first write.
        ensure_dir(&self.layout.dir_for(key))?;
        write_atomic(path, &bytes, mode, self.config.sync_mode).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => StoreError::AlreadyExists { key: key.clone() },
            _ => StoreError::io("write", path, e),
        })
    }
}

impl<T, C> fmt::Debug for FileStore<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore")
            .field("root", &self.layout.root())
            .field("sync_mode", &self.config.sync_mode)
            .finish()
    }
}
