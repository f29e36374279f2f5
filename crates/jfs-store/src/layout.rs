//! Key addressing: where each object lives on disk, and back.
//!
//! ```text
//! <root>/<name>.json               cluster-scoped object
//! <root>/<namespace>/<name>.json   namespaced object
//! ```
//!
//! [`Layout::path_for`] and [`Layout::key_for`] are inverses over every path
//! the store itself writes. Names and namespaces are not validated; a name
//! containing a path separator lands somewhere `key_for` will not recognize.

use std::path::{Component, Path, PathBuf};

use jfs_types::{Key, Scope};

/// Suffix of every persisted object file.
pub const OBJECT_SUFFIX: &str = ".json";

/// Maps keys to paths under one root directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the object file for `key`.
    pub fn path_for(&self, key: &Key) -> PathBuf {
        self.dir_for(key).join(format!("{}{OBJECT_SUFFIX}", key.name()))
    }

    /// Directory holding the object file for `key`.
    pub fn dir_for(&self, key: &Key) -> PathBuf {
        match key.namespace() {
            Some(ns) => self.namespace_dir(ns),
            None => self.root.clone(),
        }
    }

    pub fn namespace_dir(&self, namespace: &str) -> PathBuf {
        self.root.join(namespace)
    }

    /// Directory a walk over `scope` starts from.
    pub fn scope_dir(&self, scope: &Scope) -> PathBuf {
        match scope.namespace() {
            Some(ns) => self.namespace_dir(ns),
            None => self.root.clone(),
        }
    }

    /// Recover the key of an object file, or `None` if `path` is not one.
    ///
    /// The path is read relative to the root: a single `<name>.json`
    /// component is cluster-scoped, `<namespace>/<name>.json` is namespaced.
    /// Deeper paths, other suffixes, and non-UTF-8 components are rejected.
    pub fn key_for(&self, path: &Path) -> Option<Key> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let mut parts = relative
            .components()
            .map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect::<Option<Vec<&str>>>()?;

        let file = parts.pop()?;
        let name = file.strip_suffix(OBJECT_SUFFIX)?;
        if name.is_empty() {
            return None;
        }
        match parts.as_slice() {
            [] => Some(Key::cluster(name)),
            [ns] => Some(Key::namespaced(*ns, name)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout::new("/data/example.com/widgets")
    }

    #[test]
    fn cluster_key_path() {
        assert_eq!(
            layout().path_for(&Key::cluster("foo")),
            PathBuf::from("/data/example.com/widgets/foo.json")
        );
    }

    #[test]
    fn namespaced_key_path() {
        assert_eq!(
            layout().path_for(&Key::namespaced("ns1", "foo")),
            PathBuf::from("/data/example.com/widgets/ns1/foo.json")
        );
    }

    #[test]
    fn key_for_inverts_path_for() {
        let l = layout();
        for key in [
            Key::cluster("foo"),
            Key::namespaced("ns1", "foo"),
            Key::namespaced("ns1", "foo.bar"),
        ] {
            assert_eq!(l.key_for(&l.path_for(&key)), Some(key));
        }
    }

    #[test]
    fn name_equal_to_namespace_stays_distinct() {
        let l = layout();
        let cluster = l.path_for(&Key::cluster("ns1"));
        let namespaced = l.path_for(&Key::namespaced("ns1", "ns1"));
        assert_ne!(cluster, namespaced);
    }

    #[test]
    fn key_for_rejects_foreign_paths() {
        let l = layout();
        assert_eq!(l.key_for(Path::new("/elsewhere/foo.json")), None);
        assert_eq!(l.key_for(Path::new("/data/example.com/widgets/foo.yaml")), None);
        assert_eq!(l.key_for(Path::new("/data/example.com/widgets/.json")), None);
        assert_eq!(l.key_for(Path::new("/data/example.com/widgets/a/b/c.json")), None);
        assert_eq!(l.key_for(Path::new("/data/example.com/widgets/.tmpA1b2C3")), None);
        assert_eq!(l.key_for(Path::new("/data/example.com/widgets")), None);
    }

    #[test]
    fn scope_dirs() {
        let l = layout();
        assert_eq!(l.scope_dir(&Scope::All), l.root());
        assert_eq!(
            l.scope_dir(&Scope::Namespace("ns2".into())),
            PathBuf::from("/data/example.com/widgets/ns2")
        );
        assert_eq!(l.scope_dir(&Scope::Namespace(String::new())), l.root());
    }

    mod props {
        use jfs_types::Key;
        use proptest::prelude::*;

        use crate::layout::Layout;

        fn ident() -> impl Strategy<Value = String> {
            "[a-z0-9][a-z0-9.-]{0,15}"
        }

        fn key() -> impl Strategy<Value = Key> {
            (proptest::option::of(ident()), ident()).prop_map(|(ns, name)| Key::new(ns.as_deref(), name))
        }

        proptest! {
            #[test]
            fn key_for_recovers_every_key(k in key()) {
                let l = Layout::new("/root/objects");
                prop_assert_eq!(l.key_for(&l.path_for(&k)), Some(k));
            }

            #[test]
            fn distinct_keys_get_distinct_paths(a in key(), b in key()) {
                let l = Layout::new("/root/objects");
                prop_assert_eq!(a == b, l.path_for(&a) == l.path_for(&b));
            }
        }
    }
}
