// src/sema/snapshot.rs
//
// Publication point between an indexer producing environments and resolvers
// reading them.

use std::sync::{Arc, RwLock};

use crate::sema::env::Env;

/// An environment together with the version it was published under.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub version: u64,
    pub env: Arc<Env>,
}

/// Holds the best known environment. Writers replace it whole; readers get an
/// `Arc` to a complete value and keep using it even after a newer one is
/// published. Readers only hold the lock long enough to clone that `Arc`;
/// resolution itself never runs under it.
#[derive(Debug)]
pub struct EnvStore {
    current: RwLock<Snapshot>,
}

impl EnvStore {
    pub fn new(env: Env) -> Self {
        Self {
            current: RwLock::new(Snapshot {
                version: 0,
                env: Arc::new(env),
            }),
        }
    }

    /// Replace the current environment, returning the new version.
    pub fn publish(&self, env: Env) -> u64 {
        let env = Arc::new(env);
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        current.version += 1;
        current.env = env;
        tracing::debug!(version = current.version, "published environment");
        current.version
    }

    pub fn snapshot(&self) -> Snapshot {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn version(&self) -> u64 {
        self.snapshot().version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sema::prelude::{PreludeOptions, environment};
    use std::thread;

    #[test]
    fn readers_keep_their_snapshot() {
        let store = EnvStore::new(environment(&PreludeOptions::default()).unwrap());
        let before = store.snapshot();
        let version = store.publish(environment(&PreludeOptions::default()).unwrap());
        assert_eq!(version, 1);
        assert_eq!(before.version, 0);
        assert!(!Arc::ptr_eq(&before.env, &store.snapshot().env));
    }

    #[test]
    fn concurrent_publish_and_read() {
        let store = Arc::new(EnvStore::new(environment(&PreludeOptions::default()).unwrap()));
        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..8 {
                    store.publish(environment(&PreludeOptions::default()).unwrap());
                }
            })
        };
        let mut last = 0;
        for _ in 0..8 {
            let snap = store.snapshot();
            assert!(snap.version >= last);
            last = snap.version;
        }
        writer.join().unwrap();
        assert_eq!(store.version(), 8);
    }
}
