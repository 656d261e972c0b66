//! # IDs
//! Strokes live in an arena and are referred to by handle. Handles are implemented in this module via the
//! `SketchID<T>` type, which hands out process-unique IDs namespaced by the type T.
//!
//! A handle never changes for the lifetime of the thing it names, so the history lists can hold handles
//! while the strokes themselves are replaced underneath. IDs are never reused.

// Next free ID by namespace.
static ID_SERVER: parking_lot::RwLock<
    std::collections::BTreeMap<std::any::TypeId, std::sync::atomic::AtomicU64>,
> = parking_lot::const_rwlock(std::collections::BTreeMap::new());

/// ID that is unique within this execution of the program.
/// IDs with different namespaces may share a value but are different types and can't be compared.
pub struct SketchID<T: std::any::Any> {
    id: std::num::NonZeroU64,
    _phantom: std::marker::PhantomData<T>,
}
impl<T: std::any::Any> Clone for SketchID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for SketchID<T> {}
impl<T: std::any::Any> PartialEq for SketchID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T: std::any::Any> Eq for SketchID<T> {}
impl<T: std::any::Any> PartialOrd for SketchID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: std::any::Any> Ord for SketchID<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

// Only a u64 is stored. Without these, a !Send namespace type would make the ID !Send as well.
unsafe impl<T: std::any::Any> Send for SketchID<T> {}
unsafe impl<T: std::any::Any> Sync for SketchID<T> {}

impl<T: std::any::Any> std::hash::Hash for SketchID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T: std::any::Any> SketchID<T> {
    /// Get the raw numeric value of this ID.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id.get()
    }
    /// Allocate a fresh ID from the namespace `T`.
    #[must_use]
    pub fn allocate() -> Self {
        let ty = std::any::TypeId::of::<T>();
        let raw = {
            let read = ID_SERVER.upgradable_read();
            if let Some(next) = read.get(&ty) {
                next.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            } else {
                // First allocation in this namespace. Happens once per type.
                let mut write = parking_lot::RwLockUpgradableReadGuard::upgrade(read);
                let next = write
                    .entry(ty)
                    .or_insert_with(|| std::sync::atomic::AtomicU64::new(1));
                next.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            }
        };

        let Some(id) = std::num::NonZeroU64::new(raw) else {
            // The counter wrapped. Uniqueness can no longer be promised for anyone.
            #[cfg(not(test))]
            {
                log::error!("{} ID overflow! Aborting!", std::any::type_name::<T>());
                log::logger().flush();
                std::process::abort();
            }
            #[cfg(test)]
            {
                panic!("{} ID overflow! Aborting!", std::any::type_name::<T>())
            }
        };
        Self {
            id,
            _phantom: std::marker::PhantomData,
        }
    }
}
impl<T: std::any::Any> Default for SketchID<T> {
    fn default() -> Self {
        Self::allocate()
    }
}
impl<T: std::any::Any> std::fmt::Display for SketchID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // rsplit always yields at least one element.
        let name = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or_default();
        write!(f, "{name}#{}", self.id)
    }
}
impl<T: std::any::Any> std::fmt::Debug for SketchID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}
