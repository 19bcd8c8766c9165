//! Utility types.

type BuildHasher = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;

/// Insertion-ordered map used throughout the crate.
pub type Map<K, V> = indexmap::IndexMap<K, V, BuildHasher>;

/// Insertion-ordered set used throughout the crate.
pub type Set<T> = indexmap::IndexSet<T, BuildHasher>;
