//! Ready-made comparators.
//!
//! [`Experiment::new`](crate::Experiment::new) already defaults to
//! [`deep_equal`]; the others are for values that can't, or shouldn't, be
//! compared structurally.

use std::sync::Arc;

/// Structural equality. `PartialEq` recurses through collections, tuples and
/// derived structs, so two separately built `Vec<HashMap<_, _>>` compare by
/// contents.
pub fn deep_equal<T: PartialEq>(control: &T, candidate: &T) -> bool {
    control == candidate
}

/// Identity comparison for opaque values shared behind an `Arc`
pub fn ptr_eq<T: ?Sized>(control: &Arc<T>, candidate: &Arc<T>) -> bool {
    Arc::ptr_eq(control, candidate)
}

/// Compares a projection of both values, e.g. only the ids of two records
pub fn by_key<T, K, F>(key: F) -> impl Fn(&T, &T) -> bool + Send + Sync
where
    K: PartialEq,
    F: Fn(&T) -> K + Send + Sync,
{
    move |control, candidate| key(control) == key(candidate)
}
