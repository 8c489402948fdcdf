//! Lock Ordering Resolver
//!
//! Deterministic total order over account numbers. Every transfer acquires
//! its two row locks in this order, so no two concurrent transfers can ever
//! hold locks in reverse order relative to each other. A deadlock cycle
//! would require two accounts to be ordered both ways, which a total order
//! rules out.

/// Resolve the lock acquisition order for a pair of distinct account
/// numbers. Symmetric in its arguments: `lock_order(a, b)` and
/// `lock_order(b, a)` return the same pair.
pub fn lock_order<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
