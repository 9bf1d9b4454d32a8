//! Synchronization utilities for robust mutex handling
//!
//! The buffer's critical sections either complete a whole append/remove or
//! touch nothing, so a lock poisoned by a panicking holder still guards a
//! consistent value. These helpers recover the guard and record the event
//! instead of propagating the poison to every later caller.

use std::sync::LockResult;

/// Recover the guard from a possibly poisoned lock result
///
/// Works for anything wrapped in a `LockResult`: plain `Mutex::lock` guards as
/// well as the `(guard, timeout)` pair returned by `Condvar::wait_timeout`.
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use boundbuf::core::sync::recover_poison;
///
/// let mutex = Mutex::new(42);
/// let guard = recover_poison(mutex.lock(), "example");
/// assert_eq!(*guard, 42);
/// ```
pub fn recover_poison<G>(result: LockResult<G>, context: &str) -> G {
    result.unwrap_or_else(|poison_err| {
        log::warn!(
            "Recovering poisoned lock in {}: a panic occurred while it was held",
            context
        );
        poison_err.into_inner()
    })
}
