//! Synchronization utilities for robust mutex handling
//!
//! Queue state is a plain sequence plus counters, and every critical section
//! leaves it consistent between statements. A panic while a lock is held
//! therefore never leaves half-written state behind, so poisoned locks are
//! recovered rather than propagated.

use std::sync::{Mutex, MutexGuard};

/// Lock a mutex, recovering the guard if a previous holder panicked
///
/// # Arguments
/// * `mutex` - The mutex to lock
/// * `context` - Short description of the protected state, used in the log line
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use dynqueue::core::sync::lock_or_recover;
///
/// let mutex = Mutex::new(42);
/// let guard = lock_or_recover(&mutex, "example counter");
/// assert_eq!(*guard, 42);
/// ```
pub fn lock_or_recover<'a, T>(mutex: &'a Mutex<T>, context: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poison_err| {
        log::warn!(
            "Recovering poisoned lock on {} (a panic occurred while it was held)",
            context
        );
        poison_err.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_lock_or_recover_success() {
        let mutex = Mutex::new(42);
        let guard = lock_or_recover(&mutex, "test value");
        assert_eq!(*guard, 42);
    }

    #[test]
    fn test_lock_or_recover_with_poisoned_mutex() {
        let mutex = Arc::new(Mutex::new(vec![1, 2, 3]));
        let mutex_clone = Arc::clone(&mutex);

        // Poison the mutex by panicking while holding the lock
        let _ = thread::spawn(move || {
            let _guard = mutex_clone.lock().unwrap();
            panic!("Intentional panic to poison mutex");
        })
        .join();

        assert!(mutex.is_poisoned());

        // State is still reachable and unchanged
        let mut guard = lock_or_recover(&mutex, "test vector");
        assert_eq!(*guard, vec![1, 2, 3]);
        guard.push(4);
        drop(guard);

        assert_eq!(lock_or_recover(&mutex, "test vector").len(), 4);
    }
}
