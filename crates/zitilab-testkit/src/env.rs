//! Environment isolation utilities for testing
//!
//! Environment variables are process-global, so every test that touches them
//! goes through [`with_isolated_env`], which serialises access with
//! [`ENV_LOCK`] and restores the previous values afterwards.

use std::sync::Mutex;

/// Static mutex to serialize tests that modify environment variables
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with the given variables set (`Some`) or removed (`None`)
///
/// # Examples
///
/// ```no_run
/// use zitilab_testkit::with_isolated_env;
///
/// with_isolated_env(&[("ZITI_HOME", Some("/tmp/ziti")), ("GITHUB_TOKEN", None)], || {
///     assert_eq!(std::env::var("ZITI_HOME").unwrap(), "/tmp/ziti");
/// });
/// ```
pub fn with_isolated_env<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| {
        // Recover from poisoned mutex
        // Safe because:
        // - Environment variables remain valid after panic
        // - We're just serializing access, not protecting data
        poisoned.into_inner()
    });

    let originals: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
        .collect();

    // SAFETY: We hold ENV_LOCK, ensuring no other test is modifying env vars concurrently.
    unsafe {
        for (key, value) in vars {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

    // SAFETY: We still hold ENV_LOCK, ensuring exclusive access to env vars.
    unsafe {
        for (key, original) in &originals {
            match original {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
