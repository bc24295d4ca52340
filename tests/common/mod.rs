//! Common test utilities for PATCH engine testing.
//!
//! This module provides logging setup, fixtures, and assertion macros shared
//! by the integration tests.

pub mod fixtures;

use std::sync::Once;

static LOGGING: Once = Once::new();

/// Route the library's `log` output through env_logger, once per test binary.
///
/// Respects `RUST_LOG`; output is captured by the test harness unless
/// `--nocapture` is given.
pub fn init_logging() {
    LOGGING.call_once(|| {
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("scim_patch=debug"),
        )
        .is_test(true)
        .try_init();
    });
}

/// Assert that a result is an error with the given RFC 7644 `scimType`.
#[macro_export]
macro_rules! assert_scim_type {
    ($result:expr, $scim_type:expr) => {
        match $result {
            Ok(value) => panic!(
                "expected scimType '{}', got Ok({:?})",
                $scim_type, value
            ),
            Err(error) => assert_eq!(
                error.scim_type(),
                Some($scim_type),
                "unexpected error: {}",
                error
            ),
        }
    };
}

/// Assert that a result is a `NotFound` error.
#[macro_export]
macro_rules! assert_not_found {
    ($result:expr) => {
        match $result {
            Err(scim_patch::ScimError::NotFound { .. }) => {}
            other => panic!("expected NotFound, got {:?}", other),
        }
    };
}
