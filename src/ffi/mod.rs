//! Foreign Function Interface
//!
//! The exported C surface of the shim:
//! - `gu_test_func`, always exported, to smoke-test the link path
//! - with the `guile` feature: declarations of the compiled C proxies
//!   (`sys`), the `Guile` backend over them, and `gu_scm_list_n`

#[cfg(feature = "guile")]
pub mod sys;
#[cfg(feature = "guile")]
mod guile;

#[cfg(feature = "guile")]
pub use guile::{gu_scm_list_n, Guile};

/// No-op diagnostic entry point.
///
/// Exists only so a consumer can check that the library links and a call
/// returns. Performs no work and touches no state.
#[no_mangle]
pub extern "C" fn gu_test_func() {}
