//! guile-shim - addressable proxies for Guile's macro-only primitives
//!
//! Many of Guile's core operations (`scm_is_pair`, `scm_is_eq`,
//! `SCM_BOOL_T`, ...) are preprocessor macros or inline functions with no
//! linkable address. This crate republishes them as `gu_*` functions with a
//! stable C ABI, all generated from one registry, plus `gu_scm_list_n` for
//! building lists from sentinel-terminated arrays.

#![allow(clippy::unused_unit)]

// Core modules
pub mod error;
pub mod value;
pub mod registry;
pub mod primitives;
pub mod proxy;
pub mod list;
pub mod heap;
pub mod codegen;
pub mod config;
pub mod logging;
pub mod ffi;

#[doc(hidden)]
pub use paste;

// Re-export commonly used items
pub use error::{RegistryError, Result, ShimError};
pub use value::{Scm, ScmBits};
pub use registry::{Kind, Primitive, PRIMITIVES};
pub use primitives::Primitives;
pub use list::{iter_list, list_from_iter, list_from_terminated, list_length, list_n, ListBuilder};
pub use heap::Heap;
pub use config::ShimConfig;
pub use logging::LogConfig;
pub use ffi::gu_test_func;

#[cfg(feature = "guile")]
pub use ffi::Guile;
