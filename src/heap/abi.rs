//! `gu_*` proxies over the process-wide reference heap
//!
//! Everything these allocate stays in [`global`](super::global) for the
//! life of the process.
//!
//! Same names and signatures as the compiled Guile shim, so a consumer can
//! exercise bindings without libguile. Not exported with `#[no_mangle]`: the
//! unmangled symbols belong to the Guile build.

use crate::define_proxies;

crate::for_each_primitive!(define_proxies [crate::heap::global()]);
