//! Raw declarations for the compiled proxies and the few libguile
//! functions the backend needs
//!
//! The proxy half is expanded from the registry, so it cannot drift from
//! the C translation unit `build.rs` compiles from the same list.

#![allow(non_snake_case)]

use crate::value::Scm;
use core::ffi::{c_char, c_void};

macro_rules! declare_proxy_externs {
    (
        [$($ctx:tt)*]
        $(constant $c:ident => $cm:ident;)*
        $(unary $u:ident => $um:ident($ua:ident) -> $ur:ident;)*
        $(binary $b:ident => $bm:ident($ba:ident, $bb:ident) -> $br:ident;)*
    ) => {
        paste::paste! {
            extern "C" {
                $(pub fn [<gu_ $c>]() -> Scm;)*
                $(pub fn [<gu_ $u>](x: crate::abi_ty!($ua)) -> crate::abi_ty!($ur);)*
                $(pub fn [<gu_ $b>](x: crate::abi_ty!($ba), y: crate::abi_ty!($bb)) -> crate::abi_ty!($br);)*
            }
        }
    };
}

crate::for_each_primitive!(declare_proxy_externs);

extern "C" {
    pub fn scm_init_guile();
    pub fn scm_with_guile(
        func: Option<unsafe extern "C" fn(*mut c_void) -> *mut c_void>,
        data: *mut c_void,
    ) -> *mut c_void;
    pub fn scm_from_utf8_symboln(name: *const c_char, len: usize) -> Scm;
    pub fn scm_from_utf8_stringn(text: *const c_char, len: usize) -> Scm;
}
