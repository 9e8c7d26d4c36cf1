//! The runtime's primitive ABI as a trait
//!
//! One method per registry entry, generated from `for_each_primitive!`.
//! A backend (Guile through the compiled shim, or the reference heap)
//! implements it; proxies and the list builder are written against it.

use crate::value::Scm;

macro_rules! define_primitives_trait {
    (
        [$($ctx:tt)*]
        $(constant $c:ident => $cm:ident;)*
        $(unary $u:ident => $um:ident($ua:ident) -> $ur:ident;)*
        $(binary $b:ident => $bm:ident($ba:ident, $bb:ident) -> $br:ident;)*
    ) => {
        /// Primitive operations of a runtime backend.
        ///
        /// Every method has a narrow contract: arguments must be well-formed
        /// values of this backend, and the result is whatever the primitive
        /// defines, unaltered.
        pub trait Primitives {
            $(
                #[doc = concat!("`", stringify!($c), "`")]
                fn $cm(&self) -> Scm;
            )*
            $(
                #[doc = concat!("`", stringify!($u), "(x)`")]
                fn $um(&self, x: crate::abi_ty!($ua)) -> crate::abi_ty!($ur);
            )*
            $(
                #[doc = concat!("`", stringify!($b), "(x, y)`")]
                fn $bm(&self, x: crate::abi_ty!($ba), y: crate::abi_ty!($bb)) -> crate::abi_ty!($br);
            )*
        }
    };
}

crate::for_each_primitive!(define_primitives_trait);
