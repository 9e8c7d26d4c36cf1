//! Proxy generation over a Rust backend
//!
//! Design: `for_each_primitive!(define_proxies [backend])` expands to one
//! `extern "C"` function per registry entry, named `gu_` + the primitive's
//! name, whose body is a single forwarded call. The backend expression must
//! evaluate to a `&'static` implementation of `Primitives`.
//!
//! The Guile build does not use this: its proxies come from the generated C
//! translation unit, because the primitives there only exist as C macros.

/// Expand the `gu_*` proxy surface over a backend expression.
///
/// Invoke through the registry so the set of proxies always matches it:
///
/// ```ignore
/// guile_shim::for_each_primitive!(define_proxies [my_backend()]);
/// ```
///
/// Also emits `gu_scm_list_n` over the same backend.
#[macro_export]
macro_rules! define_proxies {
    (
        [$backend:expr]
        $(constant $c:ident => $cm:ident;)*
        $(unary $u:ident => $um:ident($ua:ident) -> $ur:ident;)*
        $(binary $b:ident => $bm:ident($ba:ident, $bb:ident) -> $br:ident;)*
    ) => {
        $crate::paste::paste! {
            $(
                #[allow(non_snake_case)]
                #[doc = concat!("Proxy for `", stringify!($c), "`.")]
                pub extern "C" fn [<gu_ $c>]() -> $crate::value::Scm {
                    $crate::primitives::Primitives::$cm($backend)
                }
            )*
            $(
                #[allow(non_snake_case)]
                #[doc = concat!("Proxy for `", stringify!($u), "`.")]
                pub extern "C" fn [<gu_ $u>](x: $crate::abi_ty!($ua)) -> $crate::abi_ty!($ur) {
                    $crate::primitives::Primitives::$um($backend, x)
                }
            )*
            $(
                #[allow(non_snake_case)]
                #[doc = concat!("Proxy for `", stringify!($b), "`.")]
                pub extern "C" fn [<gu_ $b>](
                    x: $crate::abi_ty!($ba),
                    y: $crate::abi_ty!($bb),
                ) -> $crate::abi_ty!($br) {
                    $crate::primitives::Primitives::$bm($backend, x, y)
                }
            )*
        }

        /// Build a list from an array terminated by `SCM_UNDEFINED`.
        ///
        /// # Safety
        /// `elts` must end with `SCM_UNDEFINED` (`gu_SCM_UNDEFINED()`).
        pub unsafe extern "C" fn gu_scm_list_n(
            elts: *const $crate::value::Scm,
        ) -> $crate::value::Scm {
            unsafe { $crate::list::list_n($backend, elts) }
        }
    };
}
