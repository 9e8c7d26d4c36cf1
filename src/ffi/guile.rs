//! Guile backend - `Primitives` over the compiled C proxies

use super::sys;
use crate::list;
use crate::primitives::Primitives;
use crate::value::Scm;
use core::ffi::c_void;
use core::marker::PhantomData;
use tracing::debug;

/// Token for a thread that is in Guile mode.
///
/// Not `Send`: Guile mode is per thread, so the token stays where it was
/// obtained.
pub struct Guile {
    _thread_bound: PhantomData<*mut ()>,
}

impl Guile {
    /// Put the current thread in Guile mode, booting the runtime on first use.
    pub fn init() -> Self {
        unsafe { sys::scm_init_guile() };
        debug!("thread entered guile mode");
        Self { _thread_bound: PhantomData }
    }

    /// Token for a thread the caller knows is already in Guile mode.
    ///
    /// # Safety
    /// The current thread must be in Guile mode for as long as the token is
    /// used.
    pub unsafe fn assume_entered() -> Self {
        Self { _thread_bound: PhantomData }
    }

    /// Run `f` in Guile mode for the duration of the call.
    ///
    /// Returns `None` if `f` did not complete, i.e. Guile unwound out of it.
    /// `f` must not panic: the unwind would cross a C frame and abort.
    pub fn with<F, R>(f: F) -> Option<R>
    where
        F: FnOnce(&Guile) -> R,
    {
        struct Call<F, R> {
            f: Option<F>,
            ret: Option<R>,
        }

        unsafe extern "C" fn trampoline<F, R>(data: *mut c_void) -> *mut c_void
        where
            F: FnOnce(&Guile) -> R,
        {
            let call = unsafe { &mut *(data as *mut Call<F, R>) };
            if let Some(f) = call.f.take() {
                let guile = unsafe { Guile::assume_entered() };
                call.ret = Some(f(&guile));
            }
            core::ptr::null_mut()
        }

        let mut call = Call { f: Some(f), ret: None };
        unsafe {
            sys::scm_with_guile(
                Some(trampoline::<F, R>),
                &mut call as *mut Call<F, R> as *mut c_void,
            );
        }
        call.ret
    }

    pub fn symbol(&self, name: &str) -> Scm {
        unsafe { sys::scm_from_utf8_symboln(name.as_ptr().cast(), name.len()) }
    }

    pub fn string(&self, text: &str) -> Scm {
        unsafe { sys::scm_from_utf8_stringn(text.as_ptr().cast(), text.len()) }
    }
}

macro_rules! impl_primitives_via_sys {
    (
        [$($ctx:tt)*]
        $(constant $c:ident => $cm:ident;)*
        $(unary $u:ident => $um:ident($ua:ident) -> $ur:ident;)*
        $(binary $b:ident => $bm:ident($ba:ident, $bb:ident) -> $br:ident;)*
    ) => {
        paste::paste! {
            impl Primitives for Guile {
                $(
                    fn $cm(&self) -> Scm {
                        unsafe { sys::[<gu_ $c>]() }
                    }
                )*
                $(
                    fn $um(&self, x: crate::abi_ty!($ua)) -> crate::abi_ty!($ur) {
                        unsafe { sys::[<gu_ $u>](x) }
                    }
                )*
                $(
                    fn $bm(&self, x: crate::abi_ty!($ba), y: crate::abi_ty!($bb)) -> crate::abi_ty!($br) {
                        unsafe { sys::[<gu_ $b>](x, y) }
                    }
                )*
            }
        }
    };
}

crate::for_each_primitive!(impl_primitives_via_sys);

/// Build a list from an array terminated by `SCM_UNDEFINED`.
///
/// # Safety
/// The calling thread must be in Guile mode, and `elts` must end with the
/// value returned by `gu_SCM_UNDEFINED()`.
#[no_mangle]
pub unsafe extern "C" fn gu_scm_list_n(elts: *const Scm) -> Scm {
    let guile = unsafe { Guile::assume_entered() };
    unsafe { list::list_n(&guile, elts) }
}
