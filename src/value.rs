//! Runtime value handle
//!
//! `Scm` is the only type that crosses the proxy boundary. It is a
//! pointer-sized token with the same ABI as C's `SCM`; the shim passes it
//! through without looking at its bits. Equality on the handle is word
//! identity, which is exactly what `scm_is_eq` tests.

use core::ffi::c_void;
use core::fmt;

/// Raw word behind a value (`scm_t_bits`, a `uintptr_t`)
pub type ScmBits = usize;

/// Opaque runtime value
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scm(*mut c_void);

impl Scm {
    /// Wrap a raw word.
    ///
    /// # Safety
    /// `bits` must be a well-formed value of the backend it will be handed
    /// to. Primitives trust their arguments; a forged word is undefined
    /// behaviour for the Guile backend.
    #[inline]
    pub const unsafe fn from_bits(bits: ScmBits) -> Self {
        Self(bits as *mut c_void)
    }

    /// Raw word, as `SCM_UNPACK` would return it
    #[inline]
    pub fn to_bits(self) -> ScmBits {
        self.0 as ScmBits
    }

    #[inline]
    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }
}

// Values are words; whether a backend tolerates them on another thread is
// the backend's contract, not the handle's.
unsafe impl Send for Scm {}
unsafe impl Sync for Scm {}

impl fmt::Debug for Scm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scm({:#x})", self.to_bits())
    }
}
