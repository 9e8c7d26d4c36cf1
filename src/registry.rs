//! Primitive registry - the single source of every proxy surface
//!
//! Design: one declarative list of (C name, method name, argument kinds,
//! return kind) tuples, exposed as a callback macro. Everything that has to
//! agree with the runtime's signatures is expanded from it:
//! 1. `Primitives` trait methods
//! 2. The C proxy translation unit and header (via `PRIMITIVES`)
//! 3. `extern "C"` declarations for the compiled shim
//! 4. Rust-side proxies over an arbitrary backend
//!
//! This file is also compiled into `build.rs`, so it must not reach into
//! other crate modules except `error`.

use crate::error::{RegistryError, ShimError};
use std::collections::HashSet;
use std::fmt;

/// Prefix carried by every exported proxy symbol.
pub const PROXY_PREFIX: &str = "gu_";

/// Hand-written variadic list constructor exported next to the proxies.
pub const LIST_N_SYMBOL: &str = "gu_scm_list_n";

/// No-op entry point used to smoke-test the link path.
pub const DIAGNOSTIC_SYMBOL: &str = "gu_test_func";

/// Invokes `$callback!` with every primitive the shim republishes.
///
/// Entries are grouped by arity: `constant`, then `unary`, then `binary`.
/// Extra tokens in brackets are forwarded to the callback first, which lets
/// callbacks receive context such as a backend path.
///
/// Kinds: `value` (`SCM`), `truth` (`bool`), `bits` (`scm_t_bits`), `unit`.
#[macro_export]
macro_rules! for_each_primitive {
    ($callback:ident) => {
        $crate::for_each_primitive!($callback []);
    };
    ($callback:ident [$($ctx:tt)*]) => {
        $callback! {
            [$($ctx)*]

            constant SCM_BOOL_F => bool_f;
            constant SCM_BOOL_T => bool_t;
            constant SCM_UNDEFINED => undefined;
            constant SCM_UNSPECIFIED => unspecified;
            constant SCM_EOL => eol;
            constant SCM_UNBOUND => unbound;

            unary SCM_UNPACK => unpack(value) -> bits;
            unary scm_is_false => is_false(value) -> truth;
            unary scm_is_true => is_true(value) -> truth;
            unary scm_is_bool => is_bool(value) -> truth;
            unary scm_is_null => is_null(value) -> truth;
            unary scm_is_pair => is_pair(value) -> truth;
            unary scm_is_symbol => is_symbol(value) -> truth;
            unary scm_is_string => is_string(value) -> truth;
            unary SCM_UNBNDP => is_unbound(value) -> truth;
            unary scm_car => car(value) -> value;
            unary scm_cdr => cdr(value) -> value;

            binary scm_is_eq => is_eq(value, value) -> truth;
            binary SCM_IS_A_P => is_a(value, value) -> truth;
            binary scm_cons => cons(value, value) -> value;
            binary SCM_SETCDR => set_cdr(value, value) -> unit;
        }
    };
}

/// Maps a registry kind to the Rust type used at the ABI boundary.
#[macro_export]
macro_rules! abi_ty {
    (value) => { $crate::value::Scm };
    (truth) => { bool };
    (bits) => { $crate::value::ScmBits };
    (unit) => { () };
}

/// Argument and return categories a primitive may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A runtime value (`SCM`)
    Value,
    /// The canonical truth value (C99 `bool`)
    Truth,
    /// The raw word behind a value (`scm_t_bits`)
    Bits,
    /// No value
    Unit,
}

impl Kind {
    /// C spelling used by the generated translation unit.
    pub const fn c_type(self) -> &'static str {
        match self {
            Self::Value => "SCM",
            Self::Truth => "bool",
            Self::Bits => "scm_t_bits",
            Self::Unit => "void",
        }
    }

    /// Rust spelling used in generated declarations and listings.
    pub const fn rust_type(self) -> &'static str {
        match self {
            Self::Value => "Scm",
            Self::Truth => "bool",
            Self::Bits => "ScmBits",
            Self::Unit => "()",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Truth => "truth",
            Self::Bits => "bits",
            Self::Unit => "unit",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Primitive {
    /// Name of the macro or inline function in the runtime's headers
    pub name: &'static str,
    /// Method name on `Primitives`
    pub method: &'static str,
    pub args: &'static [Kind],
    pub ret: Kind,
}

impl Primitive {
    pub const fn new(
        name: &'static str,
        method: &'static str,
        args: &'static [Kind],
        ret: Kind,
    ) -> Self {
        Self { name, method, args, ret }
    }

    #[inline]
    pub const fn arity(&self) -> usize {
        self.args.len()
    }

    /// A nullary primitive is a constant: the generated body names it
    /// without calling it.
    #[inline]
    pub const fn is_constant(&self) -> bool {
        self.args.is_empty()
    }

    /// Exported proxy symbol, e.g. `gu_scm_is_pair`.
    pub fn symbol(&self) -> String {
        format!("{}{}", PROXY_PREFIX, self.name)
    }

    /// Human-readable Rust signature, e.g. `fn gu_scm_cons(Scm, Scm) -> Scm`.
    pub fn signature(&self) -> String {
        let args: Vec<&str> = self.args.iter().map(|k| k.rust_type()).collect();
        format!("fn {}({}) -> {}", self.symbol(), args.join(", "), self.ret.rust_type())
    }
}

macro_rules! kind {
    (value) => { Kind::Value };
    (truth) => { Kind::Truth };
    (bits) => { Kind::Bits };
    (unit) => { Kind::Unit };
}

macro_rules! define_table {
    (
        [$($ctx:tt)*]
        $(constant $c:ident => $cm:ident;)*
        $(unary $u:ident => $um:ident($ua:ident) -> $ur:ident;)*
        $(binary $b:ident => $bm:ident($ba:ident, $bb:ident) -> $br:ident;)*
    ) => {
        /// Every primitive republished by the shim, in registry order.
        pub static PRIMITIVES: &[Primitive] = &[
            $(Primitive::new(stringify!($c), stringify!($cm), &[], Kind::Value),)*
            $(Primitive::new(stringify!($u), stringify!($um), &[kind!($ua)], kind!($ur)),)*
            $(Primitive::new(stringify!($b), stringify!($bm), &[kind!($ba), kind!($bb)], kind!($br)),)*
        ];
    };
}

crate::for_each_primitive!(define_table);

/// Look up a registry entry by its runtime name.
pub fn find(name: &str) -> Option<&'static Primitive> {
    PRIMITIVES.iter().find(|p| p.name == name)
}

/// Like [`find`], accepting either the runtime name or the `gu_` symbol.
pub fn lookup(name: &str) -> Result<&'static Primitive, ShimError> {
    let bare = name.strip_prefix(PROXY_PREFIX).unwrap_or(name);
    find(bare).ok_or_else(|| ShimError::UnknownPrimitive(name.to_string()))
}

/// Every symbol the shim exports, generated proxies first.
pub fn exported_symbols() -> Vec<String> {
    PRIMITIVES
        .iter()
        .map(Primitive::symbol)
        .chain([LIST_N_SYMBOL.to_string(), DIAGNOSTIC_SYMBOL.to_string()])
        .collect()
}

/// Check a registry against the shapes the generators can express.
///
/// Run by `build.rs` so a bad entry fails the build rather than producing a
/// proxy with the wrong signature.
pub fn validate(primitives: &[Primitive]) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();

    for p in primitives {
        if !seen.insert(p.name) {
            return Err(RegistryError::Duplicate(p.name.to_string()));
        }
        if p.arity() > 2 {
            return Err(RegistryError::Arity {
                name: p.name.to_string(),
                arity: p.arity(),
            });
        }
        if p.is_constant() && p.ret != Kind::Value {
            return Err(RegistryError::ConstantKind(p.name.to_string()));
        }
        if let Some(kind) = p.args.iter().find(|k| **k != Kind::Value) {
            return Err(RegistryError::ArgumentKind {
                name: p.name.to_string(),
                kind: *kind,
            });
        }
    }

    Ok(())
}
