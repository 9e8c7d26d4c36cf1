//! Reference heap - test backend for the primitive ABI
//!
//! Exists so the proxy contracts and the list builder can be exercised
//! without libguile. It models only what those contracts observe; it is not
//! a Scheme runtime and is not meant to stand in for one outside tests and
//! benchmarks.
//!
//! Design: tagged words like the runtime it stands in for:
//! - Low bits `100`: immediates (`#f`, `#t`, `'()`, unspecified, undefined,
//!   unbound), code in bits 8 and up
//! - Low bits `000`, non-zero: index of a heap cell, shifted by 3
//!
//! Cells live in a table behind a `RwLock`; nothing is ever freed, so a
//! handle stays valid for the heap's lifetime. Symbols are interned so that
//! two symbols with the same name are `eq`.

pub mod abi;

use crate::primitives::Primitives;
use crate::value::{Scm, ScmBits};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::trace;

const TAG_MASK: ScmBits = 0b111;
const CELL_TAG: ScmBits = 0b000;
const IMMEDIATE_TAG: ScmBits = 0b100;
const IMMEDIATE_SHIFT: u32 = 8;
const CELL_SHIFT: u32 = 3;

const fn immediate(code: ScmBits) -> Scm {
    // Safety: immediates are well-formed by construction.
    unsafe { Scm::from_bits((code << IMMEDIATE_SHIFT) | IMMEDIATE_TAG) }
}

pub const FALSE: Scm = immediate(0);
pub const TRUE: Scm = immediate(1);
pub const EOL: Scm = immediate(2);
pub const UNSPECIFIED: Scm = immediate(3);
pub const UNDEFINED: Scm = immediate(4);
pub const UNBOUND: Scm = immediate(5);

#[derive(Debug, Clone)]
enum Cell {
    Pair { car: Scm, cdr: Scm },
    Symbol(String),
    String(String),
    Class { name: String, parent: Option<Scm> },
    Instance { class: Scm },
}

#[derive(Default)]
struct Cells {
    cells: Vec<Cell>,
    symbols: HashMap<String, Scm>,
}

impl Cells {
    fn alloc(&mut self, cell: Cell) -> Scm {
        self.cells.push(cell);
        let bits = self.cells.len() << CELL_SHIFT;
        trace!(index = self.cells.len() - 1, "cell allocated");
        // Safety: the word names the cell just pushed.
        unsafe { Scm::from_bits(bits) }
    }

    fn get(&self, value: Scm) -> Option<&Cell> {
        cell_index(value).and_then(|i| self.cells.get(i))
    }

    fn get_mut(&mut self, value: Scm) -> Option<&mut Cell> {
        cell_index(value).and_then(|i| self.cells.get_mut(i))
    }
}

fn cell_index(value: Scm) -> Option<usize> {
    let bits = value.to_bits();
    if bits & TAG_MASK != CELL_TAG || bits == 0 {
        return None;
    }
    Some((bits >> CELL_SHIFT) - 1)
}

/// In-process test backend
pub struct Heap {
    inner: RwLock<Cells>,
}

static GLOBAL: Lazy<Heap> = Lazy::new(Heap::new);

/// Process-wide heap, the backend behind [`abi`].
///
/// Cells are never freed, so everything allocated through it (every
/// `gu_scm_cons` and `gu_scm_list_n` call in [`abi`]) is retained until the
/// process exits. Use a scoped [`Heap`] for anything that allocates in a
/// loop.
pub fn global() -> &'static Heap {
    &GLOBAL
}

impl Heap {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Cells::default()),
        }
    }

    /// Intern a symbol.
    pub fn symbol(&self, name: &str) -> Scm {
        if let Some(sym) = self.inner.read().symbols.get(name) {
            return *sym;
        }

        let mut cells = self.inner.write();
        // Another writer may have interned it between the two locks.
        if let Some(sym) = cells.symbols.get(name) {
            return *sym;
        }
        let sym = cells.alloc(Cell::Symbol(name.to_string()));
        cells.symbols.insert(name.to_string(), sym);
        sym
    }

    /// Fresh string; never shared with an existing one.
    pub fn string(&self, text: &str) -> Scm {
        self.inner.write().alloc(Cell::String(text.to_string()))
    }

    /// A class, optionally inheriting from `parent`.
    pub fn make_class(&self, name: &str, parent: Option<Scm>) -> Scm {
        self.inner.write().alloc(Cell::Class {
            name: name.to_string(),
            parent,
        })
    }

    /// An instance of `class`.
    pub fn make_instance(&self, class: Scm) -> Scm {
        self.inner.write().alloc(Cell::Instance { class })
    }

    pub fn symbol_name(&self, value: Scm) -> Option<String> {
        match self.inner.read().get(value) {
            Some(Cell::Symbol(name)) => Some(name.clone()),
            _ => None,
        }
    }

    pub fn string_value(&self, value: Scm) -> Option<String> {
        match self.inner.read().get(value) {
            Some(Cell::String(text)) => Some(text.clone()),
            _ => None,
        }
    }

    pub fn class_name(&self, value: Scm) -> Option<String> {
        match self.inner.read().get(value) {
            Some(Cell::Class { name, .. }) => Some(name.clone()),
            _ => None,
        }
    }

    /// Number of cells allocated so far
    pub fn allocated(&self) -> usize {
        self.inner.read().cells.len()
    }

    fn pair(&self, value: Scm) -> Option<(Scm, Scm)> {
        match self.inner.read().get(value) {
            Some(Cell::Pair { car, cdr }) => Some((*car, *cdr)),
            _ => None,
        }
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Primitives for Heap {
    fn bool_f(&self) -> Scm {
        FALSE
    }

    fn bool_t(&self) -> Scm {
        TRUE
    }

    fn undefined(&self) -> Scm {
        UNDEFINED
    }

    fn unspecified(&self) -> Scm {
        UNSPECIFIED
    }

    fn eol(&self) -> Scm {
        EOL
    }

    fn unbound(&self) -> Scm {
        UNBOUND
    }

    fn unpack(&self, x: Scm) -> ScmBits {
        x.to_bits()
    }

    fn is_false(&self, x: Scm) -> bool {
        x == FALSE
    }

    // Everything but #f counts as true.
    fn is_true(&self, x: Scm) -> bool {
        x != FALSE
    }

    fn is_bool(&self, x: Scm) -> bool {
        x == FALSE || x == TRUE
    }

    fn is_null(&self, x: Scm) -> bool {
        x == EOL
    }

    fn is_pair(&self, x: Scm) -> bool {
        matches!(self.inner.read().get(x), Some(Cell::Pair { .. }))
    }

    fn is_symbol(&self, x: Scm) -> bool {
        matches!(self.inner.read().get(x), Some(Cell::Symbol(_)))
    }

    fn is_string(&self, x: Scm) -> bool {
        matches!(self.inner.read().get(x), Some(Cell::String(_)))
    }

    // SCM_UNBNDP tests for the undefined object, not SCM_UNBOUND.
    fn is_unbound(&self, x: Scm) -> bool {
        x == UNDEFINED
    }

    fn car(&self, x: Scm) -> Scm {
        match self.pair(x) {
            Some((car, _)) => car,
            None => panic!("wrong-type-arg: car of non-pair {:?}", x),
        }
    }

    fn cdr(&self, x: Scm) -> Scm {
        match self.pair(x) {
            Some((_, cdr)) => cdr,
            None => panic!("wrong-type-arg: cdr of non-pair {:?}", x),
        }
    }

    fn is_eq(&self, x: Scm, y: Scm) -> bool {
        x == y
    }

    fn is_a(&self, x: Scm, y: Scm) -> bool {
        let cells = self.inner.read();
        let mut class = match cells.get(x) {
            Some(Cell::Instance { class }) => Some(*class),
            _ => return false,
        };

        while let Some(current) = class {
            if current == y {
                return true;
            }
            class = match cells.get(current) {
                Some(Cell::Class { parent, .. }) => *parent,
                _ => None,
            };
        }
        false
    }

    fn cons(&self, x: Scm, y: Scm) -> Scm {
        self.inner.write().alloc(Cell::Pair { car: x, cdr: y })
    }

    fn set_cdr(&self, x: Scm, y: Scm) {
        match self.inner.write().get_mut(x) {
            Some(Cell::Pair { cdr, .. }) => *cdr = y,
            _ => panic!("wrong-type-arg: set-cdr! of non-pair {:?}", x),
        }
    }
}
