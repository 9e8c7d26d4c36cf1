//! Variadic list construction and traversal
//!
//! Design: lists are built front to back by linking each new pair at the
//! tail of the list so far. The input is terminated by the undefined object
//! (`SCM_UNDEFINED`, the value `SCM_UNBNDP` recognises) rather than
//! length-prefixed, so the length is only known once the scan reaches the
//! marker; appending at the tail keeps that a single pass.

use crate::primitives::Primitives;
use crate::value::Scm;
use tracing::trace;

/// Incremental append-at-tail list builder
///
/// Every pair is allocated by the backend's `cons`; the builder only keeps
/// handles to the head and the last pair.
pub struct ListBuilder<'r, R: Primitives + ?Sized> {
    rt: &'r R,
    head: Scm,
    tail: Option<Scm>,
    len: usize,
}

impl<'r, R: Primitives + ?Sized> ListBuilder<'r, R> {
    pub fn new(rt: &'r R) -> Self {
        Self {
            rt,
            head: rt.eol(),
            tail: None,
            len: 0,
        }
    }

    /// Append one element.
    pub fn push(&mut self, value: Scm) {
        let cell = self.rt.cons(value, self.rt.eol());
        match self.tail {
            None => self.head = cell,
            Some(last) => self.rt.set_cdr(last, cell),
        }
        self.tail = Some(cell);
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The finished list; `'()` when nothing was pushed.
    pub fn finish(self) -> Scm {
        trace!(len = self.len, "list built");
        self.head
    }
}

impl<R: Primitives + ?Sized> Extend<Scm> for ListBuilder<'_, R> {
    fn extend<I: IntoIterator<Item = Scm>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

/// Build a proper list from any sequence of values.
pub fn list_from_iter<R, I>(rt: &R, values: I) -> Scm
where
    R: Primitives + ?Sized,
    I: IntoIterator<Item = Scm>,
{
    let mut builder = ListBuilder::new(rt);
    builder.extend(values);
    builder.finish()
}

/// Sentinel-terminated sequence view
///
/// Yields values from a raw array until the first value for which the
/// backend's `is_unbound` (`SCM_UNBNDP`) holds, i.e. `SCM_UNDEFINED`. The
/// marker itself is never yielded and nothing after it is read.
pub struct Terminated<'r, R: Primitives + ?Sized> {
    rt: &'r R,
    cursor: *const Scm,
    done: bool,
}

impl<'r, R: Primitives + ?Sized> Terminated<'r, R> {
    /// # Safety
    /// `elts` must point to an array of well-formed values whose last
    /// element is the undefined object (`SCM_UNDEFINED`). A missing marker makes
    /// the scan run off the end of the array: undefined behaviour.
    pub unsafe fn new(rt: &'r R, elts: *const Scm) -> Self {
        Self {
            rt,
            cursor: elts,
            done: false,
        }
    }
}

impl<R: Primitives + ?Sized> Iterator for Terminated<'_, R> {
    type Item = Scm;

    fn next(&mut self) -> Option<Scm> {
        if self.done {
            return None;
        }

        // Safety: the constructor's contract guarantees every slot up to and
        // including the marker is readable; `done` stops us at the marker.
        let value = unsafe { self.cursor.read() };
        if self.rt.is_unbound(value) {
            self.done = true;
            return None;
        }

        self.cursor = unsafe { self.cursor.add(1) };
        Some(value)
    }
}

/// Build a list from a sentinel-terminated array (`scm_list_n` shape).
///
/// # Safety
/// Same contract as [`Terminated::new`]: the array must end with
/// `SCM_UNDEFINED`.
pub unsafe fn list_n<R: Primitives + ?Sized>(rt: &R, elts: *const Scm) -> Scm {
    list_from_iter(rt, unsafe { Terminated::new(rt, elts) })
}

/// Bounded variant of [`list_n`] for values already in a slice.
///
/// Elements up to the first `SCM_UNDEFINED` form the list. Returns `None`
/// when the slice holds no marker instead of reading past its end.
pub fn list_from_terminated<R: Primitives + ?Sized>(rt: &R, elts: &[Scm]) -> Option<Scm> {
    let end = elts.iter().position(|v| rt.is_unbound(*v))?;
    Some(list_from_iter(rt, elts[..end].iter().copied()))
}

/// Iterator over the elements of a list by repeated `car`/`cdr`
///
/// Stops at the first non-pair, so an improper tail is not yielded.
pub struct ListIter<'r, R: Primitives + ?Sized> {
    rt: &'r R,
    rest: Scm,
}

impl<R: Primitives + ?Sized> Iterator for ListIter<'_, R> {
    type Item = Scm;

    fn next(&mut self) -> Option<Scm> {
        if !self.rt.is_pair(self.rest) {
            return None;
        }
        let head = self.rt.car(self.rest);
        self.rest = self.rt.cdr(self.rest);
        Some(head)
    }
}

pub fn iter_list<R: Primitives + ?Sized>(rt: &R, list: Scm) -> ListIter<'_, R> {
    ListIter { rt, rest: list }
}

/// Number of pairs reachable by following `cdr`.
pub fn list_length<R: Primitives + ?Sized>(rt: &R, list: Scm) -> usize {
    iter_list(rt, list).count()
}
