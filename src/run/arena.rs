// Atomic arenas.
// ==============
// The shared node arena holds one atomic pair cell per node; the shared
// variable arena holds one atomic port cell per variable. Both are
// relaxed-ordering only: correctness rests on single-writer ownership of
// each live cell plus the exchange in `take`, not on cross-cell ordering
// (spec.md §4.2, §5 "Ordering guarantees").

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use super::port::{Pair, Port, Val};

const ORD: Ordering = Ordering::Relaxed;

/// An atomic [`Port`] cell, used by the variable arena.
#[repr(transparent)]
pub struct APort(AtomicU32);

impl APort {
  #[inline(always)]
  pub fn new(port: Port) -> Self {
    APort(AtomicU32::new(port.0))
  }

  #[inline(always)]
  pub fn load(&self) -> Port {
    Port(self.0.load(ORD))
  }

  #[inline(always)]
  pub fn store(&self, port: Port) {
    self.0.store(port.0, ORD);
  }

  #[inline(always)]
  pub fn exchange(&self, port: Port) -> Port {
    Port(self.0.swap(port.0, ORD))
  }

  /// Exchange with the empty sentinel; returns the prior contents.
  #[inline(always)]
  pub fn take(&self) -> Port {
    self.exchange(Port(0))
  }

  #[inline(always)]
  pub fn is_free(&self) -> bool {
    self.load().is_nil()
  }
}

/// An atomic [`Pair`] cell, used by the node arena.
#[repr(transparent)]
pub struct APair(AtomicU64);

impl APair {
  #[inline(always)]
  pub fn new(pair: Pair) -> Self {
    APair(AtomicU64::new(pair.0))
  }

  #[inline(always)]
  pub fn load(&self) -> Pair {
    Pair(self.0.load(ORD))
  }

  #[inline(always)]
  pub fn store(&self, pair: Pair) {
    self.0.store(pair.0, ORD);
  }

  #[inline(always)]
  pub fn exchange(&self, pair: Pair) -> Pair {
    Pair(self.0.swap(pair.0, ORD))
  }

  /// Exchange with the empty sentinel; returns the prior contents.
  #[inline(always)]
  pub fn take(&self) -> Pair {
    self.exchange(Pair(0))
  }

  #[inline(always)]
  pub fn is_free(&self) -> bool {
    self.load().is_nil()
  }
}

/// The shared node arena: one atomic pair cell per node, indexed by a
/// `CON`/`DUP`/`OPR`/`SWI` port's value field.
pub struct NodeArena {
  cells: Box<[APair]>,
}

impl NodeArena {
  pub fn new(capacity: usize) -> Self {
    let mut cells = Vec::with_capacity(capacity);
    cells.resize_with(capacity, || APair::new(Pair(0)));
    NodeArena { cells: cells.into_boxed_slice() }
  }

  #[inline(always)]
  pub fn len(&self) -> usize {
    self.cells.len()
  }

  #[inline(always)]
  pub fn get(&self, loc: Val) -> &APair {
    &self.cells[loc as usize]
  }

  #[inline(always)]
  pub fn load(&self, loc: Val) -> Pair {
    self.get(loc).load()
  }

  #[inline(always)]
  pub fn store(&self, loc: Val, pair: Pair) {
    self.get(loc).store(pair)
  }

  #[inline(always)]
  pub fn take(&self, loc: Val) -> Pair {
    self.get(loc).take()
  }

  #[inline(always)]
  pub fn is_free(&self, loc: Val) -> bool {
    self.get(loc).is_free()
  }
}

/// The shared variable arena: one atomic port cell per variable, indexed by
/// a `VAR` port's value field.
pub struct VarArena {
  cells: Box<[APort]>,
}

impl VarArena {
  pub fn new(capacity: usize) -> Self {
    let mut cells = Vec::with_capacity(capacity);
    cells.resize_with(capacity, || APort::new(Port(0)));
    VarArena { cells: cells.into_boxed_slice() }
  }

  #[inline(always)]
  pub fn len(&self) -> usize {
    self.cells.len()
  }

  #[inline(always)]
  pub fn get(&self, var: Val) -> &APort {
    &self.cells[var as usize]
  }

  #[inline(always)]
  pub fn load(&self, var: Val) -> Port {
    self.get(var).load()
  }

  #[inline(always)]
  pub fn store(&self, var: Val, port: Port) {
    self.get(var).store(port)
  }

  #[inline(always)]
  pub fn exchange(&self, var: Val, port: Port) -> Port {
    self.get(var).exchange(port)
  }

  #[inline(always)]
  pub fn take(&self, var: Val) -> Port {
    self.get(var).take()
  }

  #[inline(always)]
  pub fn is_free(&self, var: Val) -> bool {
    self.get(var).is_free()
  }
}
