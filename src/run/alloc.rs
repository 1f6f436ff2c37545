// Allocator.
// ==========
// Each thread keeps two rolling cursors, one into the node arena and one
// into the variable arena, seeded at disjoint offsets (the thread id) so
// sibling threads don't immediately collide. Allocating `n` slots advances
// the cursor one step at a time, wrapping modulo the arena length, and
// records each index whose cell is currently empty. The allocator never
// clears a cell; it only finds empties (spec.md §4.4).

use arrayvec::ArrayVec;

use super::arena::{NodeArena, VarArena};
use super::port::Val;

/// Template node/redex arrays are capped at 32 entries (spec.md §6), so a
/// single interaction never needs more than 32 fresh slots at once.
pub const MAX_BATCH: usize = 32;

/// A thread's rolling allocation cursor plus scratch space for the most
/// recent batch of allocated indices.
pub struct Cursor {
  node_idx: Val,
  vars_idx: Val,
  pub node_loc: ArrayVec<Val, MAX_BATCH>,
  pub vars_loc: ArrayVec<Val, MAX_BATCH>,
}

impl Cursor {
  pub fn new(tid: usize) -> Self {
    Cursor { node_idx: tid as Val, vars_idx: tid as Val, node_loc: ArrayVec::new(), vars_loc: ArrayVec::new() }
  }

  /// Scans the node arena for `need` free slots, recording them into
  /// `node_loc`. Returns the number actually found (may be less than
  /// `need` if the arena is exhausted).
  pub fn alloc_nodes(&mut self, arena: &NodeArena, need: usize) -> usize {
    self.node_loc.clear();
    let len = arena.len() as Val;
    for _ in 0..len {
      if self.node_loc.len() >= need {
        break;
      }
      self.node_idx = (self.node_idx + 1) % len;
      if arena.is_free(self.node_idx) {
        self.node_loc.push(self.node_idx);
      }
    }
    self.node_loc.len()
  }

  /// Scans the variable arena for `need` free slots, recording them into
  /// `vars_loc`.
  pub fn alloc_vars(&mut self, arena: &VarArena, need: usize) -> usize {
    self.vars_loc.clear();
    let len = arena.len() as Val;
    for _ in 0..len {
      if self.vars_loc.len() >= need {
        break;
      }
      self.vars_idx = (self.vars_idx + 1) % len;
      if arena.is_free(self.vars_idx) {
        self.vars_loc.push(self.vars_idx);
      }
    }
    self.vars_loc.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn allocates_disjoint_slots_until_need_met() {
    let arena = NodeArena::new(8);
    let mut cur = Cursor::new(0);
    let got = cur.alloc_nodes(&arena, 3);
    assert_eq!(got, 3);
    assert_eq!(cur.node_loc.len(), 3);
    let set: std::collections::HashSet<_> = cur.node_loc.iter().collect();
    assert_eq!(set.len(), 3);
  }

  #[test]
  fn reports_short_allocation_when_arena_full() {
    let arena = NodeArena::new(2);
    // Fill both slots.
    arena.store(0, super::super::port::Pair::new(
      super::super::port::Port::new(super::super::port::Tag::Con, 0),
      super::super::port::Port::new(super::super::port::Tag::Con, 0),
    ));
    arena.store(1, super::super::port::Pair::new(
      super::super::port::Port::new(super::super::port::Tag::Con, 0),
      super::super::port::Port::new(super::super::port::Tag::Con, 0),
    ));
    let mut cur = Cursor::new(0);
    let got = cur.alloc_nodes(&arena, 1);
    assert_eq!(got, 0);
  }
}
