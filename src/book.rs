// Book: the compiler's output, consumed read-only by the evaluator.
// ===================================================================
// A `Def` is a closed net template: a handful of seed redexes and node
// cells, addressed by template-local indices, plus a variable count. `CALL`
// rewrites a template into arena slots by adjusting every internal port
// (spec.md §4.6, §6). Definitions never change after `Book::new` validates
// them, so no synchronization is needed to read a `Book` from many threads.

use crate::error::BookError;
use crate::run::alloc::{Cursor, MAX_BATCH};
use crate::run::port::{Port, Tag, Val};

/// A single top-level definition: a closed net template.
///
/// `node[0]` is the root; its `fst` port is what binds to the call site's
/// partner. A node-tagged port with value `v` inside a template refers to
/// `node[v]` (so `v == 0` addresses the root itself, and `v >= 1` addresses
/// the `v - 1`-th freshly allocated node).
#[derive(Clone, Debug)]
pub struct Def {
  pub rdex: Vec<(Port, Port)>,
  pub node: Vec<(Port, Port)>,
  pub vars_len: u32,
}

impl Def {
  /// Rewrites a template-local port into an arena-addressed one, using the
  /// slots a `CALL` just allocated into `cursor`. `VAR i` becomes
  /// `VAR vars_loc[i]`; a node-tagged port with value `v >= 1` becomes
  /// the same tag at `node_loc[v - 1]`; value `0` (the root) and non-node
  /// tags pass through unchanged.
  #[inline(always)]
  pub fn adjust(&self, cursor: &Cursor, port: Port) -> Port {
    match port.tag() {
      Tag::Var => Port::new(Tag::Var, cursor.vars_loc[port.val() as usize]),
      tag if tag.is_node() && port.val() > 0 => Port::new(tag, cursor.node_loc[(port.val() - 1) as usize]),
      _ => port,
    }
  }
}

/// The ordered table of definitions, indexed by a `REF` port's value field.
pub struct Book {
  pub defs: Vec<Def>,
}

impl Book {
  /// Validates every definition against the 32-slot template cap and
  /// in-bounds indices, then wraps the table. Checked once, not per call
  /// (spec.md §7).
  pub fn new(defs: Vec<Def>) -> Result<Self, BookError> {
    for (id, def) in defs.iter().enumerate() {
      if def.rdex.len() > MAX_BATCH {
        return Err(BookError::TooManyRedexes { def: id, len: def.rdex.len() });
      }
      if def.node.len() > MAX_BATCH + 1 {
        return Err(BookError::TooManyNodes { def: id, len: def.node.len() });
      }
      let node_bound = def.node.len();
      let vars_bound = def.vars_len;
      let check_port = |port: Port| -> Result<(), BookError> {
        match port.tag() {
          Tag::Var if port.val() >= vars_bound => {
            Err(BookError::VarIndexOutOfBounds { def: id, index: port.val(), bound: vars_bound as usize })
          }
          tag if tag.is_node() && port.val() as usize >= node_bound => {
            Err(BookError::NodeIndexOutOfBounds { def: id, index: port.val(), bound: node_bound })
          }
          _ => Ok(()),
        }
      };
      for &(p1, p2) in def.rdex.iter().chain(def.node.iter()) {
        check_port(p1)?;
        check_port(p2)?;
      }
    }
    Ok(Book { defs })
  }

  #[inline(always)]
  pub fn len(&self) -> usize {
    self.defs.len()
  }

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.defs.is_empty()
  }
}

/// A template-local variable reference, for building `Def`s by hand.
#[inline(always)]
pub const fn tvar(i: Val) -> Port {
  Port::new(Tag::Var, i)
}

/// A template-local reference to the `i`-th node (1-based; `0` is the root).
#[inline(always)]
pub const fn tnode(tag: Tag, i: Val) -> Port {
  Port::new(tag, i)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::run::port::ERAS;

  #[test]
  fn rejects_out_of_bounds_var_index() {
    let defs = vec![Def { rdex: vec![], node: vec![(tvar(5), ERAS)], vars_len: 1 }];
    assert!(matches!(Book::new(defs), Err(BookError::VarIndexOutOfBounds { .. })));
  }

  #[test]
  fn accepts_a_well_formed_definition() {
    let defs = vec![Def { rdex: vec![], node: vec![(tvar(0), ERAS)], vars_len: 1 }];
    let book = Book::new(defs).unwrap();
    assert_eq!(book.len(), 1);
  }
}
