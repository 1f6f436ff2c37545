// Bundled example book.
// =====================
// The reference prototype hard-codes one example `Book` directly in
// `main()` to exercise the engine end-to-end: a `fun`/`loop` pair of
// recursive definitions, parameterized by `DEPTH` and `LOOPS`, used only as
// fixture data (spec.md §6 "Bundled example book", scenario 5 of §8). Built
// here programmatically from the same template layout, not as a raw hex
// dump.
//
// Definition ids, in book order: `fun`=0, `fun$C0`=1, `fun$C1`=2, `loop`=3,
// `loop$C0`=4, `main`=5.

use crate::book::{tnode, tvar, Book, Def};
use crate::error::BookError;
use crate::run::port::{Port, Tag};

/// The reference prototype's defaults: `loop` unrolls `DEPTH` times, each
/// doing `LOOPS` units of busy-work via `fun`.
pub const DEFAULT_DEPTH: u32 = 10;
pub const DEFAULT_LOOPS: u32 = 65536;

/// Index of `main` in [`book`]'s definition table — the call to seed.
pub const MAIN: u32 = 5;

/// The boot redex: a call to `main` against the reserved root variable
/// (index 0, pre-zeroed to its own self-reference), pushed straight into
/// thread 0's bag rather than linked (mirrors the reference prototype's
/// `push_redex(tm[0], new_pair(new_port(REF, 5), new_port(VAR, 0)))`).
pub fn seed() -> (Port, Port) {
  (Port::new(Tag::Ref, MAIN), Port::new(Tag::Var, 0))
}

#[inline(always)]
fn num(v: u32) -> Port {
  Port::new(Tag::Num, v)
}

/// Builds the bundled `fun`/`loop`/`main` book, parameterized the way the
/// prototype's `DEPTH`/`LOOPS` constants parameterize it.
pub fn book(depth: u32, loops: u32) -> Result<Book, BookError> {
  let fun = Def {
    rdex: vec![],
    node: vec![
      (tnode(Tag::Con, 1), tvar(0)),
      (tnode(Tag::Swi, 3), tvar(0)),
      (Port::new(Tag::Ref, 1), Port::new(Tag::Ref, 2)),
      (tnode(Tag::Con, 2), tvar(0)),
    ],
    vars_len: 1,
  };

  let fun_c0 = Def {
    rdex: vec![(Port::new(Tag::Ref, 3), tnode(Tag::Con, 1))],
    node: vec![(tvar(0), tvar(0)), (num(loops), tvar(0))],
    vars_len: 1,
  };

  let fun_c1 = Def {
    rdex: vec![(Port::new(Tag::Ref, 0), tnode(Tag::Con, 3)), (Port::new(Tag::Ref, 0), tnode(Tag::Con, 5))],
    node: vec![
      (tnode(Tag::Con, 1), tvar(0)),
      (tnode(Tag::Dup, 2), tvar(2)),
      (tvar(0), tvar(1)),
      (tvar(0), tnode(Tag::Opr, 4)),
      (tvar(3), tvar(2)),
      (tvar(1), tvar(3)),
    ],
    vars_len: 4,
  };

  let the_loop = Def {
    rdex: vec![],
    node: vec![
      (tnode(Tag::Con, 1), tvar(0)),
      (tnode(Tag::Swi, 3), tvar(0)),
      (num(0), Port::new(Tag::Ref, 4)),
      (tnode(Tag::Con, 2), tvar(0)),
    ],
    vars_len: 1,
  };

  let loop_c0 = Def {
    rdex: vec![(Port::new(Tag::Ref, 3), tnode(Tag::Con, 2))],
    node: vec![(tnode(Tag::Con, 1), tvar(0)), (tvar(0), tvar(1)), (tvar(0), tvar(1))],
    vars_len: 2,
  };

  let main = Def {
    rdex: vec![(Port::new(Tag::Ref, 0), tnode(Tag::Con, 1))],
    node: vec![(tvar(0), tvar(0)), (num(depth), tvar(0))],
    vars_len: 1,
  };

  Book::new(vec![fun, fun_c0, fun_c1, the_loop, loop_c0, main])
}
