// Interaction rules.
// ==================
// The eight rewrites a redex can trigger. Each is guarded by a resource
// check (`TMem::get_resources`); if resources are short, the rule aborts
// without mutating anything observable and the caller re-pushes the redex.
// Rules that consume node cells `load` them first and bail if another
// thread already took the cell, then `take` (exchange-with-zero) for real.
// Every outgoing edge is posted through `linker::link`, never written raw
// (spec.md §4.6).

use crate::book::Book;
use crate::run::linker::link;
use crate::run::port::{should_swap, Port, Rule, Tag, ERAS};

use super::net::TMem;

/// Performs one interaction for the pair `(a, b)`, after resource
/// reservation. Returns whether it succeeded; on failure the caller must
/// re-push `(a, b)` onto its bag unchanged.
pub fn interact(tm: &mut TMem, book: &Book, a: Port, b: Port) -> bool {
  // Pre-dispatch fixup: a REF pointing at a free VAR is a pending call, not
  // a VOID/LINK — this takes priority over the rule table and over
  // `should_swap` (spec.md §4.6, §9 "the fixup as authoritative").
  let (rule, a, b) = if a.tag() == Tag::Ref && b.tag() == Tag::Var {
    (Rule::Call, a, b)
  } else {
    let rule = super::port::get_rule(a, b);
    if should_swap(a, b) { (rule, b, a) } else { (rule, a, b) }
  };

  match rule {
    Rule::Link => interact_link(tm, a, b),
    Rule::Call => interact_call(tm, book, a, b),
    Rule::Void => interact_void(tm, a, b),
    Rule::Eras => interact_eras(tm, a, b),
    Rule::Anni => interact_anni(tm, a, b),
    Rule::Comm => interact_comm(tm, a, b),
    Rule::Oper => interact_oper(tm, a, b),
    Rule::Swit => interact_swit(tm, a, b),
  }
}

fn interact_link(tm: &mut TMem, a: Port, b: Port) -> bool {
  if !tm.get_resources(1, 0, 0) {
    return false;
  }
  tm.rwts.link += 1;
  link(tm.vars, &mut tm.bag, a, b);
  true
}

fn interact_call(tm: &mut TMem, book: &Book, a: Port, b: Port) -> bool {
  let def = &book.defs[a.val() as usize];

  if !tm.get_resources(def.rdex.len() + 1, def.node.len().saturating_sub(1), def.vars_len as usize) {
    return false;
  }
  tm.rwts.call += 1;

  // Fresh variables, each initialized to its own self-reference.
  for i in 0..def.vars_len as usize {
    let loc = tm.cursor.vars_loc[i];
    tm.vars.store(loc, Port::new(Tag::Var, loc));
  }

  // Node templates, adjusted from template-local indices to arena indices.
  // The first template node is the root and is never separately allocated —
  // it's the call site itself.
  for (i, template) in def.node.iter().enumerate().skip(1) {
    let loc = tm.cursor.node_loc[i - 1];
    let p1 = def.adjust(&tm.cursor, template.0);
    let p2 = def.adjust(&tm.cursor, template.1);
    tm.nodes.store(loc, super::port::Pair::new(p1, p2));
  }

  // Bind the root's first port to the call's partner, then fire every seed
  // redex the definition bundles.
  let root_port = def.adjust(&tm.cursor, def.node[0].0);
  link(tm.vars, &mut tm.bag, b, root_port);
  for redex in &def.rdex {
    let p1 = def.adjust(&tm.cursor, redex.0);
    let p2 = def.adjust(&tm.cursor, redex.1);
    link(tm.vars, &mut tm.bag, p1, p2);
  }

  true
}

fn interact_void(tm: &mut TMem, _a: Port, _b: Port) -> bool {
  tm.rwts.void += 1;
  true
}

fn interact_eras(tm: &mut TMem, a: Port, b: Port) -> bool {
  if !tm.get_resources(2, 0, 0) {
    return false;
  }
  if tm.nodes.is_free(b.val()) {
    return false;
  }
  tm.rwts.eras += 1;
  let node = tm.nodes.take(b.val());
  link(tm.vars, &mut tm.bag, a, node.fst());
  link(tm.vars, &mut tm.bag, a, node.snd());
  true
}

fn interact_anni(tm: &mut TMem, a: Port, b: Port) -> bool {
  if !tm.get_resources(2, 0, 0) {
    return false;
  }
  if tm.nodes.is_free(a.val()) || tm.nodes.is_free(b.val()) {
    return false;
  }
  tm.rwts.anni += 1;
  let na = tm.nodes.take(a.val());
  let nb = tm.nodes.take(b.val());
  link(tm.vars, &mut tm.bag, na.fst(), nb.fst());
  link(tm.vars, &mut tm.bag, na.snd(), nb.snd());
  true
}

fn interact_comm(tm: &mut TMem, a: Port, b: Port) -> bool {
  if !tm.get_resources(4, 4, 4) {
    return false;
  }
  if tm.nodes.is_free(a.val()) || tm.nodes.is_free(b.val()) {
    return false;
  }
  tm.rwts.comm += 1;
  let na = tm.nodes.take(a.val());
  let nb = tm.nodes.take(b.val());

  let v0 = tm.cursor.vars_loc[0];
  let v1 = tm.cursor.vars_loc[1];
  let v2 = tm.cursor.vars_loc[2];
  let v3 = tm.cursor.vars_loc[3];
  tm.vars.store(v0, Port::new(Tag::Var, v0));
  tm.vars.store(v1, Port::new(Tag::Var, v1));
  tm.vars.store(v2, Port::new(Tag::Var, v2));
  tm.vars.store(v3, Port::new(Tag::Var, v3));

  let n0 = tm.cursor.node_loc[0];
  let n1 = tm.cursor.node_loc[1];
  let n2 = tm.cursor.node_loc[2];
  let n3 = tm.cursor.node_loc[3];
  // Two fresh copies of `b`'s kind, cross-wired to two fresh copies of
  // `a`'s kind through the four new variables — the classic commutation
  // diamond.
  tm.nodes.store(n0, super::port::Pair::new(Port::new(Tag::Var, v0), Port::new(Tag::Var, v1)));
  tm.nodes.store(n1, super::port::Pair::new(Port::new(Tag::Var, v2), Port::new(Tag::Var, v3)));
  tm.nodes.store(n2, super::port::Pair::new(Port::new(Tag::Var, v0), Port::new(Tag::Var, v2)));
  tm.nodes.store(n3, super::port::Pair::new(Port::new(Tag::Var, v1), Port::new(Tag::Var, v3)));

  link(tm.vars, &mut tm.bag, na.fst(), Port::new(b.tag(), n0));
  link(tm.vars, &mut tm.bag, na.snd(), Port::new(b.tag(), n1));
  link(tm.vars, &mut tm.bag, nb.fst(), Port::new(a.tag(), n2));
  link(tm.vars, &mut tm.bag, nb.snd(), Port::new(a.tag(), n3));

  true
}

fn interact_oper(tm: &mut TMem, a: Port, b: Port) -> bool {
  if !tm.get_resources(1, 1, 0) {
    return false;
  }
  if tm.nodes.is_free(b.val()) {
    return false;
  }
  tm.rwts.oper += 1;
  let node = tm.nodes.take(b.val());
  let (b1, b2) = (node.fst(), node.snd());

  if b1.tag() == Tag::Num {
    // Both operands known: compute and link the result to the return port.
    let result = op_add(a.val(), b1.val());
    link(tm.vars, &mut tm.bag, b2, Port::new(Tag::Num, result));
  } else {
    // Only one operand known so far: park it in a fresh node and park an
    // OPR port where the other operand will land, so the interaction
    // re-fires once `b1` itself reduces to a NUM.
    let loc = tm.cursor.node_loc[0];
    tm.nodes.store(loc, super::port::Pair::new(a, b2));
    link(tm.vars, &mut tm.bag, b1, Port::new(Tag::Opr, loc));
  }
  true
}

fn interact_swit(tm: &mut TMem, a: Port, b: Port) -> bool {
  if !tm.get_resources(1, 2, 0) {
    return false;
  }
  if tm.nodes.is_free(b.val()) {
    return false;
  }
  tm.rwts.swit += 1;
  let node = tm.nodes.take(b.val());
  let (b1, b2) = (node.fst(), node.snd());
  let av = a.val();

  if av == 0 {
    let loc = tm.cursor.node_loc[0];
    tm.nodes.store(loc, super::port::Pair::new(b2, ERAS));
    link(tm.vars, &mut tm.bag, Port::new(Tag::Con, loc), b1);
  } else {
    let loc0 = tm.cursor.node_loc[0];
    let loc1 = tm.cursor.node_loc[1];
    tm.nodes.store(loc1, super::port::Pair::new(Port::new(Tag::Num, av - 1), b2));
    tm.nodes.store(loc0, super::port::Pair::new(ERAS, Port::new(Tag::Con, loc1)));
    link(tm.vars, &mut tm.bag, Port::new(Tag::Con, loc0), b1);
  }
  true
}

/// The only numeric operation the book format currently declares (spec.md
/// §9 "Open questions": richer operators are left for the book format to
/// declare; this engine fixes integer addition, as the reference prototype
/// does).
#[inline(always)]
fn op_add(a: u32, b: u32) -> u32 {
  a.wrapping_add(b)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::book::Book;
  use crate::config::EngineConfig;
  use crate::run::net::Net;
  use crate::run::port::Pair;

  fn small_config() -> EngineConfig {
    EngineConfig { threads: 1, node_capacity: 32, vars_capacity: 32, rbag_capacity: 32 }
  }

  /// Scenario: `NUM 2` meets `OPR(NUM 2, r)` — one OPER interaction,
  /// `r` resolved to `NUM 4`.
  #[test]
  fn oper_adds_two_known_operands() {
    let book = Book::new(vec![]).unwrap();
    let config = small_config();
    let net = Net::new(&book, &config);
    let mut tm = TMem::new(0, &net);

    net.vars.store(1, Port::new(Tag::Var, 1));
    net.nodes.store(0, Pair::new(Port::new(Tag::Num, 2), Port::new(Tag::Var, 1)));

    let ok = interact(&mut tm, &book, Port::new(Tag::Num, 2), Port::new(Tag::Opr, 0));
    assert!(ok);
    assert_eq!(tm.rwts.oper, 1);
    assert_eq!(net.vars.load(1), Port::new(Tag::Num, 4));
  }

  /// Scenario: `NUM 0` meets `SWI(r, payload)` — the zero case links the
  /// payload straight through to `r` and erases the successor slot.
  #[test]
  fn switch_zero_branch_selects_payload() {
    let book = Book::new(vec![]).unwrap();
    let config = small_config();
    let net = Net::new(&book, &config);
    let mut tm = TMem::new(0, &net);

    net.vars.store(1, Port::new(Tag::Var, 1));
    let payload = Port::new(Tag::Num, 42);
    net.nodes.store(5, Pair::new(Port::new(Tag::Var, 1), payload));

    let ok = interact(&mut tm, &book, Port::new(Tag::Num, 0), Port::new(Tag::Swi, 5));
    assert!(ok);
    assert_eq!(tm.rwts.swit, 1);

    let linked = net.vars.load(1);
    assert_eq!(linked.tag(), Tag::Con);
    assert_eq!(net.nodes.load(linked.val()), Pair::new(payload, ERAS));
  }

  /// Scenario: `NUM 3` meets `SWI(r, payload)` — the successor case
  /// decrements and nests a fresh `CON` for the next unfolding.
  #[test]
  fn switch_successor_branch_decrements() {
    let book = Book::new(vec![]).unwrap();
    let config = small_config();
    let net = Net::new(&book, &config);
    let mut tm = TMem::new(0, &net);

    net.vars.store(2, Port::new(Tag::Var, 2));
    let payload = Port::new(Tag::Num, 99);
    net.nodes.store(5, Pair::new(Port::new(Tag::Var, 2), payload));

    let ok = interact(&mut tm, &book, Port::new(Tag::Num, 3), Port::new(Tag::Swi, 5));
    assert!(ok);
    assert_eq!(tm.rwts.swit, 1);

    let linked = net.vars.load(2);
    assert_eq!(linked.tag(), Tag::Con);
    let outer = net.nodes.load(linked.val());
    assert_eq!(outer.fst(), ERAS);
    assert_eq!(outer.snd().tag(), Tag::Con);
    let inner = net.nodes.load(outer.snd().val());
    assert_eq!(inner, Pair::new(Port::new(Tag::Num, 2), payload));
  }

  /// Scenario: a `CON` and a `DUP` meet at their principals — exactly one
  /// COMM fires, allocating four fresh nodes cross-wired through four fresh
  /// variables. The four outgoing links this produces are left unresolved
  /// in the bag (each would itself interact with whatever `CON`'s/`DUP`'s
  /// own aux ports carried, which this test leaves as bare numbers to keep
  /// the rewrite itself — not its further unfolding — under test).
  #[test]
  fn comm_splits_one_pair_into_four_cross_wired_nodes() {
    let book = Book::new(vec![]).unwrap();
    let config = small_config();
    let net = Net::new(&book, &config);
    let mut tm = TMem::new(0, &net);

    net.nodes.store(0, Pair::new(Port::new(Tag::Num, 11), Port::new(Tag::Num, 22)));
    net.nodes.store(1, Pair::new(Port::new(Tag::Num, 33), Port::new(Tag::Num, 44)));

    let ok = interact(&mut tm, &book, Port::new(Tag::Con, 0), Port::new(Tag::Dup, 1));
    assert!(ok);
    assert_eq!(tm.rwts.comm, 1);
    assert_eq!(tm.bag.len(), 4);
    assert!(net.nodes.is_free(0));
    assert!(net.nodes.is_free(1));

    // Every var cell the rewrite just touched is a fresh self-reference or
    // already consumed by one of the four queued links; none are empty.
    let mut live_nodes = 0;
    for i in 0..config.node_capacity as u32 {
      if !net.nodes.is_free(i) {
        live_nodes += 1;
      }
    }
    assert_eq!(live_nodes, 4);
  }
}
