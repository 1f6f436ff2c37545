// Shared net and the per-thread evaluator.
// =========================================
// `Net` is the process-wide shared state: the two arenas, the steal
// buffer, the book, and the global rewrite total. `TMem` is what each
// worker thread owns exclusively: its bag, allocator cursor, tick, local
// counters. `Engine::run` spawns one thread per `TMem`, each draining its
// bag, work-stealing, and folding into the shared total, until a
// barrier-and-recheck protocol confirms every thread is simultaneously
// quiet (spec.md §0.5, §4.8, §5).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::book::Book;
use crate::config::EngineConfig;
use crate::error::EngineError;

use super::alloc::Cursor;
use super::arena::{NodeArena, VarArena};
use super::interact::interact;
use super::port::Port;
use super::rbag::RBag;
use super::stats::{AtomicRewrites, Rewrites};
use super::steal::{share_redexes, StealBuffer};

/// A full scan's worth of idle ticks with a non-empty bag before a thread's
/// lack of progress is treated as permanent exhaustion rather than a run of
/// bad luck (spec.md §0.5).
pub const STALL_TICKS: u64 = 1 << 16;

/// The shared graph: arenas, steal buffer, book, and global stats. Built
/// once, then handed out by shared reference to every worker thread.
pub struct Net<'a> {
  pub book: &'a Book,
  pub nodes: NodeArena,
  pub vars: VarArena,
  pub steal: StealBuffer,
  pub rwts: AtomicRewrites,
  threads: usize,
  log2_threads: u32,
  rbag_capacity: usize,
  quiet: Box<[AtomicUsize]>,
  stalled: AtomicBool,
}

impl<'a> Net<'a> {
  pub fn new(book: &'a Book, config: &EngineConfig) -> Self {
    let mut quiet = Vec::with_capacity(config.threads);
    quiet.resize_with(config.threads, || AtomicUsize::new(usize::MAX));
    Net {
      book,
      nodes: NodeArena::new(config.node_capacity),
      vars: VarArena::new(config.vars_capacity),
      steal: StealBuffer::new(config.threads),
      rwts: AtomicRewrites::new(),
      threads: config.threads,
      log2_threads: config.threads.trailing_zeros(),
      rbag_capacity: config.rbag_capacity,
      quiet: quiet.into_boxed_slice(),
      stalled: AtomicBool::new(false),
    }
  }
}

impl<'a> std::fmt::Debug for Net<'a> {
  /// One line per live node cell, then one line per bound variable, in the
  /// idiom of `hvm.c`'s `print_net` — free cells (the all-zero sentinel)
  /// are skipped rather than printed as `NIL`.
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    writeln!(f, "NODE | PORT-1       | PORT-2")?;
    for i in 0..self.nodes.len() as u32 {
      let node = self.nodes.load(i);
      if !node.is_nil() {
        writeln!(f, "{:04X} | {:?} | {:?}", i, node.fst(), node.snd())?;
      }
    }
    writeln!(f, "VARS | VALUE")?;
    for i in 0..self.vars.len() as u32 {
      let var = self.vars.load(i);
      if !var.is_nil() {
        writeln!(f, "{:04X} | {:?}", i, var)?;
      }
    }
    Ok(())
  }
}

/// One worker thread's private evaluation state.
pub struct TMem<'a> {
  pub tid: usize,
  pub tick: u64,
  pub nodes: &'a NodeArena,
  pub vars: &'a VarArena,
  pub bag: RBag,
  pub cursor: Cursor,
  pub rwts: Rewrites,
}

impl<'a> TMem<'a> {
  pub fn new(tid: usize, net: &'a Net<'a>) -> Self {
    TMem {
      tid,
      tick: 0,
      nodes: &net.nodes,
      vars: &net.vars,
      bag: RBag::new(net.rbag_capacity),
      cursor: Cursor::new(tid),
      rwts: Rewrites::new(),
    }
  }

  /// Reserves `need_rdex` bag slots and `need_node`/`need_vars` arena
  /// slots, all-or-nothing. On partial allocation the caller must treat the
  /// whole interaction as failed (spec.md §4.4).
  pub fn get_resources(&mut self, need_rdex: usize, need_node: usize, need_vars: usize) -> bool {
    if self.bag.free() < need_rdex {
      return false;
    }
    if self.cursor.alloc_nodes(self.nodes, need_node) < need_node {
      return false;
    }
    if self.cursor.alloc_vars(self.vars, need_vars) < need_vars {
      return false;
    }
    true
  }

  /// Drains the local bag by repeated `interact`, stopping when it's empty
  /// or resources run short (the redex is pushed back and the drain ends —
  /// the next tick retries it after stealing has had a chance to help).
  fn drain(&mut self, book: &Book) {
    while let Some(redex) = self.bag.pop() {
      if !interact(self, book, redex.fst(), redex.snd()) {
        self.bag.push_pair(redex);
        break;
      }
    }
  }

  /// One tick: advance the clock, drain, then attempt work-stealing.
  fn tick(&mut self, net: &Net, book: &Book) {
    self.tick += 1;
    self.drain(book);
    share_redexes(&net.steal, &mut self.bag, self.tid as u32, net.log2_threads, self.tick);
  }
}

/// Drives the evaluator to quiescence across `net.threads` threads and
/// returns the total interaction count, or `EngineError::Exhausted` if a
/// thread stalls for `STALL_TICKS` with a non-empty bag.
///
/// No barrier synchronizes the threads' loops directly (a busy thread and
/// an idle one would call it a different number of times and deadlock).
/// Instead every thread publishes its bag length into `net.quiet` each
/// tick; a thread that sees an empty bag of its own, plus every published
/// length at zero on two ticks in a row, concludes quiescence on its own
/// (spec.md §0.5).
pub fn run(net: &Net, seed: (Port, Port)) -> Result<u64, EngineError> {
  let results: Vec<Result<(), EngineError>> = std::thread::scope(|scope| {
    let mut handles = Vec::with_capacity(net.threads);
    for tid in 0..net.threads {
      let seed = seed;
      handles.push(scope.spawn(move || run_thread(net, tid, seed)));
    }
    handles.into_iter().map(|h| h.join().expect("worker thread panicked")).collect()
  });
  for r in results {
    r?;
  }
  Ok(net.rwts.total() as u64)
}

fn run_thread(net: &Net, tid: usize, seed: (Port, Port)) -> Result<(), EngineError> {
  let mut tm = TMem::new(tid, net);
  if tid == 0 {
    // Pushed straight into the bag, not through the linker: the seed is a
    // REF meeting a fresh VAR, which the linker would treat as a plain
    // substitution. Queuing it as a redex lets `interact`'s CALL-on-REF/VAR
    // fixup expand it (spec.md §4.6, matching the reference prototype's
    // `push_redex(tm[0], new_pair(new_port(REF, 5), new_port(VAR, 0)))`).
    tm.bag.push(seed.0, seed.1);
  }

  let mut stall_since: Option<u64> = None;
  let mut quiet_rounds: u32 = 0;
  loop {
    let before = tm.rwts.total();
    tm.tick(net, net.book);
    let after = tm.rwts.total();

    net.quiet[tid].store(tm.bag.len(), Ordering::Relaxed);

    if net.stalled.load(Ordering::Relaxed) {
      tm.rwts.fold_into(&net.rwts);
      return Err(EngineError::Exhausted { tid, tick: tm.tick });
    }

    if after > before {
      stall_since = None;
    } else if !tm.bag.is_empty() {
      let since = *stall_since.get_or_insert(tm.tick);
      if tm.tick - since >= STALL_TICKS {
        net.stalled.store(true, Ordering::Relaxed);
        tm.rwts.fold_into(&net.rwts);
        return Err(EngineError::Exhausted { tid, tick: tm.tick });
      }
    }

    if tm.bag.is_empty() && net.quiet.iter().all(|q| q.load(Ordering::Relaxed) == 0) {
      quiet_rounds += 1;
      if quiet_rounds >= 2 {
        tm.rwts.fold_into(&net.rwts);
        return Ok(());
      }
    } else {
      quiet_rounds = 0;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::book::Book;
  use crate::run::port::Tag;

  #[test]
  fn debug_prints_only_live_cells() {
    let book = Book::new(vec![]).unwrap();
    let config = EngineConfig { threads: 1, node_capacity: 8, vars_capacity: 8, rbag_capacity: 8 };
    let net = Net::new(&book, &config);
    net.nodes.store(2, super::super::port::Pair::new(Port::new(Tag::Con, 0), Port::new(Tag::Con, 1)));
    net.vars.store(3, Port::new(Tag::Var, 3));

    let rendered = format!("{:?}", net);
    assert!(rendered.contains("0002 | Con:"));
    assert!(rendered.contains("0003 | Var:"));
    assert!(!rendered.contains("0000 |"));
  }
}
