// End-to-end scenarios against the public `Engine` API.

use inet_core::book::{tvar, Def};
use inet_core::run::port::{Port, Tag};
use inet_core::{Book, Engine, EngineConfig};

fn seed(def_id: u32) -> (Port, Port) {
  (Port::new(Tag::Ref, def_id), Port::new(Tag::Var, 0))
}

/// Scenario 1: the identity definition — one `CALL`, one self-link, done.
#[test]
fn identity_reduces_in_one_rewrite() {
  let def = Def { rdex: vec![], node: vec![(tvar(0), tvar(0))], vars_len: 1 };
  let book = Book::new(vec![def]).unwrap();
  let config = EngineConfig { threads: 1, node_capacity: 64, vars_capacity: 64, rbag_capacity: 64 };

  let output = Engine::run(&config, &book, seed(0)).unwrap();
  assert_eq!(output.rewrites, 1);
  // The root var now points at the fresh var the call allocated for itself.
  assert_eq!(output.root.tag(), Tag::Var);
}

/// Scenario 5: the bundled `fun`/`loop`/`main` book runs to quiescence.
#[test]
fn bundled_loop_book_runs_to_quiescence() {
  let book = inet_core::demo::book(3, 8).unwrap();
  let config = EngineConfig { threads: 1, ..EngineConfig::default() };

  let output = Engine::run(&config, &book, inet_core::demo::seed()).unwrap();
  assert!(output.rewrites > 0);
}

/// Running the same book and seed at 1, 2, and 4 worker threads must fire
/// the exact same number of interactions — work-stealing changes which
/// thread does the work, never what work there is to do.
#[test]
fn rewrite_count_is_independent_of_thread_count() {
  let mut counts = Vec::new();
  for threads in [1usize, 2, 4] {
    let book = inet_core::demo::book(3, 8).unwrap();
    let config = EngineConfig { threads, ..EngineConfig::default() };
    let output = Engine::run(&config, &book, inet_core::demo::seed()).unwrap();
    counts.push(output.rewrites);
  }
  assert!(counts.iter().all(|&c| c == counts[0]), "rewrite counts diverged across thread counts: {:?}", counts);
}
