// Rewrite counters.
// =================
// Each thread keeps a plain, non-atomic tally of how many times it fired
// each rule; at the end of a tick the thread folds its tally into the
// shared atomic total and zeroes its own copy (spec.md §4.8, §0.4).

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::util::pretty_num;

/// Per-thread rewrite counts, one field per interaction rule.
#[derive(Default)]
pub struct Rewrites {
  pub link: usize,
  pub call: usize,
  pub void: usize,
  pub eras: usize,
  pub anni: usize,
  pub comm: usize,
  pub oper: usize,
  pub swit: usize,
}

/// The shared, atomic counterpart threads fold their local [`Rewrites`]
/// into.
#[derive(Default)]
pub struct AtomicRewrites {
  pub link: AtomicUsize,
  pub call: AtomicUsize,
  pub void: AtomicUsize,
  pub eras: AtomicUsize,
  pub anni: AtomicUsize,
  pub comm: AtomicUsize,
  pub oper: AtomicUsize,
  pub swit: AtomicUsize,
}

impl Rewrites {
  pub fn new() -> Self {
    Self::default()
  }

  #[inline(always)]
  pub fn total(&self) -> usize {
    self.link + self.call + self.void + self.eras + self.anni + self.comm + self.oper + self.swit
  }

  /// Adds this thread's tally into the shared total, then clears it.
  pub fn fold_into(&mut self, target: &AtomicRewrites) {
    target.link.fetch_add(self.link, Ordering::Relaxed);
    target.call.fetch_add(self.call, Ordering::Relaxed);
    target.void.fetch_add(self.void, Ordering::Relaxed);
    target.eras.fetch_add(self.eras, Ordering::Relaxed);
    target.anni.fetch_add(self.anni, Ordering::Relaxed);
    target.comm.fetch_add(self.comm, Ordering::Relaxed);
    target.oper.fetch_add(self.oper, Ordering::Relaxed);
    target.swit.fetch_add(self.swit, Ordering::Relaxed);
    *self = Rewrites::new();
  }
}

impl AtomicRewrites {
  pub fn new() -> Self {
    Self::default()
  }

  #[inline(always)]
  pub fn total(&self) -> usize {
    self.link.load(Ordering::Relaxed)
      + self.call.load(Ordering::Relaxed)
      + self.void.load(Ordering::Relaxed)
      + self.eras.load(Ordering::Relaxed)
      + self.anni.load(Ordering::Relaxed)
      + self.comm.load(Ordering::Relaxed)
      + self.oper.load(Ordering::Relaxed)
      + self.swit.load(Ordering::Relaxed)
  }
}

impl std::fmt::Display for AtomicRewrites {
  /// Mirrors the teacher's `main.rs::print_stats` block: one rule per line,
  /// right-aligned, underscore-grouped the way `pretty_num` renders it.
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    writeln!(f, "RWTS   : {:>15}", pretty_num(self.total() as u64))?;
    writeln!(f, "- LINK : {:>15}", pretty_num(self.link.load(Ordering::Relaxed) as u64))?;
    writeln!(f, "- CALL : {:>15}", pretty_num(self.call.load(Ordering::Relaxed) as u64))?;
    writeln!(f, "- VOID : {:>15}", pretty_num(self.void.load(Ordering::Relaxed) as u64))?;
    writeln!(f, "- ERAS : {:>15}", pretty_num(self.eras.load(Ordering::Relaxed) as u64))?;
    writeln!(f, "- ANNI : {:>15}", pretty_num(self.anni.load(Ordering::Relaxed) as u64))?;
    writeln!(f, "- COMM : {:>15}", pretty_num(self.comm.load(Ordering::Relaxed) as u64))?;
    writeln!(f, "- OPER : {:>15}", pretty_num(self.oper.load(Ordering::Relaxed) as u64))?;
    write!(f, "- SWIT : {:>15}", pretty_num(self.swit.load(Ordering::Relaxed) as u64))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fold_moves_counts_and_resets_local() {
    let mut local = Rewrites::new();
    local.anni = 3;
    local.comm = 2;
    let shared = AtomicRewrites::new();
    local.fold_into(&shared);
    assert_eq!(shared.total(), 5);
    assert_eq!(local.total(), 0);
  }

  #[test]
  fn display_renders_underscore_grouped_totals() {
    let mut local = Rewrites::new();
    local.call = 1_234_567;
    let shared = AtomicRewrites::new();
    local.fold_into(&shared);
    let rendered = shared.to_string();
    let lines: Vec<&str> = rendered.lines().collect();
    assert!(lines[0].starts_with("RWTS"));
    assert!(lines[0].trim_end().ends_with("1_234_567"));
    let call_line = lines.iter().find(|l| l.starts_with("- CALL")).unwrap();
    assert!(call_line.trim_end().ends_with("1_234_567"));
  }
}
