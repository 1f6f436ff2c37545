// Linker.
// =======
// Joins two ports into either a fresh redex (both principal) or a variable
// substitution (one side still unbound). Two threads may race to bind the
// same variable; exactly one wins the exchange and the loser re-enters the
// loop with the winner's value (spec.md §4.5). This is the concurrency heart
// of the engine — the only other place inter-thread races are resolved is
// the take-or-bail pattern in `run/interact.rs`.

use super::arena::VarArena;
use super::port::Port;
use super::rbag::RBag;

/// Links `a` and `b`, pushing a fresh redex into `bag` if both sides turn
/// out to be principal, or updating a variable cell in `vars` otherwise.
///
/// Caller must have already reserved room in `bag` for one redex (part of
/// `get_resources`, spec.md §4.4) — linking itself never fails.
pub fn link(vars: &VarArena, bag: &mut RBag, mut a: Port, mut b: Port) {
  loop {
    // If `a` isn't a variable, swap — we always chase through the `a` side.
    if !a.is_var() {
      core::mem::swap(&mut a, &mut b);
    }
    // Both principal: this is a redex, not a substitution.
    if !a.is_var() {
      bag.push(a, b);
      return;
    }

    // While `b` is a variable, extend the chain: read-and-replace `b`'s
    // cell with `b` itself (marking "the linker currently owns this link"),
    // and keep chasing unless we hit a self-reference (unbound) or a race.
    while b.is_var() {
      let b_prev = vars.exchange(b.val(), b);
      if b_prev == b || b_prev.is_nil() {
        break;
      }
      vars.take(b.val());
      b = b_prev;
    }

    // `a` is a variable, `b` is resolved (either non-var, or the innermost
    // var we couldn't extend past). Commit the substitution.
    let a_prev = vars.exchange(a.val(), b);
    if a_prev == a {
      // Installed cleanly: `a` was unbound and now points at `b`.
      return;
    }
    // Someone else already bound `a`; retry with what they installed.
    vars.take(a.val());
    a = a_prev;
  }
}
