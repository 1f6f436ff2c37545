// Work-stealing.
// ==============
// Threads sit at the leaves of a balanced binary tournament tree of depth
// log2(thread count). Each tick, a thread computes its current partner and
// a bucket index that rotates through tree levels as the tick advances; the
// low-id side of the pair donates, the high-id side takes. One shared
// atomic pair per partner-pair is the entire channel (spec.md §4.7).

use super::arena::APair;
use super::port::Pair;
use super::rbag::RBag;

/// Sentinel meaning "the taker is hungry and waiting"; distinguishes an
/// empty bucket from an actively requested one so donors don't flood idle
/// buckets.
pub const NEED_REDEX: u64 = u64::MAX;

/// The shared channel between every pair of peer threads: `threads / 2`
/// atomic pair cells (one bucket active per tournament round).
pub struct StealBuffer {
  buckets: Box<[APair]>,
}

impl StealBuffer {
  pub fn new(threads: usize) -> Self {
    let n = (threads / 2).max(1);
    let mut buckets = Vec::with_capacity(n);
    buckets.resize_with(n, || APair::new(Pair(0)));
    StealBuffer { buckets }
  }
}

/// The peer this thread pairs with on `tick`, within a tournament tree of
/// `2^log2_len` leaves.
#[inline(always)]
fn peer_id(id: u32, log2_len: u32, tick: u64) -> u32 {
  let round = (tick % log2_len as u64) as u32;
  let side = (id >> (log2_len - 1 - round)) & 1;
  let diff = (1u32 << (log2_len - 1)) >> round;
  if side != 0 { id - diff } else { id + diff }
}

/// The bucket index shared by `id` and its current peer.
#[inline(always)]
fn buck_id(id: u32, log2_len: u32, tick: u64) -> u32 {
  let round = (tick % log2_len as u64) as u32;
  let fid = peer_id(id, log2_len, tick);
  let itv = log2_len - round;
  let val = (id >> itv) << (itv - 1);
  id.min(fid) - val
}

/// Runs one tick of the stealing protocol for `tid`. If this thread is the
/// high-id side of its current pairing and its low-priority region is
/// empty, it checks the bucket: publishes a hunger signal if it's empty, or
/// claims a donated redex if one is waiting. If it's the low-id side with
/// at least two low-priority redexes banked, it answers a waiting signal by
/// donating one.
pub fn share_redexes(
  steal: &StealBuffer,
  bag: &mut RBag,
  tid: u32,
  log2_threads: u32,
  tick: u64,
) {
  if log2_threads == 0 {
    return;
  }
  let pid = peer_id(tid, log2_threads, tick);
  let idx = buck_id(tid, log2_threads, tick) as usize;
  let bucket = &steal.buckets[idx];

  if tid > pid && !bag.has_lows() {
    let peek = bucket.load();
    if peek.is_nil() {
      bucket.exchange(Pair(NEED_REDEX));
    } else if peek.0 != NEED_REDEX {
      bag.push_pair(peek);
      bucket.store(Pair(0));
    }
  }

  if tid < pid && bag.low_len() > 1 {
    let peek = bucket.load();
    if peek.0 == NEED_REDEX {
      if let Some(redex) = bag.pop_low() {
        bucket.store(redex);
      }
    }
  }
}
