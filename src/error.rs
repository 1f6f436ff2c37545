// Error taxonomy.
// ===============
// Only two things in this engine are fatal: a misconfigured run and a
// malformed book, both caught before any reduction starts, plus permanent
// arena exhaustion discovered mid-run. Everything else — short allocations,
// a contended node cell — is a retry, not an error (spec.md §7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("thread count must be a non-zero power of two, got {0}")]
  ThreadsNotPowerOfTwo(usize),
  #[error("node_capacity must be non-zero")]
  ZeroNodeCapacity,
  #[error("vars_capacity must be non-zero")]
  ZeroVarsCapacity,
  #[error("rbag_capacity must be non-zero")]
  ZeroBagCapacity,
  #[error("invalid size string: {0}")]
  InvalidSize(String),
}

#[derive(Debug, Error)]
pub enum BookError {
  #[error("definition {def} references node index {index}, out of bounds for node_len {bound}")]
  NodeIndexOutOfBounds { def: usize, index: u32, bound: usize },
  #[error("definition {def} references variable index {index}, out of bounds for vars_len {bound}")]
  VarIndexOutOfBounds { def: usize, index: u32, bound: usize },
  #[error("definition {def} declares {len} seed redexes, exceeding the 32-slot limit")]
  TooManyRedexes { def: usize, len: usize },
  #[error("definition {def} declares {len} node templates, exceeding the 32-slot limit")]
  TooManyNodes { def: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("invalid engine configuration: {0}")]
  Config(#[from] ConfigError),
  #[error("malformed book: {0}")]
  MalformedBook(#[from] BookError),
  #[error("arena exhausted: thread {tid} made no progress for {tick} ticks")]
  Exhausted { tid: usize, tick: u64 },
}
