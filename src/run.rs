// The runtime.
// ============
// A lock-free, multi-threaded interaction-combinator evaluator: ports and
// pairs (`port`), the two atomic arenas (`arena`), the per-thread redex bag
// (`rbag`), the linear-scan allocator (`alloc`), variable linking
// (`linker`), the eight interaction rules (`interact`), work-stealing
// (`steal`), rewrite counters (`stats`), and the shared net plus the
// per-thread evaluator that ties them all together (`net`).

pub mod alloc;
pub mod arena;
pub mod interact;
pub mod linker;
pub mod net;
pub mod port;
pub mod rbag;
pub mod stats;
pub mod steal;
