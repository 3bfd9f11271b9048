//! Runtime gate over the optional `parallel` feature.
//!
//! Tree construction may fan leaf hashing out to rayon workers; results
//! are always collected in index order, so the toggle never changes a
//! root. Tests flip it through [`set_parallelism`] to compare the two
//! paths.

#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "parallel")]
static PARALLEL_ENABLED: AtomicBool = AtomicBool::new(true);

/// Work-unit size handed to each rayon task. Hashing a single node is
/// cheap, so tiny chunks would be dominated by scheduling overhead.
const MIN_CHUNK: usize = 128;

/// Chunk size used when splitting `total_items` across workers.
pub fn preferred_chunk_size(total_items: usize) -> usize {
    MIN_CHUNK.min(total_items.max(1))
}

/// Whether tree construction currently uses the rayon path.
#[cfg(feature = "parallel")]
pub fn parallelism_enabled() -> bool {
    PARALLEL_ENABLED.load(Ordering::SeqCst)
}

/// Always false without the `parallel` feature.
#[cfg(not(feature = "parallel"))]
pub fn parallelism_enabled() -> bool {
    false
}

/// Overrides the parallelism toggle until the returned guard drops.
#[cfg(feature = "parallel")]
pub fn set_parallelism(enabled: bool) -> ParallelismGuard {
    let previous = PARALLEL_ENABLED.swap(enabled, Ordering::SeqCst);
    ParallelismGuard { previous }
}

/// No-op without the `parallel` feature.
#[cfg(not(feature = "parallel"))]
pub fn set_parallelism(_enabled: bool) -> ParallelismGuard {
    ParallelismGuard {}
}

/// Restores the previous toggle state on drop.
pub struct ParallelismGuard {
    #[cfg(feature = "parallel")]
    previous: bool,
}

#[cfg(feature = "parallel")]
impl Drop for ParallelismGuard {
    fn drop(&mut self) {
        PARALLEL_ENABLED.store(self.previous, Ordering::SeqCst);
    }
}

#[cfg(not(feature = "parallel"))]
impl Drop for ParallelismGuard {
    fn drop(&mut self) {}
}
