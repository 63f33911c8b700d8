//! Counters for native block allocations.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters describing native block usage.
///
/// Every [`NativeBlock`](crate::native_block::NativeBlock) reports to the process-wide
/// instance returned by [`AllocationStats::global`]. A block may additionally report to
/// its own tracker (an `Arc<AllocationStats>`), which gives callers an isolated view of
/// the blocks they created.
///
/// Values are diagnostic and may be outdated in a concurrent environment.
#[derive(Debug, Default)]
pub struct AllocationStats {
    live_blocks: AtomicU64,
    live_bytes: AtomicU64,
    total_allocations: AtomicU64,
    total_releases: AtomicU64,
}

static GLOBAL: AllocationStats = AllocationStats::new();

impl AllocationStats {
    pub const fn new() -> AllocationStats {
        AllocationStats {
            live_blocks: AtomicU64::new(0),
            live_bytes: AtomicU64::new(0),
            total_allocations: AtomicU64::new(0),
            total_releases: AtomicU64::new(0),
        }
    }

    /// The process-wide counters.
    pub fn global() -> &'static AllocationStats {
        &GLOBAL
    }

    /// Number of blocks allocated and not yet released.
    pub fn live_blocks(&self) -> u64 {
        self.live_blocks.load(Ordering::Acquire)
    }

    /// Capacity in bytes held by live blocks.
    pub fn live_bytes(&self) -> u64 {
        self.live_bytes.load(Ordering::Acquire)
    }

    pub fn total_allocations(&self) -> u64 {
        self.total_allocations.load(Ordering::Acquire)
    }

    pub fn total_releases(&self) -> u64 {
        self.total_releases.load(Ordering::Acquire)
    }

    pub(crate) fn on_allocate(&self, capacity: usize) {
        self.live_blocks.fetch_add(1, Ordering::AcqRel);
        self.live_bytes.fetch_add(capacity as u64, Ordering::AcqRel);
        self.total_allocations.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn on_resize(&self, old_capacity: usize, new_capacity: usize) {
        if new_capacity >= old_capacity {
            self.live_bytes
                .fetch_add((new_capacity - old_capacity) as u64, Ordering::AcqRel);
        } else {
            self.live_bytes
                .fetch_sub((old_capacity - new_capacity) as u64, Ordering::AcqRel);
        }
    }

    pub(crate) fn on_release(&self, capacity: usize) {
        self.live_blocks.fetch_sub(1, Ordering::AcqRel);
        self.live_bytes.fetch_sub(capacity as u64, Ordering::AcqRel);
        self.total_releases.fetch_add(1, Ordering::AcqRel);
    }
}
