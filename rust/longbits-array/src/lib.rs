//! Resizable, 64-bit indexed arrays of `u64` words over interchangeable storage.
//!
//! [`LongArray`] is the storage contract; three backends implement it:
//!
//! - [`HeapLongArray`]: a `Vec<u64>` on the Rust heap (zero-initialized).
//! - [`NativeLongArray`]: a native memory block outside the global allocator, released
//!   deterministically on `close` or drop (not zero-initialized).
//! - [`MappedLongArray`]: a memory-mapped file with a 16-byte header, grown and shrunk
//!   in page-aligned steps (zero-initialized).
//!
//! [`AnyLongArray`] is the closed union of the three for callers that pick the
//! backend at run time.

pub mod any;
pub mod heap;
pub mod long_array;
pub mod mapped;
pub mod native;


pub use any::{AnyLongArray, AnyLongArrayFactory, LongArrayKind};
pub use heap::{HeapLongArray, HeapLongArrayFactory};
pub use long_array::{LongArray, LongArrayFactory};
pub use mapped::{
    MappedLongArray, MappedLongArrayFactory,
    config::{BulkSaveConfig, MappedArrayConfig, OpenMode},
};
pub use native::{NativeLongArray, NativeLongArrayFactory};
