//! Bump arena configuration parameters.

use crate::error::ArenaError;

/// Configuration for a [`BumpArena`](crate::BumpArena).
///
/// Controls the size and alignment of the single backing block.
/// Validated when the arena is built; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Size of the backing block in bytes.
    ///
    /// Default: 1_048_576 (1 MiB). Zero is allowed and yields an arena
    /// that refuses every non-empty request.
    pub capacity_bytes: usize,

    /// Alignment of the backing block in bytes.
    ///
    /// Default: 16. Must be a power of two. Requests with larger
    /// alignment are still served by padding the cursor.
    pub align: usize,
}

impl ArenaConfig {
    /// Default block size: 1 MiB.
    pub const DEFAULT_CAPACITY_BYTES: usize = 1 << 20;

    /// Default block alignment.
    pub const DEFAULT_ALIGN: usize = 16;

    /// Create a config for a block of `capacity_bytes` with the default alignment.
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            capacity_bytes,
            align: Self::DEFAULT_ALIGN,
        }
    }

    /// Override the block alignment.
    pub fn with_align(mut self, align: usize) -> Self {
        self.align = align;
        self
    }

    /// Check that the config describes a block the process allocator can
    /// represent.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if !self.align.is_power_of_two() {
            return Err(ArenaError::InvalidAlignment { align: self.align });
        }
        // Same bound `Layout::from_size_align` enforces.
        if self.capacity_bytes > isize::MAX as usize - (self.align - 1) {
            return Err(ArenaError::CapacityTooLarge {
                capacity_bytes: self.capacity_bytes,
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY_BYTES)
    }
}
