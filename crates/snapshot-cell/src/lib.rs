//! Lock-Free Snapshot Cell
//!
//! Publishes a small `Copy` record from one writer to any number of readers
//! without locks. The record is stored as atomic 32-bit words guarded by a
//! sequence counter, so a reader never sees half of one publish and half of
//! another, and the writer never waits.

mod cell;

pub use cell::{channel, Publisher, Reader};

/// A record that can be stored as `N` 32-bit words
pub trait WordPack<const N: usize>: Copy {
    /// Encode into words
    fn pack(&self) -> [u32; N];

    /// Decode from words produced by [`WordPack::pack`]
    fn unpack(words: [u32; N]) -> Self;
}

impl<const N: usize> WordPack<N> for [u32; N] {
    fn pack(&self) -> [u32; N] {
        *self
    }

    fn unpack(words: [u32; N]) -> Self {
        words
    }
}
