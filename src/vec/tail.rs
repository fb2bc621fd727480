//! Two-phase bulk append into the uninitialized tail.
//!
//! [`Vec::reserve_tail`] reserves a run of raw slots past the live elements
//! and hands them out as a [`TailSlots`] region; writing the slots and then
//! committing a count publishes them as live elements in one step. The region
//! borrows the vector exclusively, so nothing can move or resize the buffer
//! while a raw cursor into it exists.

use core::mem::MaybeUninit;

use crate::alloc::ArrayAlloc;
use crate::range::TrivialInit;

use super::Vec;

/// A reserved run of uninitialized tail slots in a [`Vec`].
///
/// Dropping the region without committing leaves the vector unchanged.
pub struct TailSlots<'a, T, A: ArrayAlloc> {
    vec: &'a mut Vec<T, A>,
    reserved: usize,
}

impl<T, A: ArrayAlloc> Vec<T, A> {
    /// Reserve `additional` raw slots past the live elements for bulk
    /// appending, growing the allocation if needed.
    pub fn reserve_tail(&mut self, additional: usize) -> TailSlots<'_, T, A> {
        self.reserve(additional);
        TailSlots {
            vec: self,
            reserved: additional,
        }
    }
}

impl<T, A: ArrayAlloc> TailSlots<'_, T, A> {
    /// The reserved slots. Nothing written here is live until committed.
    #[inline]
    pub fn slots(&mut self) -> &mut [MaybeUninit<T>] {
        &mut self.vec.spare_capacity_mut()[..self.reserved]
    }

    /// Number of slots reserved.
    #[inline]
    pub fn reserved(&self) -> usize {
        self.reserved
    }

    /// Publish the first `count` reserved slots as live elements.
    ///
    /// # Safety
    /// The first `count` slots must have been fully initialized.
    pub unsafe fn commit(self, count: usize) {
        assert!(count <= self.reserved);
        let length = self.vec.len();
        self.vec.storage.set_len(length + count);
    }

    /// Publish the first `count` reserved slots as live elements.
    ///
    /// For these types any bit pattern is a valid value, so uninitialized
    /// slots become elements with unspecified contents rather than undefined
    /// behavior.
    pub fn commit_trivial(self, count: usize)
    where
        T: TrivialInit,
    {
        unsafe { self.commit(count) }
    }
}
