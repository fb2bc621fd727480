//! Buffer chaining for single-pass sources of unknown length.
//!
//! Inserting a sequence that can only be traversed once and whose length is
//! unknown cannot pre-size the destination. [`BufferChain`] instead allocates
//! successively larger buffers following the container's doubling policy,
//! filling each to capacity from the source while tracking the logical
//! insertion index, and chaining buffers until the source is exhausted. A
//! final single pass recombines every buffer into one array, reusing the last
//! allocated buffer as the final array whenever its capacity already covers
//! the required total. The caller then moves the container's prefix and
//! suffix around the inserted elements and commits the new buffer.
//!
//! Each buffer is filled as a circular buffer starting at the running
//! insertion index, so elements land at their final offsets whenever the
//! buffer ends up being reused. Total work is O(I) constructions of inserted
//! elements plus O(N) relocations, where I is the source length and N the
//! final size.

use core::mem::ManuallyDrop;
use core::ptr::{self, NonNull};

use crate::alloc::ArrayAlloc;
use crate::error::AllocError;
use crate::range;
use crate::storage::next_capacity;

// Capacities at least double per link, so the chain can never grow deeper
// than the pointer width.
const MAX_DEPTH: usize = usize::BITS as usize;

struct Chunk<T> {
    data: NonNull<T>,
    cap: usize,
}

impl<T> Clone for Chunk<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Chunk<T> {}

pub(crate) struct BufferChain<T, A: ArrayAlloc> {
    alloc: A,
    chunks: [Option<Chunk<T>>; MAX_DEPTH],
    depth: usize,
    /// Logical index at which insertion begins; fixed for the chain's life.
    start: usize,
    /// Running logical size: the container's old size plus elements inserted.
    size: usize,
    /// Running insertion cursor: `start` plus elements inserted.
    index: usize,
    /// Capacity stepping state; the newest chunk's capacity.
    cap: usize,
    /// First fill segment of the newest chunk: (offset, filled).
    seg1: (usize, usize),
    /// Wrapped fill segment length at offset 0 of the newest chunk.
    seg2: usize,
    /// An element pulled from the source but not yet placed.
    pending: Option<T>,
}

impl<T, A: ArrayAlloc> BufferChain<T, A> {
    /// Start a chain inserting at logical index `start` of a container
    /// currently holding `old_size` elements in `old_cap` capacity. `first`
    /// is the element that triggered the fallback.
    pub fn new_in(alloc: A, start: usize, old_size: usize, old_cap: usize, first: T) -> Self {
        debug_assert!(start <= old_size);
        Self {
            alloc,
            chunks: [None; MAX_DEPTH],
            depth: 0,
            start,
            size: old_size,
            index: start,
            cap: old_cap,
            seg1: (0, 0),
            seg2: 0,
            pending: Some(first),
        }
    }

    /// Consume the source, chaining buffers until it is exhausted.
    pub fn run(&mut self, iter: &mut impl Iterator<Item = T>) -> Result<(), AllocError> {
        loop {
            // step the capacity until it can contain the running size plus
            // the pending element
            let mut cap = next_capacity(self.cap);
            while cap <= self.size {
                cap = next_capacity(cap);
            }
            self.cap = cap;
            let data = self.alloc.try_allocate::<T>(cap)?;
            debug_assert!(self.depth < MAX_DEPTH);
            self.chunks[self.depth] = Some(Chunk { data, cap });
            self.depth += 1;

            // circular fill: [mid, cap) first, then wrap to [0, mid)
            let mid = self.index;
            debug_assert!(mid < cap);
            self.seg1 = (mid, 0);
            self.seg2 = 0;
            let room1 = cap - mid;
            if self.fill(unsafe { data.as_ptr().add(mid) }, room1, iter, false) < room1 {
                return Ok(());
            }
            if self.fill(data.as_ptr(), mid, iter, true) < mid {
                return Ok(());
            }
            match iter.next() {
                Some(item) => self.pending = Some(item),
                None => return Ok(()),
            }
        }
    }

    // Counters are advanced per element so an unwinding source leaves the
    // chain's drop guard with an exact picture of what was constructed.
    fn fill(
        &mut self,
        dst: *mut T,
        room: usize,
        iter: &mut impl Iterator<Item = T>,
        wrapped: bool,
    ) -> usize {
        let mut written = 0;
        while written < room {
            let item = match self.pending.take() {
                Some(item) => item,
                None => match iter.next() {
                    Some(item) => item,
                    None => break,
                },
            };
            unsafe { dst.add(written).write(item) };
            written += 1;
            if wrapped {
                self.seg2 = written;
            } else {
                self.seg1.1 = written;
            }
            self.size += 1;
            self.index += 1;
        }
        written
    }

    /// Recombine the chain into one final array. Returns the array, its
    /// capacity, and the index one past the last inserted element. The
    /// inserted elements occupy `[start, end)`; all other slots are raw and
    /// are the caller's to fill with the container's prefix and suffix.
    pub fn finish(self) -> Result<(NonNull<T>, usize, usize), AllocError> {
        debug_assert!(self.depth > 0);
        debug_assert!(self.pending.is_none());
        let last = self.depth - 1;
        let last_chunk = self.chunks[last].unwrap();

        // the last chunk is reusable when it never wrapped and already has
        // room for the final size
        let reuse = self.size <= last_chunk.cap;
        let mut final_cap = last_chunk.cap;
        while final_cap < self.size {
            final_cap = next_capacity(final_cap);
        }
        let final_data = if reuse {
            last_chunk.data
        } else {
            self.alloc.try_allocate::<T>(final_cap)?
        };

        let this = ManuallyDrop::new(self);
        unsafe {
            let mut combine_index = this.start;
            let mut pos = final_data.as_ptr().add(combine_index);
            for k in 0..last {
                // every earlier chunk was filled completely, circularly from
                // its own insertion offset, which this walk reproduces
                let c = this.chunks[k].unwrap();
                let split = combine_index;
                debug_assert!(split <= c.cap);
                pos = range::move_construct_n(pos, c.data.as_ptr().add(split), c.cap - split);
                pos = range::move_construct_n(pos, c.data.as_ptr(), split);
                this.alloc.deallocate(c.data, c.cap);
                combine_index += c.cap;
            }
            if reuse {
                debug_assert_eq!(this.seg2, 0);
                debug_assert_eq!(combine_index, this.seg1.0);
            } else {
                debug_assert_eq!(combine_index, this.seg1.0);
                pos = range::move_construct_n(
                    pos,
                    last_chunk.data.as_ptr().add(this.seg1.0),
                    this.seg1.1,
                );
                let _ = range::move_construct_n(pos, last_chunk.data.as_ptr(), this.seg2);
                this.alloc.deallocate(last_chunk.data, last_chunk.cap);
            }
            let end = this.index;
            let alloc = ptr::read(&this.alloc);
            drop(alloc);
            Ok((final_data, final_cap, end))
        }
    }
}

impl<T, A: ArrayAlloc> Drop for BufferChain<T, A> {
    fn drop(&mut self) {
        unsafe {
            for k in 0..self.depth {
                let c = self.chunks[k].unwrap();
                if k + 1 == self.depth {
                    range::destroy_n(c.data.as_ptr().add(self.seg1.0), self.seg1.1);
                    range::destroy_n(c.data.as_ptr(), self.seg2);
                } else {
                    range::destroy_n(c.data.as_ptr(), c.cap);
                }
                self.alloc.deallocate(c.data, c.cap);
            }
        }
    }
}
