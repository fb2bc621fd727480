//! Raw storage state for the vector.
//!
//! [`RawStorage`] owns a single allocation together with the allocator handle
//! that produced it, tracked as a buffer pointer plus two indices: the live
//! length and the allocated capacity. Elements in `[0, len)` are live and must
//! eventually be destroyed by the owner; slots in `[len, cap)` are raw memory
//! which must never be read as values. All growth funnels through
//! [`RawStorage::try_grow_to`].

use core::marker::PhantomData;
use core::mem;
use core::ptr::{self, NonNull};

use crate::alloc::ArrayAlloc;
use crate::error::AllocError;
use crate::range;

/// The doubling growth step: 2 on the first allocation, double thereafter.
/// Saturates rather than overflowing for the unbounded capacities used by
/// zero-sized element types.
#[inline]
pub(crate) const fn next_capacity(cap: usize) -> usize {
    if cap == 0 {
        2
    } else {
        cap.saturating_mul(2)
    }
}

pub(crate) struct RawStorage<T, A: ArrayAlloc> {
    data: NonNull<T>,
    len: usize,
    cap: usize,
    alloc: A,
    _own: PhantomData<T>,
}

impl<T, A: ArrayAlloc> RawStorage<T, A> {
    /// An empty, unallocated storage using the given strategy.
    #[inline]
    pub const fn new_in(alloc: A) -> Self {
        Self {
            data: NonNull::dangling(),
            len: 0,
            cap: 0,
            alloc,
            _own: PhantomData,
        }
    }

    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, AllocError> {
        let mut storage = Self::new_in(alloc);
        storage.try_grow_to(capacity)?;
        Ok(storage)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn available(&self) -> usize {
        self.cap - self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.cap
    }

    /// Start of the allocation.
    #[inline]
    pub fn head(&self) -> *mut T {
        self.data.as_ptr()
    }

    /// One past the last live element; start of the raw tail.
    #[inline]
    pub fn live_end(&self) -> *mut T {
        unsafe { self.data.as_ptr().add(self.len) }
    }

    /// # Safety
    /// Elements in `[0, len)` must be live after this call.
    #[inline]
    pub unsafe fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.cap || mem::size_of::<T>() == 0);
        self.len = len;
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    #[inline]
    pub fn allocator_mut(&mut self) -> &mut A {
        &mut self.alloc
    }

    /// Largest capacity this storage could grow to.
    #[inline]
    pub fn max_count(&self) -> usize {
        self.alloc.max_count::<T>()
    }

    /// The capacity to request when `needed` elements must fit: the larger of
    /// `needed` and the next doubling step.
    #[inline]
    pub fn best_capacity(&self, needed: usize) -> usize {
        needed.max(next_capacity(self.cap))
    }

    /// Grow the allocation to hold at least `new_cap` elements. A no-op when
    /// the current capacity already suffices. All live elements are relocated
    /// into the new allocation and the old one is released; on error the
    /// storage is unchanged.
    pub fn try_grow_to(&mut self, new_cap: usize) -> Result<(), AllocError> {
        if new_cap <= self.cap {
            return Ok(());
        }
        if mem::size_of::<T>() == 0 {
            self.cap = usize::MAX;
            return Ok(());
        }
        if new_cap > self.alloc.max_count::<T>() {
            return Err(AllocError::CapacityOverflow);
        }
        let new_data = self.alloc.try_allocate::<T>(new_cap)?;
        unsafe {
            range::move_construct_n(new_data.as_ptr(), self.data.as_ptr(), self.len);
            self.release_allocation();
        }
        self.data = new_data;
        self.cap = new_cap;
        Ok(())
    }

    /// Reallocate down to exactly the live length, or back to the unallocated
    /// state when empty.
    pub fn shrink_to_fit(&mut self) -> Result<(), AllocError> {
        if mem::size_of::<T>() == 0 || self.cap == self.len {
            return Ok(());
        }
        if self.len == 0 {
            unsafe { self.release_allocation() };
            self.data = NonNull::dangling();
            self.cap = 0;
            return Ok(());
        }
        let new_data = self.alloc.try_allocate::<T>(self.len)?;
        unsafe {
            range::move_construct_n(new_data.as_ptr(), self.data.as_ptr(), self.len);
            self.release_allocation();
        }
        self.data = new_data;
        self.cap = self.len;
        Ok(())
    }

    /// Open `count` raw slots immediately before `index`, either by shifting
    /// the suffix in place when capacity allows, or by reallocating and
    /// splicing prefix / gap / suffix into the new array in a single pass.
    ///
    /// The live length is *not* updated: on success the live elements are
    /// `[0, index)` and `[index + count, len + count)`, and the returned
    /// cursor points at the first gap slot, which must be filled by
    /// construction before the length is advanced (moves are destructive, so
    /// the gap never holds live values). [`GapFill`] wraps this bookkeeping.
    pub fn try_open_gap(&mut self, index: usize, count: usize) -> Result<*mut T, AllocError> {
        debug_assert!(index <= self.len);
        let needed = self.len.checked_add(count).ok_or(AllocError::CapacityOverflow)?;
        if needed > self.cap && mem::size_of::<T>() == 0 {
            self.cap = usize::MAX;
        }
        if needed <= self.cap {
            unsafe {
                let pos = self.data.as_ptr().add(index);
                ptr::copy(pos, pos.add(count), self.len - index);
                Ok(pos)
            }
        } else {
            let new_cap = self.best_capacity(needed);
            if new_cap > self.alloc.max_count::<T>() {
                return Err(AllocError::CapacityOverflow);
            }
            let new_data = self.alloc.try_allocate::<T>(new_cap)?;
            unsafe {
                range::move_construct_n(new_data.as_ptr(), self.data.as_ptr(), index);
                range::move_construct_n(
                    new_data.as_ptr().add(index + count),
                    self.data.as_ptr().add(index),
                    self.len - index,
                );
                self.release_allocation();
            }
            self.data = new_data;
            self.cap = new_cap;
            Ok(unsafe { self.data.as_ptr().add(index) })
        }
    }

    /// Release the current allocation and adopt a new triple. The new buffer
    /// must come from this storage's allocator (or one interchangeable with
    /// it).
    ///
    /// # Safety
    /// `data` must point to an allocation of `cap` slots with `[0, len)` live.
    pub unsafe fn install(&mut self, data: NonNull<T>, len: usize, cap: usize) {
        self.release_allocation();
        self.data = data;
        self.len = len;
        self.cap = cap;
    }

    /// Exchange buffers with another storage, leaving both allocator handles
    /// in place.
    pub fn swap_parts(&mut self, other: &mut Self) {
        mem::swap(&mut self.data, &mut other.data);
        mem::swap(&mut self.len, &mut other.len);
        mem::swap(&mut self.cap, &mut other.cap);
    }

    /// Release the allocation without touching elements or cursors.
    ///
    /// # Safety
    /// The previous buffer must not be used again; callers either install a
    /// replacement or reset the cursors.
    unsafe fn release_allocation(&mut self) {
        if mem::size_of::<T>() != 0 && self.cap > 0 {
            self.alloc.deallocate(self.data, self.cap);
        }
    }
}

impl<T, A: ArrayAlloc> Drop for RawStorage<T, A> {
    fn drop(&mut self) {
        // live elements are the owning container's responsibility
        unsafe { self.release_allocation() };
    }
}

/// Fills a gap opened by [`RawStorage::try_open_gap`] and commits the new
/// length on drop. If the fill stops short (a panicking constructor, or a
/// source that ran dry), the elements inserted so far are kept and the
/// unfilled remainder of the hole is closed by shifting the suffix back down,
/// leaving the storage consistent.
pub(crate) struct GapFill<'a, T, A: ArrayAlloc> {
    storage: &'a mut RawStorage<T, A>,
    index: usize,
    count: usize,
    filled: usize,
}

impl<'a, T, A: ArrayAlloc> GapFill<'a, T, A> {
    /// Open a gap of `count` slots before `index` and prepare to fill it.
    pub fn open(
        storage: &'a mut RawStorage<T, A>,
        index: usize,
        count: usize,
    ) -> Result<Self, AllocError> {
        storage.try_open_gap(index, count)?;
        Ok(Self {
            storage,
            index,
            count,
            filled: 0,
        })
    }

    #[inline]
    pub fn push(&mut self, value: T) {
        debug_assert!(self.filled < self.count);
        unsafe {
            self.storage
                .data
                .as_ptr()
                .add(self.index + self.filled)
                .write(value);
        }
        self.filled += 1;
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.count - self.filled
    }
}

impl<T, A: ArrayAlloc> Drop for GapFill<'_, T, A> {
    fn drop(&mut self) {
        unsafe {
            if self.filled < self.count {
                let head = self.storage.data.as_ptr();
                ptr::copy(
                    head.add(self.index + self.count),
                    head.add(self.index + self.filled),
                    self.storage.len - self.index,
                );
            }
            let len = self.storage.len + self.filled;
            self.storage.set_len(len);
        }
    }
}
