//! The vector container.

use core::borrow::{Borrow, BorrowMut};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem::{self, needs_drop, ManuallyDrop, MaybeUninit};
use core::ops::{Bound, Deref, DerefMut, Range, RangeBounds};
use core::ptr;
use core::slice;

use const_default::ConstDefault;

use crate::alloc::{ArrayAlloc, ArrayAllocDefault, Global};
use crate::error::{AllocError, InsertError};
use crate::range::{self, TrivialInit};
use crate::storage::{GapFill, RawStorage};

use self::chain::BufferChain;

pub use self::{drain::Drain, into_iter::IntoIter, tail::TailSlots};

mod chain;
mod drain;
mod into_iter;
mod macros;
mod tail;

#[cfg(all(feature = "alloc", feature = "zeroize"))]
/// A `Vec` which zeroizes its buffer whenever storage is released.
pub type ZeroizingVec<T> = Vec<T, crate::alloc::ZeroizingAlloc<Global>>;

#[cold]
#[inline(never)]
pub(crate) fn index_panic() -> ! {
    panic!("Invalid element index");
}

#[inline]
fn bounds_to_range(range: impl RangeBounds<usize>, length: usize) -> Range<usize> {
    let start = match range.start_bound() {
        Bound::Unbounded => 0,
        Bound::Included(i) => *i,
        Bound::Excluded(i) => *i + 1,
    };
    let end = match range.end_bound() {
        Bound::Unbounded => length,
        Bound::Included(i) => *i + 1,
        Bound::Excluded(i) => *i,
    };
    Range { start, end }
}

#[cfg(feature = "alloc")]
#[inline]
/// Create a `Vec<T>` containing `count` clones of `elem`.
pub fn from_elem<T: Clone>(elem: T, count: usize) -> Vec<T, Global> {
    let mut vec = Vec::with_capacity(count);
    vec.resize(count, elem);
    vec
}

#[inline]
/// Create a `Vec<T, A>` containing `count` clones of `elem`, using the given
/// allocation strategy.
pub fn from_elem_in<T: Clone, A: ArrayAlloc>(elem: T, count: usize, alloc: A) -> Vec<T, A> {
    let mut vec = Vec::with_capacity_in(count, alloc);
    vec.resize(count, elem);
    vec
}

/// A contiguous growable array parameterized over its memory-allocation
/// strategy.
///
/// Elements live in a single allocation obtained from the strategy `A`;
/// `[0, len)` holds constructed values and `[len, capacity)` is raw memory.
/// Growth follows a doubling policy (0 → 2 → 4 → 8 → …) and all of it passes
/// through one reallocation choke point.
#[repr(transparent)]
pub struct Vec<T, A: ArrayAlloc = Global> {
    pub(crate) storage: RawStorage<T, A>,
}

impl<T, A: ArrayAllocDefault> Vec<T, A> {
    /// Constructs a new, empty `Vec<T, A>`.
    ///
    /// The vector will not allocate until elements are pushed onto it.
    pub const fn new() -> Self {
        Self {
            storage: RawStorage::new_in(A::DEFAULT),
        }
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Ok(Self {
            storage: RawStorage::try_with_capacity_in(capacity, A::DEFAULT)?,
        })
    }

    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(res) => res,
            Err(error) => error.panic(),
        }
    }

    pub fn from_slice(data: &[T]) -> Self
    where
        T: Clone,
    {
        let mut vec = Self::with_capacity(data.len());
        vec.extend_from_slice(data);
        vec
    }

    /// Constructs a `Vec<T, A>` holding `count` default-constructed elements.
    pub fn from_default(count: usize) -> Self
    where
        T: Default,
    {
        let mut vec = Self::with_capacity(count);
        vec.resize_default(count);
        vec
    }

    pub fn try_from_slice(data: &[T]) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let mut vec = Self::try_with_capacity(data.len())?;
        vec.extend_from_slice(data);
        Ok(vec)
    }
}

impl<T, A: ArrayAlloc> Vec<T, A> {
    /// Constructs a new, empty `Vec<T, A>` using the given strategy instance.
    pub const fn new_in(alloc: A) -> Self {
        Self {
            storage: RawStorage::new_in(alloc),
        }
    }

    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, AllocError> {
        Ok(Self {
            storage: RawStorage::try_with_capacity_in(capacity, alloc)?,
        })
    }

    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        match Self::try_with_capacity_in(capacity, alloc) {
            Ok(res) => res,
            Err(error) => error.panic(),
        }
    }

    pub fn from_slice_in(data: &[T], alloc: A) -> Self
    where
        T: Clone,
    {
        let mut vec = Self::with_capacity_in(data.len(), alloc);
        vec.extend_from_slice(data);
        vec
    }
}

impl<T, A: ArrayAlloc> Vec<T, A> {
    #[inline]
    fn into_storage(self) -> RawStorage<T, A> {
        let me = ManuallyDrop::new(self);
        unsafe { ptr::read(&me.storage) }
    }

    /// The strategy instance backing this vector.
    #[inline]
    pub fn allocator(&self) -> &A {
        self.storage.allocator()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.head()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.head()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Whether the live length has reached the allocated capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.storage.is_full()
    }

    /// Number of elements that can be inserted before the next reallocation.
    #[inline]
    pub fn available(&self) -> usize {
        self.storage.available()
    }

    /// The theoretical largest length this vector could reach.
    #[inline]
    pub fn max_count(&self) -> usize {
        self.storage.max_count()
    }

    /// # Safety
    /// Elements in `[0, length)` must be live, and `length` must not exceed
    /// the capacity.
    #[inline]
    pub unsafe fn set_len(&mut self, length: usize) {
        self.storage.set_len(length)
    }

    /// The raw tail `[len, capacity)` as uninitialized slots.
    #[inline]
    pub fn spare_capacity_mut(&mut self) -> &mut [MaybeUninit<T>] {
        unsafe {
            slice::from_raw_parts_mut(self.storage.live_end().cast(), self.storage.available())
        }
    }

    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        match self.try_reserve(additional) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    #[inline]
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        self.reserve_inner(additional, false)
    }

    #[inline]
    pub fn reserve_exact(&mut self, additional: usize) {
        match self.try_reserve_exact(additional) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    #[inline]
    pub fn try_reserve_exact(&mut self, additional: usize) -> Result<(), AllocError> {
        self.reserve_inner(additional, true)
    }

    fn reserve_inner(&mut self, additional: usize, exact: bool) -> Result<(), AllocError> {
        let needed = self
            .storage
            .len()
            .checked_add(additional)
            .ok_or(AllocError::CapacityOverflow)?;
        if needed <= self.storage.capacity() {
            return Ok(());
        }
        let capacity = if exact {
            needed
        } else {
            self.storage.best_capacity(needed)
        };
        self.storage.try_grow_to(capacity)
    }

    #[inline]
    pub fn shrink_to_fit(&mut self) {
        match self.try_shrink_to_fit() {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    #[inline]
    pub fn try_shrink_to_fit(&mut self) -> Result<(), AllocError> {
        self.storage.shrink_to_fit()
    }

    pub fn push(&mut self, value: T) {
        match self.try_push(value) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    pub fn try_push(&mut self, value: T) -> Result<(), InsertError<T>> {
        if self.storage.is_full() {
            let capacity = self.storage.best_capacity(self.storage.len() + 1);
            if let Err(error) = self.storage.try_grow_to(capacity) {
                return Err(InsertError::new(error, value));
            }
        }
        unsafe { self.push_unchecked(value) };
        Ok(())
    }

    /// # Safety
    /// The vector must not be full.
    #[inline]
    pub unsafe fn push_unchecked(&mut self, value: T) {
        debug_assert!(!self.storage.is_full());
        let length = self.storage.len();
        self.storage.live_end().write(value);
        self.storage.set_len(length + 1);
    }

    pub fn pop(&mut self) -> Option<T> {
        let length = self.storage.len();
        if length > 0 {
            unsafe {
                self.storage.set_len(length - 1);
                Some(self.storage.live_end().read())
            }
        } else {
            None
        }
    }

    pub fn insert(&mut self, index: usize, value: T) {
        match self.try_insert(index, value) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Insert `value` before `index`, shifting the suffix up.
    ///
    /// The value is taken by ownership, so it can never alias an element of
    /// this vector; inserting a copy of an existing element is written
    /// `v.insert(i, v[j].clone())`.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), InsertError<T>> {
        let length = self.storage.len();
        if index > length {
            index_panic();
        }
        if index == length {
            return self.try_push(value);
        }
        match self.storage.try_open_gap(index, 1) {
            Ok(gap) => {
                unsafe {
                    gap.write(value);
                    self.storage.set_len(length + 1);
                }
                Ok(())
            }
            Err(error) => Err(InsertError::new(error, value)),
        }
    }

    /// Insert a clone of every element of `values` before `index`.
    pub fn insert_from_slice(&mut self, index: usize, values: &[T])
    where
        T: Clone,
    {
        match self.try_insert_from_slice(index, values) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    pub fn try_insert_from_slice(&mut self, index: usize, values: &[T]) -> Result<(), AllocError>
    where
        T: Clone,
    {
        let length = self.storage.len();
        if index > length {
            index_panic();
        }
        if values.is_empty() {
            return Ok(());
        }
        let mut gap = GapFill::open(&mut self.storage, index, values.len())?;
        for value in values {
            gap.push(value.clone());
        }
        Ok(())
    }

    /// Insert every element produced by `src` before `index`.
    ///
    /// Sources reporting an exact length open a single pre-sized gap; all
    /// others are routed through the buffer-chain fallback, which allocates
    /// successively larger buffers and recombines them in one final pass.
    pub fn insert_from_iter<I>(&mut self, index: usize, src: I)
    where
        I: IntoIterator<Item = T>,
    {
        if index > self.storage.len() {
            index_panic();
        }
        let mut iter = src.into_iter();
        if let Some(first) = iter.next() {
            self.insert_pending(index, first, iter);
        }
    }

    fn insert_pending(&mut self, index: usize, first: T, mut iter: impl Iterator<Item = T>) {
        if index == self.storage.len() {
            self.push(first);
            self.extend_inner(iter);
            return;
        }
        match iter.size_hint() {
            (low, Some(high)) if low == high => {
                let count = low + 1;
                let mut gap = match GapFill::open(&mut self.storage, index, count) {
                    Ok(gap) => gap,
                    Err(error) => error.panic(),
                };
                gap.push(first);
                while gap.remaining() > 0 {
                    match iter.next() {
                        Some(value) => gap.push(value),
                        None => break,
                    }
                }
                let filled = gap.remaining() == 0;
                drop(gap);
                // a source that out-delivers its hint continues after the gap
                if filled {
                    if let Some(next) = iter.next() {
                        self.insert_pending(index + count, next, iter);
                    }
                }
            }
            _ => self.insert_chain(index, first, iter),
        }
    }

    // Unknown-length fallback: the chain holds only the new elements; the
    // prefix and suffix are moved around them once the source is exhausted.
    fn insert_chain(&mut self, index: usize, first: T, mut iter: impl Iterator<Item = T>) {
        let length = self.storage.len();
        let mut chain = BufferChain::new_in(
            self.allocator().clone(),
            index,
            length,
            self.storage.capacity(),
            first,
        );
        if let Err(error) = chain.run(&mut iter) {
            error.panic()
        }
        match chain.finish() {
            Ok((data, capacity, end)) => unsafe {
                range::move_construct_n(data.as_ptr(), self.storage.head(), index);
                range::move_construct_n(
                    data.as_ptr().add(end),
                    self.storage.head().add(index),
                    length - index,
                );
                self.storage.install(data, length + (end - index), capacity);
            },
            Err(error) => error.panic(),
        }
    }

    fn extend_inner(&mut self, mut iter: impl Iterator<Item = T>) {
        let hint = iter.size_hint().0;
        if hint > self.storage.available() {
            match self.reserve_inner(hint, false) {
                Ok(_) => (),
                Err(error) => error.panic(),
            }
        }
        let length = self.storage.len();
        let room = self.storage.available();
        let written =
            unsafe { range::checked_construct_from_iter(self.storage.live_end(), room, &mut iter) };
        unsafe { self.storage.set_len(length + written) };
        if let Some(first) = iter.next() {
            self.insert_chain(self.storage.len(), first, iter);
        }
    }

    pub fn extend_from_slice(&mut self, values: &[T])
    where
        T: Clone,
    {
        match self.try_extend_from_slice(values) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    pub fn try_extend_from_slice(&mut self, values: &[T]) -> Result<(), AllocError>
    where
        T: Clone,
    {
        self.reserve_inner(values.len(), false)?;
        unsafe {
            range::copy_construct_from_slice(self.storage.live_end(), values);
            let length = self.storage.len();
            self.storage.set_len(length + values.len());
        }
        Ok(())
    }

    /// Remove and return the element at `index`, shifting the suffix down.
    pub fn remove(&mut self, index: usize) -> T {
        let length = self.storage.len();
        if index >= length {
            index_panic();
        }
        unsafe {
            let pos = self.storage.head().add(index);
            let value = pos.read();
            ptr::copy(pos.add(1), pos, length - index - 1);
            self.storage.set_len(length - 1);
            value
        }
    }

    /// Remove and return the element at `index`, replacing it with the last
    /// element instead of shifting.
    pub fn swap_remove(&mut self, index: usize) -> T {
        let length = self.storage.len();
        if index >= length {
            index_panic();
        }
        unsafe {
            self.storage.set_len(length - 1);
            let last = self.storage.live_end();
            let pos = self.storage.head().add(index);
            let value = pos.read();
            if pos != last {
                pos.write(last.read());
            }
            value
        }
    }

    /// Remove the elements in `range`, shifting the suffix down. Erasing a
    /// trailing range degrades to a pure truncation; an empty range is a
    /// no-op.
    pub fn erase<R>(&mut self, range: R)
    where
        R: RangeBounds<usize>,
    {
        drop(self.drain(range));
    }

    /// Remove the elements in `range`, yielding them as an iterator. Elements
    /// not consumed are dropped and the suffix is healed when the iterator
    /// is.
    pub fn drain<R>(&mut self, range: R) -> Drain<'_, T, A>
    where
        R: RangeBounds<usize>,
    {
        let range = bounds_to_range(range, self.storage.len());
        Drain::new(self, range)
    }

    pub fn truncate(&mut self, length: usize) {
        let old_len = self.storage.len();
        if length < old_len {
            unsafe {
                self.storage.set_len(length);
                range::destroy_n(self.storage.head().add(length), old_len - length);
            }
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    #[inline]
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        match self.try_resize(new_len, value) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    pub fn try_resize(&mut self, new_len: usize, value: T) -> Result<(), AllocError>
    where
        T: Clone,
    {
        let length = self.storage.len();
        match new_len.cmp(&length) {
            Ordering::Greater => {
                self.reserve_inner(new_len - length, false)?;
                unsafe {
                    range::construct_fill_n(self.storage.live_end(), new_len - length, &value);
                    self.storage.set_len(new_len);
                }
            }
            Ordering::Less => self.truncate(new_len),
            Ordering::Equal => {}
        }
        Ok(())
    }

    #[inline]
    pub fn resize_with<F>(&mut self, new_len: usize, f: F)
    where
        F: FnMut() -> T,
    {
        match self.try_resize_with(new_len, f) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    pub fn try_resize_with<F>(&mut self, new_len: usize, f: F) -> Result<(), AllocError>
    where
        F: FnMut() -> T,
    {
        let length = self.storage.len();
        match new_len.cmp(&length) {
            Ordering::Greater => {
                self.reserve_inner(new_len - length, false)?;
                unsafe {
                    range::construct_with_n(self.storage.live_end(), new_len - length, f);
                    self.storage.set_len(new_len);
                }
            }
            Ordering::Less => self.truncate(new_len),
            Ordering::Equal => {}
        }
        Ok(())
    }

    /// Grow or shrink to `new_len`, default-constructing any new elements.
    #[inline]
    pub fn resize_default(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }

    /// Grow or shrink to `new_len` without writing the new elements.
    ///
    /// New elements hold unspecified values: whatever bytes the raw tail
    /// already contained become visible. They are NOT guaranteed to be zero.
    /// This is only offered for types where any bit pattern is valid; use
    /// [`resize`](Self::resize) with an explicit exemplar to get known
    /// contents.
    pub fn resize_trivial(&mut self, new_len: usize)
    where
        T: TrivialInit,
    {
        let length = self.storage.len();
        if new_len > length {
            self.reserve(new_len - length);
            unsafe { self.storage.set_len(new_len) };
        } else {
            self.truncate(new_len);
        }
    }

    #[inline]
    pub fn assign_elem(&mut self, count: usize, value: T)
    where
        T: Clone,
    {
        match self.try_assign_elem(count, value) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Replace the entire contents with `count` clones of `value`, reusing
    /// the existing storage and live elements where possible.
    pub fn try_assign_elem(&mut self, count: usize, value: T) -> Result<(), AllocError>
    where
        T: Clone,
    {
        let length = self.storage.len();
        if count == 0 {
            self.clear();
        } else if !needs_drop::<T>() || count > self.storage.capacity() {
            // clearing is free, or a reallocation is unavoidable
            self.clear();
            self.reserve_inner(count, true)?;
            unsafe {
                range::construct_fill_n(self.storage.head(), count, &value);
                self.storage.set_len(count);
            }
        } else if count <= length {
            unsafe {
                range::assign_fill_n(self.storage.head(), count, &value);
            }
            self.truncate(count);
        } else {
            unsafe {
                range::assign_fill_n(self.storage.head(), length, &value);
                range::construct_fill_n(self.storage.live_end(), count - length, &value);
                self.storage.set_len(count);
            }
        }
        Ok(())
    }

    #[inline]
    pub fn assign_from_slice(&mut self, values: &[T])
    where
        T: Clone,
    {
        match self.try_assign_from_slice(values) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    pub fn try_assign_from_slice(&mut self, values: &[T]) -> Result<(), AllocError>
    where
        T: Clone,
    {
        let count = values.len();
        let length = self.storage.len();
        if !needs_drop::<T>() || count > self.storage.capacity() {
            self.clear();
            self.reserve_inner(count, true)?;
            unsafe {
                range::copy_construct_from_slice(self.storage.head(), values);
                self.storage.set_len(count);
            }
        } else if count <= length {
            unsafe {
                range::assign_from_slice(self.storage.head(), values);
            }
            self.truncate(count);
        } else {
            unsafe {
                range::assign_from_slice(self.storage.head(), &values[..length]);
                range::copy_construct_from_slice(self.storage.live_end(), &values[length..]);
                self.storage.set_len(count);
            }
        }
        Ok(())
    }

    /// Replace the entire contents from a sequence traversed once: the live
    /// prefix is overwritten by assignment, then the remainder is truncated
    /// or appended.
    pub fn assign_from_iter<I>(&mut self, src: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut iter = src.into_iter();
        if !needs_drop::<T>() {
            self.clear();
            self.extend_inner(iter);
        } else {
            let length = self.storage.len();
            let assigned = unsafe {
                range::checked_assign_from_iter(self.storage.head(), length, &mut iter)
            };
            match iter.next() {
                None => self.truncate(assigned),
                Some(first) => {
                    self.push(first);
                    self.extend_inner(iter);
                }
            }
        }
    }

    /// Replace the elements in `range` with the elements of `src`, fused into
    /// one pass: the overlapping prefix is assigned in place, then a
    /// shrinking replacement erases the excess while a growing one opens a
    /// single gap (or performs a single prefix / new / suffix splice when the
    /// growth exceeds the available capacity). Equivalent to `erase(range)`
    /// followed by inserting `src` at the erased position, without the double
    /// suffix move.
    pub fn replace<R, I>(&mut self, range: R, src: I)
    where
        R: RangeBounds<usize>,
        I: IntoIterator<Item = T>,
    {
        let length = self.storage.len();
        let Range { start, end } = bounds_to_range(range, length);
        if start > end || end > length {
            index_panic();
        }
        let mut iter = src.into_iter();
        let assigned = unsafe {
            range::checked_assign_from_iter(self.storage.head().add(start), end - start, &mut iter)
        };
        match iter.next() {
            None => self.erase(start + assigned..end),
            Some(first) => self.insert_pending(end, first, iter),
        }
    }

    /// Move every element of `other` to the end of this vector, leaving
    /// `other` empty. When this vector is empty and the two strategies are
    /// interchangeable the buffers are exchanged outright.
    pub fn append(&mut self, other: &mut Self) {
        if self.storage.is_empty()
            && (A::IS_ALWAYS_EQUAL || self.allocator() == other.allocator())
        {
            self.storage.swap_parts(&mut other.storage);
        } else if !other.is_empty() {
            self.reserve(other.len());
            unsafe {
                let length = self.storage.len();
                let moved = other.storage.len();
                range::move_construct_n(self.storage.live_end(), other.storage.head(), moved);
                other.storage.set_len(0);
                self.storage.set_len(length + moved);
            }
        }
    }

    /// Adopt the contents of `other`, leaving it empty.
    ///
    /// When the strategy propagates on move, or the two instances are
    /// interchangeable, ownership of the allocation transfers directly.
    /// Otherwise every element is relocated individually into storage
    /// acquired from this vector's own strategy.
    pub fn assign_from(&mut self, other: &mut Self) {
        self.clear();
        if A::PROPAGATE_ON_MOVE {
            self.storage.swap_parts(&mut other.storage);
            mem::swap(self.storage.allocator_mut(), other.storage.allocator_mut());
        } else if A::IS_ALWAYS_EQUAL || self.allocator() == other.allocator() {
            self.storage.swap_parts(&mut other.storage);
        } else {
            self.reserve(other.len());
            unsafe {
                let moved = other.storage.len();
                range::move_construct_n(self.storage.head(), other.storage.head(), moved);
                other.storage.set_len(0);
                self.storage.set_len(moved);
            }
        }
    }

    /// Exchange contents with `other`. Strategy handles travel with the
    /// storage only when the strategy propagates on swap; otherwise the two
    /// instances must be interchangeable.
    pub fn swap_storage(&mut self, other: &mut Self) {
        debug_assert!(
            A::PROPAGATE_ON_SWAP
                || A::IS_ALWAYS_EQUAL
                || self.allocator() == other.allocator(),
            "swapped storage between unequal non-propagating allocators"
        );
        self.storage.swap_parts(&mut other.storage);
        if A::PROPAGATE_ON_SWAP {
            mem::swap(self.storage.allocator_mut(), other.storage.allocator_mut());
        }
    }

    /// Take the contents, leaving this vector empty with a duplicate of its
    /// strategy handle.
    pub fn take(&mut self) -> Self {
        let alloc = self.allocator().clone();
        mem::replace(self, Self::new_in(alloc))
    }

    #[inline]
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.retain_mut(|value| f(value))
    }

    pub fn retain_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        let orig_len = self.storage.len();
        if orig_len == 0 {
            return;
        }
        unsafe { self.storage.set_len(0) };
        let head = self.storage.head();
        let mut tail = head;
        let mut length = 0;
        for index in 0..orig_len {
            unsafe {
                let read = head.add(index);
                if f(&mut *read) {
                    if tail != read {
                        ptr::copy_nonoverlapping(read, tail, 1);
                    }
                    tail = tail.add(1);
                    length += 1;
                } else {
                    ptr::drop_in_place(read);
                }
            }
        }
        unsafe { self.storage.set_len(length) };
    }
}

impl<T, A: ArrayAlloc> AsRef<[T]> for Vec<T, A> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, A: ArrayAlloc> AsMut<[T]> for Vec<T, A> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T, A: ArrayAlloc> Borrow<[T]> for Vec<T, A> {
    #[inline]
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T, A: ArrayAlloc> BorrowMut<[T]> for Vec<T, A> {
    #[inline]
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Clone, A: ArrayAlloc> Clone for Vec<T, A> {
    fn clone(&self) -> Self {
        let mut vec = Self::with_capacity_in(self.len(), self.allocator().select_on_copy());
        vec.extend_from_slice(self);
        vec
    }

    fn clone_from(&mut self, source: &Self) {
        if A::PROPAGATE_ON_COPY {
            if !(A::IS_ALWAYS_EQUAL || self.allocator() == source.allocator()) {
                // the incoming handle cannot release our storage
                self.clear();
                let _ = self.storage.shrink_to_fit();
            }
            *self.storage.allocator_mut() = source.allocator().clone();
        }
        self.assign_from_slice(source);
    }
}

impl<T: fmt::Debug, A: ArrayAlloc> fmt::Debug for Vec<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().fmt(f)
    }
}

impl<T, A: ArrayAllocDefault> Default for Vec<T, A> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: ArrayAllocDefault> ConstDefault for Vec<T, A> {
    const DEFAULT: Self = Self::new();
}

impl<T, A: ArrayAlloc> Deref for Vec<T, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        unsafe { slice::from_raw_parts(self.storage.head(), self.storage.len()) }
    }
}

impl<T, A: ArrayAlloc> DerefMut for Vec<T, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { slice::from_raw_parts_mut(self.storage.head(), self.storage.len()) }
    }
}

impl<T, A: ArrayAlloc> Drop for Vec<T, A> {
    fn drop(&mut self) {
        // destroy the live elements; the storage releases the allocation
        let length = self.storage.len();
        if length > 0 {
            unsafe {
                self.storage.set_len(0);
                range::destroy_n(self.storage.head(), length);
            }
        }
    }
}

impl<T, A: ArrayAlloc> Extend<T> for Vec<T, A> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.extend_inner(iter.into_iter());
    }
}

impl<'a, T: Clone + 'a, A: ArrayAlloc> Extend<&'a T> for Vec<T, A> {
    #[inline]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend_inner(iter.into_iter().cloned());
    }
}

impl<T, A: ArrayAllocDefault> FromIterator<T> for Vec<T, A> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut vec = Self::with_capacity(iter.size_hint().0);
        vec.extend_inner(iter);
        vec
    }
}

// If a particular allocator is not `Send`/`Sync` then the strategy type must
// reflect that.
unsafe impl<T: Send, A: ArrayAlloc + Send> Send for Vec<T, A> {}
unsafe impl<T: Sync, A: ArrayAlloc + Sync> Sync for Vec<T, A> {}

impl<T: Clone, A: ArrayAllocDefault> From<&[T]> for Vec<T, A> {
    #[inline]
    fn from(data: &[T]) -> Self {
        Self::from_slice(data)
    }
}

impl<T: Clone, A: ArrayAllocDefault> From<&mut [T]> for Vec<T, A> {
    #[inline]
    fn from(data: &mut [T]) -> Self {
        Self::from_slice(data)
    }
}

impl<T: Clone, A: ArrayAllocDefault, const N: usize> From<&[T; N]> for Vec<T, A> {
    #[inline]
    fn from(data: &[T; N]) -> Self {
        Self::from_slice(data)
    }
}

impl<T, A: ArrayAllocDefault, const N: usize> From<[T; N]> for Vec<T, A> {
    #[inline]
    fn from(data: [T; N]) -> Self {
        Self::from_iter(data)
    }
}

impl<T, A: ArrayAlloc> IntoIterator for Vec<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.into_storage())
    }
}

impl<'a, T, A: ArrayAlloc> IntoIterator for &'a Vec<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, A: ArrayAlloc> IntoIterator for &'a mut Vec<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T1, A1, T2, A2> PartialEq<Vec<T2, A2>> for Vec<T1, A1>
where
    A1: ArrayAlloc,
    A2: ArrayAlloc,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &Vec<T2, A2>) -> bool {
        self.as_slice().eq(other.as_slice())
    }
}

impl<T: Eq, A: ArrayAlloc> Eq for Vec<T, A> {}

impl<T1, A1, T2> PartialEq<&[T2]> for Vec<T1, A1>
where
    T1: PartialEq<T2>,
    A1: ArrayAlloc,
{
    #[inline]
    fn eq(&self, other: &&[T2]) -> bool {
        self.as_slice().eq(*other)
    }
}

impl<T1, A1, T2> PartialEq<[T2]> for Vec<T1, A1>
where
    T1: PartialEq<T2>,
    A1: ArrayAlloc,
{
    #[inline]
    fn eq(&self, other: &[T2]) -> bool {
        self.as_slice().eq(other)
    }
}

impl<T1, A1, T2, const N: usize> PartialEq<[T2; N]> for Vec<T1, A1>
where
    T1: PartialEq<T2>,
    A1: ArrayAlloc,
{
    #[inline]
    fn eq(&self, other: &[T2; N]) -> bool {
        self.as_slice().eq(&other[..])
    }
}

impl<T1, A1, T2, const N: usize> PartialEq<&[T2; N]> for Vec<T1, A1>
where
    T1: PartialEq<T2>,
    A1: ArrayAlloc,
{
    #[inline]
    fn eq(&self, other: &&[T2; N]) -> bool {
        self.as_slice().eq(&other[..])
    }
}

impl<T1, T2, A2> PartialEq<Vec<T2, A2>> for [T1]
where
    T2: PartialEq<T1>,
    A2: ArrayAlloc,
{
    #[inline]
    fn eq(&self, other: &Vec<T2, A2>) -> bool {
        other.eq(self)
    }
}

/// Lexicographic ordering: the shorter sequence is less only when every
/// element of the shared prefix compares equal.
impl<T, A1, A2> PartialOrd<Vec<T, A2>> for Vec<T, A1>
where
    T: PartialOrd,
    A1: ArrayAlloc,
    A2: ArrayAlloc,
{
    #[inline]
    fn partial_cmp(&self, other: &Vec<T, A2>) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, A: ArrayAlloc> Ord for Vec<T, A> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash, A: ArrayAlloc> Hash for Vec<T, A> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}
