//! Support for memory allocation strategies.
//!
//! An [`ArrayAlloc`] is the strategy object a container is parameterized over:
//! it acquires and releases storage for arrays of elements, placement-constructs
//! and destroys individual elements, and declares the propagation policy that
//! decides whether the handle itself travels with the container's contents on
//! copy, move, and swap.

use core::alloc::Layout;
use core::fmt;
use core::mem;
use core::ptr::{self, NonNull};

#[cfg(feature = "alloc")]
use alloc_crate::alloc::{alloc as raw_alloc, dealloc as raw_dealloc};

use const_default::ConstDefault;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

use crate::error::AllocError;

#[inline]
pub(crate) fn array_layout<T>(count: usize) -> Result<Layout, AllocError> {
    Layout::array::<T>(count).map_err(AllocError::Layout)
}

/// A statically-typed memory-allocation strategy for arrays of homogeneous
/// elements.
///
/// Two instances which compare equal (or any two instances of a strategy with
/// [`IS_ALWAYS_EQUAL`](Self::IS_ALWAYS_EQUAL) set) are interchangeable: storage
/// acquired through one may be released through the other. Clones of an
/// instance must behave like the same allocator, and moving or cloning an
/// instance must not invalidate storage it has handed out.
pub trait ArrayAlloc: Clone + PartialEq + fmt::Debug {
    /// Whether a container adopting another's contents by copy assignment
    /// also adopts its allocation strategy
    const PROPAGATE_ON_COPY: bool = false;
    /// Whether the strategy travels with the allocation when a container's
    /// contents are moved into another
    const PROPAGATE_ON_MOVE: bool = false;
    /// Whether two containers exchanging storage also exchange strategies
    const PROPAGATE_ON_SWAP: bool = false;
    /// All instances of this strategy are interchangeable for releasing each
    /// other's storage, making runtime equality checks unnecessary
    const IS_ALWAYS_EQUAL: bool = false;

    /// Acquire storage for exactly `count` elements of type `T`.
    ///
    /// Requests with a zero-sized layout (`count == 0`, or `T` zero-sized)
    /// succeed with a dangling, well-aligned pointer and must not reach the
    /// underlying memory source.
    fn try_allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocError>;

    /// Release storage previously acquired for `count` elements.
    ///
    /// # Safety
    /// `ptr` must have been returned by [`try_allocate`](Self::try_allocate)
    /// on this instance (or one interchangeable with it) with the same
    /// `count`, and must not be released twice. The dangling pointer of the
    /// unallocated state must never be passed here except with a zero-sized
    /// layout, where release is a no-op.
    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize);

    /// Placement-construct an element in a raw slot.
    ///
    /// # Safety
    /// `slot` must point to properly aligned storage for a `T` that does not
    /// currently hold a live value.
    #[inline]
    unsafe fn construct<T>(&self, slot: *mut T, value: T) {
        slot.write(value);
    }

    /// Destroy an element in place without releasing its storage.
    ///
    /// # Safety
    /// `slot` must point to a live `T`, which may not be used again.
    #[inline]
    unsafe fn destroy<T>(&self, slot: *mut T) {
        ptr::drop_in_place(slot);
    }

    /// The largest element count a single allocation could theoretically hold.
    #[inline]
    fn max_count<T>(&self) -> usize {
        if mem::size_of::<T>() == 0 {
            usize::MAX
        } else {
            isize::MAX as usize / mem::size_of::<T>()
        }
    }

    /// Select the strategy instance a copied container should use.
    ///
    /// Defaults to duplicating this instance; strategies whose state must not
    /// be shared with copies may return a fresh default instead.
    #[inline]
    fn select_on_copy(&self) -> Self {
        self.clone()
    }
}

/// Strategies with a constant initializer, permitting const construction of
/// empty containers.
pub trait ArrayAllocDefault: ArrayAlloc + ConstDefault + Default {}

impl<A: ArrayAlloc + ConstDefault + Default> ArrayAllocDefault for A {}

/// The global memory allocator.
///
/// When the `alloc` feature is enabled, this strategy forwards to the
/// allocator registered with the `#[global_allocator]` attribute if there is
/// one, or the `std` crate's default.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "alloc", derive(Default, Copy))]
pub struct Global;

impl ConstDefault for Global {
    const DEFAULT: Self = Global;
}

#[cfg(feature = "alloc")]
impl ArrayAlloc for Global {
    const PROPAGATE_ON_MOVE: bool = true;
    const IS_ALWAYS_EQUAL: bool = true;

    #[inline]
    fn try_allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        let layout = array_layout::<T>(count)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        match NonNull::new(unsafe { raw_alloc(layout) }) {
            Some(ptr) => Ok(ptr.cast()),
            None => Err(AllocError::Exhausted),
        }
    }

    #[inline]
    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        let Ok(layout) = Layout::array::<T>(count) else {
            return;
        };
        if layout.size() > 0 {
            raw_dealloc(ptr.as_ptr().cast(), layout);
        }
    }
}

#[cfg(not(feature = "alloc"))]
// Stub implementation to allow Global as the default strategy type even when
// the `alloc` feature is not enabled. Any usage will result in a panic.
impl ArrayAlloc for Global {
    const IS_ALWAYS_EQUAL: bool = true;

    fn try_allocate<T>(&self, _count: usize) -> Result<NonNull<T>, AllocError> {
        unimplemented!();
    }

    unsafe fn deallocate<T>(&self, _ptr: NonNull<T>, _count: usize) {
        unimplemented!();
    }
}

/// A strategy adaptor which zeroizes memory before releasing it.
#[cfg(feature = "zeroize")]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ZeroizingAlloc<A>(pub A);

#[cfg(feature = "zeroize")]
impl<A: ConstDefault> ConstDefault for ZeroizingAlloc<A> {
    const DEFAULT: Self = ZeroizingAlloc(A::DEFAULT);
}

#[cfg(feature = "zeroize")]
impl<A: ArrayAlloc> ArrayAlloc for ZeroizingAlloc<A> {
    const PROPAGATE_ON_COPY: bool = A::PROPAGATE_ON_COPY;
    const PROPAGATE_ON_MOVE: bool = A::PROPAGATE_ON_MOVE;
    const PROPAGATE_ON_SWAP: bool = A::PROPAGATE_ON_SWAP;
    const IS_ALWAYS_EQUAL: bool = A::IS_ALWAYS_EQUAL;

    #[inline]
    fn try_allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        self.0.try_allocate(count)
    }

    #[inline]
    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        let size = mem::size_of::<T>().saturating_mul(count);
        if size > 0 {
            let bytes = core::slice::from_raw_parts_mut(ptr.as_ptr().cast::<u8>(), size);
            bytes.zeroize();
        }
        self.0.deallocate(ptr, count)
    }

    #[inline]
    fn select_on_copy(&self) -> Self {
        ZeroizingAlloc(self.0.select_on_copy())
    }
}

/// Adapts an `allocator_api2` allocator into an [`ArrayAlloc`] strategy.
///
/// The wrapped allocator cannot express a propagation policy of its own, so
/// the adaptor keeps the defaults: nothing propagates and instances are
/// compared at runtime.
#[cfg(feature = "allocator-api2")]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Api2<A>(pub A);

#[cfg(feature = "allocator-api2")]
impl<A: ConstDefault> ConstDefault for Api2<A> {
    const DEFAULT: Self = Api2(A::DEFAULT);
}

#[cfg(feature = "allocator-api2")]
impl<A> ArrayAlloc for Api2<A>
where
    A: allocator_api2::alloc::Allocator + Clone + PartialEq + fmt::Debug,
{
    #[inline]
    fn try_allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        let layout = array_layout::<T>(count)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        match self.0.allocate(layout) {
            Ok(ptr) => Ok(ptr.cast()),
            Err(_) => Err(AllocError::Exhausted),
        }
    }

    #[inline]
    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        let Ok(layout) = Layout::array::<T>(count) else {
            return;
        };
        if layout.size() > 0 {
            self.0.deallocate(ptr.cast(), layout);
        }
    }
}
