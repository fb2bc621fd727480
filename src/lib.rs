//! A contiguous growable array with a pluggable allocation strategy.
//!
//! The container itself lives in [`vec`]; the memory-allocation strategy it is
//! parameterized over is described in [`alloc`], and the unchecked bulk
//! element operations shared by every mutating path are in [`range`].
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(test)]
#[macro_use]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc as alloc_crate;

pub mod alloc;

pub(crate) mod error;

pub mod range;

pub(crate) mod storage;

pub mod vec;

#[cfg(feature = "alloc")]
pub use self::alloc::Global;
pub use {
    self::alloc::{ArrayAlloc, ArrayAllocDefault},
    self::error::{AllocError, InsertError},
    self::range::TrivialInit,
    self::vec::Vec,
};
