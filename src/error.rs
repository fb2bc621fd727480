//! Error handling.

use core::alloc::LayoutError;
use core::fmt;

/// An enumeration of error types raised when acquiring or growing storage
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The allocation strategy could not satisfy the request
    Exhausted,
    /// The requested element count has no representable memory layout
    Layout(LayoutError),
    /// A length or capacity computation overflowed `usize`
    CapacityOverflow,
}

impl AllocError {
    /// Generic description of this error
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exhausted => "Memory allocation failed",
            Self::Layout(_) => "Layout error",
            Self::CapacityOverflow => "Capacity overflow",
        }
    }

    /// Generate a panic with this error as the reason
    #[cold]
    #[inline(never)]
    pub fn panic(self) -> ! {
        panic!("{}", self.as_str());
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LayoutError> for AllocError {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AllocError {}

/// An error raised by insertion operations when storage could not be
/// acquired. Includes the value that was to be inserted.
#[derive(Clone)]
pub struct InsertError<T> {
    pub(crate) error: AllocError,
    pub(crate) value: T,
}

impl<T> InsertError<T> {
    pub(crate) fn new(error: AllocError, value: T) -> Self {
        Self { error, value }
    }

    /// Generic description of this error
    pub fn as_str(&self) -> &'static str {
        "Insertion error"
    }

    /// Get a reference to the contained `AllocError`
    pub fn error(&self) -> &AllocError {
        &self.error
    }

    /// Unwrap the inner value of this error
    pub fn into_value(self) -> T {
        self.value
    }

    /// Generate a panic with this error as the reason
    #[cold]
    #[inline(never)]
    pub fn panic(self) -> ! {
        panic!("{}: {}", self.as_str(), self.error.as_str());
    }
}

impl<T> fmt::Debug for InsertError<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}: {}", self.as_str(), self.error))
    }
}

#[cfg(feature = "std")]
impl<T> std::error::Error for InsertError<T> {}
