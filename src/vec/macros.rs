/// Construct a [`Vec`](crate::vec::Vec), mirroring the forms of the prelude
/// `vec!` macro, with `in <alloc>;` variants selecting the allocation
/// strategy.
#[macro_export]
macro_rules! cvec {
    (in $alloc:expr $(;)?) => (
        $crate::vec::Vec::new_in($alloc)
    );
    (in $alloc:expr; $elem:expr; $n:expr) => (
        $crate::vec::from_elem_in($elem, $n, $alloc)
    );
    (in $alloc:expr; $($x:expr),+ $(,)?) => {{
        let mut vec = $crate::vec::Vec::new_in($alloc);
        vec.extend([$($x),+]);
        vec
    }};
    () => (
        $crate::vec::Vec::new()
    );
    ($elem:expr; $n:expr) => (
        $crate::vec::from_elem($elem, $n)
    );
    ($($x:expr),+ $(,)?) => (
        $crate::vec::Vec::from([$($x),+])
    );
}
