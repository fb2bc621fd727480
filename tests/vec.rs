#![cfg(feature = "alloc")]

use core::cell::Cell;
use core::mem::ManuallyDrop;
use core::ops::Range;
use std::rc::Rc;

use rstest::rstest;

use contig_vec::{cvec, vec::from_elem, Vec as ContigVec};

const SLICE: &[usize] = &[1, 2, 3, 4, 5];

/// Wraps an iterator to make it single-pass with an unknown length, forcing
/// the buffer-chain path.
struct OnePass<I>(I);

impl<I: Iterator> Iterator for OnePass<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

#[derive(Debug, Default)]
struct CountLog {
    created: Cell<usize>,
    dropped: Cell<usize>,
}

#[derive(Debug)]
struct Counted(Rc<CountLog>);

impl Counted {
    fn new(log: &Rc<CountLog>) -> Self {
        log.created.set(log.created.get() + 1);
        Counted(log.clone())
    }
}

impl Clone for Counted {
    fn clone(&self) -> Self {
        Counted::new(&self.0)
    }
}

impl Drop for Counted {
    fn drop(&mut self) {
        self.0.dropped.set(self.0.dropped.get() + 1);
    }
}

#[test]
fn vec_new() {
    let v = ContigVec::<usize>::new();
    assert_eq!(v.len(), 0);
    assert_eq!(v.capacity(), 0);
}

#[test]
fn vec_with_capacity() {
    let v = ContigVec::<usize>::with_capacity(10);
    assert_eq!(v.capacity(), 10);
    assert!(v.is_empty());
}

#[test]
fn vec_check_capacity_growth() {
    let mut caps = [0usize; 10];
    let mut v = ContigVec::<usize>::new();
    for cap in caps.iter_mut() {
        v.push(1);
        *cap = v.capacity();
    }
    assert_eq!(caps, [2, 2, 4, 4, 8, 8, 8, 8, 16, 16]);
}

#[test]
fn vec_push_pop() {
    let mut v = ContigVec::<u32>::new();
    v.push(32);
    assert_eq!(v.as_slice(), &[32]);
    assert_eq!(v.pop(), Some(32));
    assert_eq!(v.pop(), None);
}

#[test]
fn vec_extend() {
    let mut v = ContigVec::<usize>::new();
    v.extend(SLICE.iter().cloned());
    assert!(v.capacity() >= SLICE.len());
    assert_eq!(v.len(), SLICE.len());
    assert_eq!(v.as_slice(), SLICE);
}

#[test]
fn vec_extend_from_slice() {
    let mut v = ContigVec::<usize>::new();
    v.extend_from_slice(SLICE);
    assert_eq!(v.as_slice(), SLICE);
}

#[test]
fn vec_from_iter() {
    let v = ContigVec::<usize>::from_iter(SLICE.iter().cloned());
    assert_eq!(v.as_slice(), SLICE);
}

#[test]
fn vec_from_slice() {
    let v = ContigVec::<usize>::from_slice(SLICE);
    assert_eq!(v.as_slice(), SLICE);
}

#[test]
fn vec_from_elem() {
    let v = from_elem(7u32, 4);
    assert_eq!(v, [7, 7, 7, 7]);
}

#[test]
fn vec_from_default() {
    let v = ContigVec::<String>::from_default(3);
    assert_eq!(v, ["", "", ""]);
}

#[test]
fn vec_macro_forms() {
    let empty: ContigVec<u32> = cvec![];
    assert!(empty.is_empty());
    let filled: ContigVec<u32> = cvec![9; 3];
    assert_eq!(filled, [9, 9, 9]);
    let listed: ContigVec<u32> = cvec![1, 2, 3];
    assert_eq!(listed, [1, 2, 3]);
}

#[test]
fn vec_clone() {
    let v = ContigVec::<usize>::from_slice(SLICE);
    let v2 = v.clone();
    assert_eq!(v, v2);
}

#[test]
fn vec_insert_erase_scenario() {
    // start empty; push 1..=5; capacities double through 2, 4, 8
    let mut v = ContigVec::<u32>::new();
    for value in 1..=5 {
        v.push(value);
    }
    assert_eq!(v.len(), 5);
    assert_eq!(v.capacity(), 8);
    v.erase(2..3);
    assert_eq!(v, [1, 2, 4, 5]);
    v.insert(2, 3);
    assert_eq!(v, [1, 2, 3, 4, 5]);
}

#[test]
fn vec_insert_aliasing_equivalence() {
    let base: ContigVec<String> =
        ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();

    let mut direct = base.clone();
    direct.insert(1, direct[3].clone());

    let mut copied_out = base.clone();
    let copy = copied_out[3].clone();
    copied_out.insert(1, copy);

    assert_eq!(direct, copied_out);
    assert_eq!(direct[1], "d");
}

#[test]
fn vec_erase_empty_range_is_noop() {
    let base: ContigVec<u32> = (0..6).collect();
    for p in 0..=base.len() {
        let mut v = base.clone();
        v.erase(p..p);
        assert_eq!(v, base);
    }
}

#[test]
fn vec_erase_middle_and_tail() {
    let mut v: ContigVec<u32> = (0..10).collect();
    v.erase(3..6);
    assert_eq!(v, [0, 1, 2, 6, 7, 8, 9]);
    // erasing through the end degrades to truncation
    v.erase(4..);
    assert_eq!(v, [0, 1, 2, 6]);
}

#[test]
fn vec_remove_and_swap_remove() {
    let mut v: ContigVec<u32> = (0..5).collect();
    assert_eq!(v.remove(1), 1);
    assert_eq!(v, [0, 2, 3, 4]);
    assert_eq!(v.swap_remove(0), 0);
    assert_eq!(v, [4, 2, 3]);
}

#[test]
fn vec_insert_from_slice() {
    let mut v = ContigVec::<u32>::new();
    v.insert_from_slice(0, &[1, 2, 3, 4]);
    assert_eq!(v, [1, 2, 3, 4]);
    v.insert_from_slice(2, &[9, 9]);
    assert_eq!(v, [1, 2, 9, 9, 3, 4]);
    v.remove(1);
    assert_eq!(v, [1, 9, 9, 3, 4]);
}

#[test]
fn vec_insert_from_iter_sized() {
    let mut v: ContigVec<u32> = (0..6).collect();
    v.insert_from_iter(3, [100, 101, 102]);
    assert_eq!(v, [0, 1, 2, 100, 101, 102, 3, 4, 5]);
}

#[test]
fn vec_insert_from_iter_single_pass() {
    let mut v: ContigVec<u32> = (0..10).collect();
    v.insert_from_iter(5, OnePass(100..200));
    let expected: std::vec::Vec<u32> = (0..5).chain(100..200).chain(5..10).collect();
    assert_eq!(v.as_slice(), expected.as_slice());
}

#[test]
fn vec_from_single_pass_iter_1000() {
    let v: ContigVec<u32> = OnePass(0..1000).collect();
    assert_eq!(v.len(), 1000);
    for (index, value) in v.iter().enumerate() {
        assert_eq!(*value, index as u32);
    }
}

#[test]
fn vec_extend_single_pass_grows_from_spare() {
    let mut v = ContigVec::<u32>::with_capacity(4);
    v.extend(OnePass(0..100));
    assert_eq!(v.len(), 100);
    assert_eq!(v[99], 99);
}

#[test]
fn vec_move_transfers_ownership() {
    let mut a: ContigVec<u32> = (0..5).collect();
    let data = a.as_ptr();
    let b = core::mem::take(&mut a);
    assert_eq!(a.len(), 0);
    assert_eq!(b, [0, 1, 2, 3, 4]);
    // the allocation moved; no element was copied
    assert_eq!(b.as_ptr(), data);
}

#[test]
fn vec_take_leaves_source_empty() {
    let mut a: ContigVec<u32> = (0..5).collect();
    let b = a.take();
    assert!(a.is_empty());
    assert_eq!(b, [0, 1, 2, 3, 4]);
}

#[test]
fn vec_assign_from_steals_compatible_storage() {
    let mut a: ContigVec<u32> = (0..5).collect();
    let mut b: ContigVec<u32> = (10..20).collect();
    let data = b.as_ptr();
    a.assign_from(&mut b);
    assert!(b.is_empty());
    assert_eq!(a.len(), 10);
    assert_eq!(a.as_ptr(), data);
}

#[rstest]
#[case::equal(1..3, &[9, 8])]
#[case::shrink(1..4, &[9])]
#[case::grow_in_place(1..2, &[9, 8, 7])]
#[case::grow_realloc(1..2, &[9, 8, 7, 6, 5, 4, 3, 2])]
#[case::pure_insert(2..2, &[7, 8, 9])]
#[case::pure_erase(1..4, &[])]
#[case::everything(0..5, &[42])]
fn vec_replace_matches_erase_then_insert(#[case] range: Range<usize>, #[case] src: &[u32]) {
    let base: ContigVec<u32> = (0..5).collect();

    let mut replaced = base.clone();
    replaced.replace(range.clone(), src.iter().cloned());

    let mut composed = base.clone();
    composed.erase(range.clone());
    composed.insert_from_iter(range.start, src.iter().cloned());

    assert_eq!(replaced, composed);
}

#[test]
fn vec_replace_single_pass_source() {
    let mut v: ContigVec<u32> = (0..8).collect();
    v.replace(2..5, OnePass(50..60));
    let expected: std::vec::Vec<u32> = (0..2).chain(50..60).chain(5..8).collect();
    assert_eq!(v.as_slice(), expected.as_slice());
}

#[test]
fn vec_assign_elem_round_trips() {
    // shorter than the current size
    let mut v: ContigVec<String> = (0..6).map(|i| i.to_string()).collect();
    v.assign_elem(2, String::from("x"));
    assert_eq!(v, ["x", "x"]);
    // equal
    v.assign_elem(2, String::from("y"));
    assert_eq!(v, ["y", "y"]);
    // longer, within capacity
    v.assign_elem(4, String::from("z"));
    assert_eq!(v, ["z", "z", "z", "z"]);
    // longer than capacity
    let cap = v.capacity();
    v.assign_elem(cap + 3, String::from("w"));
    assert_eq!(v.len(), cap + 3);
    assert!(v.iter().all(|s| s == "w"));
}

#[test]
fn vec_assign_from_slice_round_trips() {
    let mut v: ContigVec<u32> = (0..4).collect();
    v.assign_from_slice(&[7, 8]);
    assert_eq!(v, [7, 8]);
    v.assign_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(v, [1, 2, 3, 4, 5, 6, 7, 8, 9]);
    v.assign_from_slice(&[]);
    assert!(v.is_empty());
}

#[test]
fn vec_assign_from_iter_single_pass() {
    let mut v: ContigVec<String> = (0..3).map(|i| i.to_string()).collect();
    v.assign_from_iter(OnePass((10..30).map(|i| i.to_string())));
    assert_eq!(v.len(), 20);
    assert_eq!(v[0], "10");
    assert_eq!(v[19], "29");

    v.assign_from_iter(OnePass((0..2).map(|i| i.to_string())));
    assert_eq!(v.len(), 2);
    assert_eq!(v[1], "1");
}

#[test]
fn vec_resize() {
    let mut v = ContigVec::<u32>::from_slice(&[1, 2, 3]);
    v.resize(5, 10);
    assert_eq!(v, [1, 2, 3, 10, 10]);
    v.resize(2, 0);
    assert_eq!(v, [1, 2]);
}

#[test]
fn vec_resize_with() {
    let mut v = ContigVec::<u32>::from_slice(&[1, 2, 3]);
    let mut next = 10;
    v.resize_with(5, || {
        next += 1;
        next
    });
    assert_eq!(v, [1, 2, 3, 11, 12]);
}

#[test]
fn vec_resize_default() {
    let mut v = ContigVec::<u32>::from_slice(&[1, 2, 3]);
    v.resize_default(5);
    assert_eq!(v, [1, 2, 3, 0, 0]);
}

#[test]
fn vec_resize_trivial_exposes_previous_contents() {
    let mut v: ContigVec<u32> = ContigVec::from([1, 2, 3, 4]);
    let data = v.as_ptr();
    v.truncate(2);
    v.resize_trivial(4);
    // no reallocation and no writes: the old bytes are simply visible again,
    // demonstrating that trivial growth does not zero-initialize
    assert_eq!(v.as_ptr(), data);
    assert_eq!(v, [1, 2, 3, 4]);
}

#[test]
fn vec_reserve_tail_commit_trivial() {
    let mut v: ContigVec<u32> = (0..3).collect();
    let mut tail = v.reserve_tail(4);
    for (index, slot) in tail.slots().iter_mut().enumerate() {
        slot.write(10 + index as u32);
    }
    tail.commit_trivial(4);
    assert_eq!(v, [0, 1, 2, 10, 11, 12, 13]);
}

#[test]
fn vec_reserve_tail_partial_commit() {
    let mut v: ContigVec<String> = ContigVec::new();
    let mut tail = v.reserve_tail(3);
    tail.slots()[0].write(String::from("a"));
    unsafe { tail.commit(1) };
    assert_eq!(v, ["a"]);

    // dropping the region without committing publishes nothing
    let tail = v.reserve_tail(5);
    drop(tail);
    assert_eq!(v, ["a"]);
}

#[test]
fn vec_drain() {
    let mut v = ContigVec::<u32>::from_iter(0..10);
    v.drain(3..8);
    assert_eq!(&v[..], &[0, 1, 2, 8, 9]);
}

#[test]
fn vec_drain_forget() {
    let mut v = ContigVec::<u32>::from_iter(0..10);
    let _ = ManuallyDrop::new(v.drain(5..6));
    assert_eq!(&v[..], &[0, 1, 2, 3, 4]);
}

#[test]
fn vec_drain_iter() {
    let mut v = ContigVec::<u32>::from_iter(0..10);
    let mut drain = v.drain(5..8);
    assert_eq!(drain.len(), 3);
    assert_eq!(drain.next(), Some(5));
    assert_eq!(drain.next_back(), Some(7));
    assert_eq!(drain.next(), Some(6));
    assert_eq!(drain.next(), None);
    drop(drain);
    assert_eq!(&v[..], &[0, 1, 2, 3, 4, 8, 9]);
}

#[test]
fn vec_into_iter() {
    let v = ContigVec::<u32>::from_iter(0..3);
    let mut iter = v.into_iter();
    assert_eq!(iter.len(), 3);
    assert_eq!(iter.next(), Some(0));
    assert_eq!(iter.next_back(), Some(2));
    assert_eq!(iter.next(), Some(1));
    assert_eq!(iter.next(), None);
}

#[test]
fn vec_into_iter_skip() {
    let mut iter = ContigVec::<u32>::from_iter(0..3).into_iter().skip(1);
    assert_eq!(iter.next(), Some(1));
    assert_eq!(iter.next(), Some(2));
    assert_eq!(iter.next(), None);
}

#[test]
fn vec_retain() {
    let mut v = ContigVec::<u32>::from_slice(&[1, 2, 3, 4]);
    v.retain(|i| i % 2 == 0);
    assert_eq!(v, [2, 4]);
}

#[test]
fn vec_append() {
    let mut v1 = ContigVec::<u32>::from([1, 2, 3]);
    let mut v2 = ContigVec::from([4, 5, 6]);
    v1.append(&mut v2);
    assert_eq!(v1, [1, 2, 3, 4, 5, 6]);
    assert_eq!(v2, []);
}

#[test]
fn vec_append_to_empty_swaps_buffers() {
    let mut v1 = ContigVec::<u32>::new();
    let mut v2 = ContigVec::from([1, 2, 3]);
    let data = v2.as_ptr();
    v1.append(&mut v2);
    assert_eq!(v1, [1, 2, 3]);
    assert_eq!(v1.as_ptr(), data);
    assert_eq!(v2, []);
}

#[test]
fn vec_shrink_to_fit() {
    let mut v = ContigVec::<u32>::with_capacity(32);
    v.extend(0..5);
    v.shrink_to_fit();
    assert_eq!(v.capacity(), 5);
    assert_eq!(v, [0, 1, 2, 3, 4]);

    v.clear();
    v.shrink_to_fit();
    assert_eq!(v.capacity(), 0);
}

#[test]
fn vec_comparisons() {
    let a = ContigVec::<u32>::from_slice(&[1, 2, 3]);
    let b = ContigVec::<u32>::from_slice(&[1, 2, 3]);
    let c = ContigVec::<u32>::from_slice(&[1, 2, 4]);
    let shorter = ContigVec::<u32>::from_slice(&[1, 2]);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a < c);
    // the shorter sequence is less when the shared prefix ties
    assert!(shorter < a);
    assert!(c > a);
}

#[test]
fn vec_zst() {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    struct Zst;

    let mut v = ContigVec::<Zst>::new();
    v.push(Zst);
    assert_eq!(v.len(), 1);
    assert_eq!(v[0], Zst);
    assert_eq!(v.pop(), Some(Zst));
    assert_eq!(v.pop(), None);

    let mut v = ContigVec::<Zst>::new();
    v.extend([Zst, Zst, Zst]);
    v.insert(1, Zst);
    assert_eq!(v.len(), 4);
    let mut drain = v.drain(..);
    assert_eq!(drain.len(), 4);
    assert_eq!(drain.next(), Some(Zst));
    assert_eq!(drain.next_back(), Some(Zst));
    drop(drain);
    assert!(v.is_empty());
}

#[test]
fn vec_drop_balance() {
    let log = Rc::new(CountLog::default());
    {
        let mut v = ContigVec::<Counted>::new();
        for _ in 0..10 {
            v.push(Counted::new(&log));
        }
        v.insert(4, Counted::new(&log));
        v.erase(2..5);
        v.replace(1..3, (0..2).map(|_| Counted::new(&log)));
        let mut drain = v.drain(0..2);
        drain.next();
        drop(drain);
        v.truncate(3);
        v.resize_with(6, || Counted::new(&log));
    }
    assert_eq!(log.created.get(), log.dropped.get());
    assert!(log.created.get() >= 16);
}

#[test]
fn vec_net_size_accounting() {
    let mut v = ContigVec::<u32>::new();
    let mut constructed = 0usize;
    let mut erased = 0usize;
    for round in 0..50u32 {
        v.extend(0..round % 7);
        constructed += (round % 7) as usize;
        let cut = (v.len() / 3).min(2);
        v.erase(0..cut);
        erased += cut;
    }
    assert_eq!(v.len(), constructed - erased);
}

#[test]
fn vec_random_ops_match_std_vec() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(7);
    let mut model = std::vec::Vec::<u32>::new();
    let mut v = ContigVec::<u32>::new();

    for _ in 0..2000 {
        match rng.gen_range(0..6) {
            0 => {
                let value = rng.gen();
                model.push(value);
                v.push(value);
            }
            1 => {
                assert_eq!(v.pop(), model.pop());
            }
            2 => {
                let index = rng.gen_range(0..=model.len());
                let value = rng.gen();
                model.insert(index, value);
                v.insert(index, value);
            }
            3 => {
                if !model.is_empty() {
                    let index = rng.gen_range(0..model.len());
                    assert_eq!(v.remove(index), model.remove(index));
                }
            }
            4 => {
                let start = rng.gen_range(0..=model.len());
                let end = rng.gen_range(start..=model.len());
                model.drain(start..end);
                v.erase(start..end);
            }
            5 => {
                let count = rng.gen_range(0..4);
                let items: std::vec::Vec<u32> = (0..count).map(|_| rng.gen()).collect();
                let index = rng.gen_range(0..=model.len());
                model.splice(index..index, items.iter().cloned());
                v.insert_from_iter(index, items.iter().cloned());
            }
            _ => unreachable!(),
        }
        assert_eq!(v.as_slice(), model.as_slice());
    }
}

#[test]
#[cfg_attr(miri, ignore)]
fn vec_push_large() {
    let mut v = ContigVec::<u32>::new();
    let count = 1_000_000;
    v.extend(0..count);
    for index in 0..count {
        assert_eq!(v[index as usize], index);
    }
}
