//! Property tests: `DynamicArray` against a `Vec` model, plus the
//! capacity and lifecycle laws that hold for any operation sequence.

use proptest::prelude::*;
use ravel_alloc::CountingAllocator;
use ravel_array::{next_capacity, DynamicArray};
use ravel_test_utils::{DropLedger, Tracked};

#[derive(Clone, Debug)]
enum Op {
    Push(i64),
    PushWithin(usize),
    Pop,
    Resize(usize),
    Reserve(usize),
    ShrinkToFit,
    Truncate(usize),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i64>().prop_map(Op::Push),
        2 => any::<usize>().prop_map(Op::PushWithin),
        2 => Just(Op::Pop),
        2 => (0usize..48).prop_map(Op::Resize),
        1 => (0usize..64).prop_map(Op::Reserve),
        1 => Just(Op::ShrinkToFit),
        1 => (0usize..48).prop_map(Op::Truncate),
        1 => Just(Op::Clear),
    ]
}

/// Apply `op` to both the array and the model, returning the capacity the
/// array must have afterwards.
fn apply(array: &mut DynamicArray<Tracked>, model: &mut Vec<i64>, op: &Op) -> usize {
    let capacity = array.capacity();
    match *op {
        Op::Push(value) => {
            array.push_back(Tracked::new(value));
            model.push(value);
            if model.len() > capacity {
                next_capacity(capacity, model.len())
            } else {
                capacity
            }
        }
        Op::PushWithin(index) => {
            if model.is_empty() {
                return capacity;
            }
            let index = index % model.len();
            array.push_within(index);
            model.push(model[index]);
            if model.len() > capacity {
                next_capacity(capacity, model.len())
            } else {
                capacity
            }
        }
        Op::Pop => {
            if model.is_empty() {
                return capacity;
            }
            let popped = array.pop_back().map(|t| t.value);
            assert_eq!(popped, model.pop());
            capacity
        }
        Op::Resize(len) => {
            array.resize(len);
            model.resize(len, 0);
            capacity.max(len)
        }
        Op::Reserve(n) => {
            array.reserve(n);
            capacity.max(n)
        }
        Op::ShrinkToFit => {
            array.shrink_to_fit();
            model.len()
        }
        Op::Truncate(len) => {
            array.truncate(len);
            model.truncate(len);
            capacity
        }
        Op::Clear => {
            array.clear();
            model.clear();
            0
        }
    }
}

proptest! {
    #[test]
    fn matches_vec_model(ops in prop::collection::vec(op_strategy(), 0..64)) {
        DropLedger::reset();
        {
            let mut array = DynamicArray::new();
            let mut model = Vec::new();
            for op in &ops {
                let expected_capacity = apply(&mut array, &mut model, op);
                prop_assert_eq!(array.capacity(), expected_capacity, "after {:?}", op);
                prop_assert!(array.len() <= array.capacity());
                prop_assert_eq!(array.is_allocated(), array.capacity() > 0);
                let values: Vec<i64> = array.iter().map(|t| t.value).collect();
                prop_assert_eq!(&values, &model);
                prop_assert_eq!(DropLedger::live(), model.len());
            }
        }
        prop_assert_eq!(DropLedger::live(), 0);
    }

    #[test]
    fn pushes_from_empty_follow_powers_of_two(n in 1usize..300) {
        let mut array = DynamicArray::new();
        for i in 0..n {
            array.push_back(i as u32);
        }
        prop_assert_eq!(array.capacity(), n.next_power_of_two());
    }

    #[test]
    fn reserve_then_push_never_reallocates(n in 0usize..200) {
        let counting = CountingAllocator::new();
        let mut array = DynamicArray::new_in(&counting);
        array.reserve(n);
        let allocations = counting.stats().allocations;
        for i in 0..n {
            array.push_back(i as u64);
        }
        prop_assert_eq!(counting.stats().allocations, allocations);
        prop_assert_eq!(array.capacity(), n);
    }

    #[test]
    fn resize_down_destroys_exactly_the_difference(k in 0usize..64, j in 0usize..64) {
        let (j, k) = (j.min(k), j.max(k));
        let counting = CountingAllocator::new();
        let mut array: DynamicArray<String, _> = DynamicArray::new_in(&counting);
        array.resize(k);
        let capacity = array.capacity();
        let destroys = counting.stats().destroys;
        array.resize(j);
        prop_assert_eq!(counting.stats().destroys - destroys, (k - j) as u64);
        prop_assert_eq!(array.capacity(), capacity);
    }

    #[test]
    fn allocator_is_balanced_after_drop(ops in prop::collection::vec(0usize..40, 1..16)) {
        let counting = CountingAllocator::new();
        {
            let mut array: DynamicArray<String, _> = DynamicArray::new_in(&counting);
            for &len in &ops {
                array.resize(len);
                array.push_back(len.to_string());
            }
        }
        let stats = counting.stats();
        prop_assert_eq!(stats.live_bytes, 0);
        prop_assert_eq!(stats.outstanding_allocations(), 0);
        // Pushed values are moved in, not constructed, but still destroyed.
        prop_assert_eq!(stats.destroys, stats.constructs + ops.len() as u64);
    }
}
