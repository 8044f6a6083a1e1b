//! Benchmark workloads and utilities for the Ravel containers.
//!
//! Provides deterministic operation traces so that `DynamicArray` and the
//! baseline containers replay exactly the same work:
//!
//! - [`mixed_trace`]: pushes, pops and resizes drawn from a seeded RNG
//! - [`run_trace`]: replay a trace against a `DynamicArray`
//! - [`run_trace_vec`]: replay a trace against a `Vec` baseline

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ravel_alloc::Allocator;
use ravel_array::DynamicArray;

/// Element count used by the reference benchmarks.
pub const REFERENCE_LEN: usize = 10_000;

/// One step of a benchmark trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Append the value.
    Push(u64),
    /// Remove the last element, if any.
    Pop,
    /// Set the length, default-filling new slots.
    Resize(usize),
}

/// Generate a deterministic trace of `steps` operations.
///
/// Roughly 70% pushes, 25% pops and 5% resizes to a length within
/// `max_len`, so the array drifts upward and exercises growth.
pub fn mixed_trace(steps: usize, max_len: usize, seed: u64) -> Vec<Step> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut trace = Vec::with_capacity(steps);
    for _ in 0..steps {
        let roll = rng.next_u32() % 100;
        let step = if roll < 70 {
            Step::Push(rng.next_u64())
        } else if roll < 95 {
            Step::Pop
        } else {
            Step::Resize(rng.next_u64() as usize % (max_len + 1))
        };
        trace.push(step);
    }
    trace
}

/// Replay `trace` against `array`, returning a checksum of the final contents.
pub fn run_trace<A: Allocator>(array: &mut DynamicArray<u64, A>, trace: &[Step]) -> u64 {
    for step in trace {
        match *step {
            Step::Push(value) => array.push_back(value),
            Step::Pop => {
                if !array.is_empty() {
                    array.pop_back();
                }
            }
            Step::Resize(len) => array.resize(len),
        }
    }
    checksum(array)
}

/// Replay `trace` against a `Vec`, returning the same checksum as [`run_trace`].
pub fn run_trace_vec(vec: &mut Vec<u64>, trace: &[Step]) -> u64 {
    for step in trace {
        match *step {
            Step::Push(value) => vec.push(value),
            Step::Pop => {
                vec.pop();
            }
            Step::Resize(len) => vec.resize(len, 0),
        }
    }
    checksum(vec)
}

fn checksum(values: &[u64]) -> u64 {
    values
        .iter()
        .fold(values.len() as u64, |acc, &v| acc.rotate_left(5) ^ v)
}
