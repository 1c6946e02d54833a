// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use proptest::prelude::*;

use rampart_checksum::{Checksummed, rotate_xor};
use rampart_guard::Guarded;

use crate::{Stack, StackError, provenance};

#[derive(Debug, Clone)]
enum Op {
    Push(i64),
    Pop,
    Clear,
    Resize(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i64>().prop_map(Op::Push),
        3 => Just(Op::Pop),
        1 => Just(Op::Clear),
        1 => (0usize..40).prop_map(Op::Resize),
    ]
}

proptest! {
    #[test]
    fn stack_matches_vec_model(ops in proptest::collection::vec(op(), 0..200)) {
        let mut stack = Stack::<i64, Guarded, Checksummed>::new(provenance!("model"))
            .expect("Failed to new(..)");
        let mut model: Vec<i64> = Vec::new();

        for op in ops {
            match op {
                Op::Push(v) => {
                    stack.push(v).expect("Failed to push(..)");
                    model.push(v);
                }
                Op::Pop => match model.pop() {
                    Some(v) => {
                        prop_assert_eq!(stack.pop(), Ok(v));
                    }
                    None => {
                        prop_assert_eq!(stack.pop(), Err(StackError::EmptyPop));
                    }
                },
                Op::Clear => {
                    stack.clear().expect("Failed to clear()");
                    model.clear();
                }
                Op::Resize(n) => {
                    stack.resize(n).expect("Failed to resize(..)");
                    model.truncate(n.max(1));
                    prop_assert_eq!(stack.capacity(), n.max(1));
                }
            }

            prop_assert_eq!(stack.len(), model.len());
            prop_assert!(stack.len() <= stack.capacity());
            prop_assert_eq!(stack.verify(), Ok(()));

            let bytes: Vec<u8> = model.iter().flat_map(|v| v.to_ne_bytes()).collect();
            prop_assert_eq!(stack.checksum(), rotate_xor(&bytes));
        }
    }

    #[test]
    fn pushes_grow_to_next_power_of_two(n in 1usize..300) {
        let mut stack = Stack::<u8, Guarded, Checksummed>::new(provenance!("grow"))
            .expect("Failed to new(..)");

        for i in 0..n {
            stack.push(i as u8).expect("Failed to push(..)");
        }

        prop_assert_eq!(stack.capacity(), n.next_power_of_two());
    }

    #[test]
    fn any_live_byte_flip_is_detected(
        values in proptest::collection::vec(any::<u32>(), 1..32),
        index in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let mut stack = Stack::<u32, Guarded, Checksummed>::new(provenance!("flip"))
            .expect("Failed to new(..)");
        for v in &values {
            stack.push(*v).expect("Failed to push(..)");
        }

        let bytes = stack.live_bytes_mut();
        let at = index.index(bytes.len());
        bytes[at] ^= 1 << bit;

        prop_assert_eq!(stack.verify(), Err(StackError::HashMismatch));

        // Restore so drop stays silent.
        stack.live_bytes_mut()[at] ^= 1 << bit;
    }
}
