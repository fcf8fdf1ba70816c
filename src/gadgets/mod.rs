// SPDX-License-Identifier: MIT
// This file is part of the zkbench-gadgets project.
// See the LICENSE file in the project root for full license information.

//! Circuit gadgets over bellpepper's constraint system.
//!
//! # Available Gadgets
//!
//! - [`num`]: field-element primitives (zero test, selection, bounded decomposition)
//! - [`assert_equal_if`] and friends: assertions that only bind when a flag is set
//! - [`BitVec`]: fixed-width unsigned integers as constrained bits, with [`Byte`] and [`Word`]
//! - [`hint`]: out-of-circuit witness computation
//! - [`floor_div`]: floor division bound by constraints
//! - [`Sha256Digest`]: streaming SHA-256 over constrained bytes
//! - [`BoundedComparator`]: comparisons of values with a bounded difference

pub mod hint;
pub mod num;

mod bitvec;
mod compare;
mod division;
mod masked;
mod sha256;

pub use bitvec::{BitVec, Byte, Word};
pub use compare::{BoundedComparator, range_check};
pub use division::{DIVISOR_BITS, IntegerDivision, QUOTIENT_BITS, bind_floor_div, floor_div};
pub use hint::Hint;
pub use masked::{assert_different_if, assert_equal_if, assert_less_if, assert_less_or_equal_if};
pub use sha256::{BLOCK_SIZE, DIGEST_SIZE, DigestState, Sha256Digest, sha256};
