#![allow(dead_code)]

mod assertions;
mod fixtures;

pub use assertions::{assert_all_finite, assert_rigid_state_valid, assert_within};
pub use fixtures::*;
