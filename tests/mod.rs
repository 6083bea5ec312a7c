//! # Integration tests
//!
//! Integration tests completely external from the crate. All code written in this module could be
//! written by an external user of the crate.
//!
//! The tests check properties that should hold for any input, over matrices generated from a
//! range of seeds.
mod dispatch;
mod factorization;
