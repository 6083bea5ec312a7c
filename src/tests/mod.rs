//! # Integration tests that require a look inside the crate.
//!
//! Every module follows one small matrix through several algorithms, comparing the results of the
//! algorithms with each other and with values computed by hand.
