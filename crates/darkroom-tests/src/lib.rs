//! Integration test crate for Darkroom.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every darkroom crate to verify they work together.

#[cfg(test)]
mod calculators;

#[cfg(test)]
mod metering;
