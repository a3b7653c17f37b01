//! Core drivers and utilities for the sozo servo-wheel robot on no-std embedded platforms.
//!
//! For a host-side runner, see the `mock-robot` crate under `sozo-app/`.
#![no_std]

pub mod utils;
