//! # Double-Buffered Simulation State
//!
//! ## The Problem
//!
//! ```text
//! Kernel:  WRITE new state for every node
//! Caller:  READ the latest state
//!
//! Reading the buffer being written: TORN STATE
//! Copying after every step:         O(N) per step for nothing
//! ```
//!
//! ## The Solution: Double Buffering
//!
//! ```text
//! Step N:
//!   Kernel reads Buffer A (current), writes Buffer B
//!   Callers read Buffer A
//!   Kernel returns -> flip: B is current
//!
//! Step N+1:
//!   Kernel reads Buffer B, writes Buffer A
//!   Callers read Buffer B
//! ```
//!
//! A failed step never flips, so the last good buffer stays current.

mod double_buffer;

pub use double_buffer::{StateBuffers, StepHandle};
