//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Vector, quaternion and matrix algebra
//! - Frame timing and delta clamping
//! - Logging setup

pub mod logging;
pub mod math;
pub mod time;
