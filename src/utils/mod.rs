// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Utility modules
//!
//! Common utilities for the pipeweave CLI.

pub mod colors;

pub use colors::*;
