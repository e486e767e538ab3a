// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! Utility modules
//!
//! Common utilities for the mlpipe CLI.

pub mod colors;

pub use colors::*;
