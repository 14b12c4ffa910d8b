// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Terminal status lines

use colored::Colorize;

/// Print a success check
pub fn print_success(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

/// Print an error cross to stderr
pub fn print_error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

