//! CLI utilities for kondate
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Recipe listing formatting

#![warn(missing_docs)]

pub mod output;
