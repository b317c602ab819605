//! # meow-providers
//!
//! Completion provider implementations for meow.

pub mod openai;
