//! # meow-core
//!
//! Core types, collaborator traits, configuration, and error handling for the
//! meow chat relay.

pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod jid;
pub mod message;
pub mod network;
pub mod traits;
