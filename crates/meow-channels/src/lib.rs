//! # meow-channels
//!
//! Messaging transports for meow.

pub mod mime;
pub mod whatsapp;
