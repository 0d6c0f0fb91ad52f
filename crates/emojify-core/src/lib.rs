//! # emojify-core
//!
//! Core types, traits, configuration, and the deterministic pieces of the
//! Emojify translation pipeline.

pub mod completion;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod identity;
pub mod outcome;
pub mod ratelimit;
pub mod routing;
pub mod traits;
