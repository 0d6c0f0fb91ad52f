//! # emojify-providers
//!
//! Remote language model backends and the model-backed language detector.

pub mod detect;
pub mod gemini;
pub mod openai;
