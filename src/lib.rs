//! SoulScribe prayer journal library
//!
//! This library turns a free-text description of how someone feels into a
//! structured prayer through a generative-AI service, keeps saved prayers in a
//! local journal with an "answered" lifecycle, and renders a prayer's verse as a
//! shareable portrait image.

mod cli;
mod config;
mod errors;
mod generator;
mod helper;
mod journal;
mod kv;
mod layout;
mod prayer;
mod render;
mod share;
mod storage;
mod types;
mod typesetter;

// Re-export key components
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use generator::*;
pub use helper::*;
pub use journal::*;
pub use kv::*;
pub use layout::*;
pub use prayer::*;
pub use render::*;
pub use share::*;
pub use storage::*;
pub use types::*;
pub use typesetter::*;
