//! Error types for the soulscribe journal.
//!
//! This module defines the error type shared by the store, the renderer and the
//! generation client. Callers only distinguish success from failure; the variants
//! exist for logging and for the CLI's messages.

use std::io;

use thiserror::Error;

/// The main error type for the soulscribe application.
#[derive(Error, Debug)]
pub enum JournalError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport-level failures talking to the generation service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The generation service answered, but not with a usable prayer.
    #[error("Prayer generation failed: {message}")]
    Generation { message: String },

    /// The raster surface could not be created or encoded.
    #[error("Render surface unavailable: {message}")]
    RenderSurface { message: String },

    /// A font face could not be loaded.
    #[error("Font error: {message}")]
    Font { message: String },

    /// A lifecycle transition that the record does not allow.
    #[error("Invalid transition for record {id}: {message}")]
    InvalidTransition { id: String, message: String },

    /// Record was not found when performing an operation.
    #[error("Record not found: {id}")]
    RecordNotFound { id: String },

    /// A string that should have been a base64 image data URI was not.
    #[error("Invalid data URI: {message}")]
    InvalidDataUri { message: String },

    /// A command was given input it cannot work with.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}
