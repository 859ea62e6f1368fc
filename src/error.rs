use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while tinting and compositing a batch
#[derive(Error, Debug)]
pub enum TintError {
    #[error("Invalid hex color literal '{input}': {reason}. Expected format 0xRRGGBB")]
    InvalidColorFormat { input: String, reason: String },

    #[error("No base image found for {overlay}")]
    MissingBasePair { overlay: String },

    #[error("Failed to decode '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(
        "Image sizes do not match: base is {}x{}, overlay is {}x{}",
        base.0, base.1, overlay.0, overlay.1
    )]
    DimensionMismatch {
        base: (u32, u32),
        overlay: (u32, u32),
    },

    #[error("Failed to save '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error with '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read a color literal: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("Invalid config file '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Invalid settings: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, TintError>;
