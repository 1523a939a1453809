//! Failure taxonomy for the book renderer.
//!
//! Every variant here is fatal: nothing is retried or recovered locally, errors
//! propagate to `try_main` (usually wrapped with `anyhow` context along the way)
//! and terminate the run with a non-zero exit status. There is no partial-output
//! mode; the output file is only written once every page has rendered.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("config file \"{}\" not found", .0.display())]
    ConfigNotFound(PathBuf),

    #[error(
        "image URL must either end with .png or point to an openclipart detail page: {0}"
    )]
    InvalidAssetReference(String),

    #[error("unsupported image count {requested} (layout table defines counts 1 through {max})")]
    UnsupportedImageCount { requested: usize, max: usize },
}
