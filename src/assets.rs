//! Image fetching and on-disk caching.
//!
//! An image reference is either a direct `.png` link, used as-is, or an
//! openclipart detail-page link, rewritten to that gallery's raster export
//! endpoint. Fetched bytes land under a cache root at a path mirroring the
//! resolved URL with its scheme stripped, so reruns skip the network entirely.
//!
//! Fetches are blocking and have no retry or timeout semantics; a failure
//! propagates and aborts the whole run.

use crate::error::Error;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Fixed cache root, relative to the working directory.
pub const CACHE_DIR: &str = "image_cache";

const DETAIL_PREFIXES: [&str; 2] = [
    "https://openclipart.org/detail/",
    "http://openclipart.org/detail/",
];

const EXPORT_ENDPOINT: &str = "http://openclipart.org/image/600px/svg_to_png/";

/// Resolve an image reference to a directly fetchable URL.
fn resolve(url: &str) -> Result<String, Error> {
    for prefix in DETAIL_PREFIXES {
        if let Some(detail_path) = url.strip_prefix(prefix) {
            let detail_path = detail_path.trim_end_matches('/');
            return Ok(format!("{EXPORT_ENDPOINT}{detail_path}.png"));
        }
    }

    if url.ends_with(".png") {
        Ok(url.to_string())
    } else {
        Err(Error::InvalidAssetReference(url.to_string()))
    }
}

/// Where the resolved URL lives in the cache: scheme stripped, path preserved.
fn cache_path(cache_root: &Path, resolved: &str) -> PathBuf {
    let key = resolved
        .strip_prefix("https://")
        .or_else(|| resolved.strip_prefix("http://"))
        .unwrap_or(resolved);
    cache_root.join(key)
}

/// Resolve `url` to a local file under [`CACHE_DIR`], downloading on a miss.
pub fn fetch(url: &str) -> Result<PathBuf> {
    fetch_into(Path::new(CACHE_DIR), url)
}

pub fn fetch_into(cache_root: &Path, url: &str) -> Result<PathBuf> {
    let resolved = resolve(url)?;
    let path = cache_path(cache_root, &resolved);

    if path.exists() {
        println!("    already downloaded {resolved}");
        return Ok(path);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create cache directory {}", parent.display()))?;
    }

    println!("    downloading {resolved}");
    let response = ureq::get(&resolved)
        .call()
        .with_context(|| format!("Failed to download {resolved}"))?;
    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read response body of {resolved}"))?;

    std::fs::write(&path, &bytes)
        .with_context(|| format!("Failed to write cached image {}", path.display()))?;

    Ok(path)
}
