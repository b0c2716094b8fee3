//! Public asset URLs.
//!
//! The reader may be served from a sub-path (`/zines/`), so every asset path
//! authored in a zine is resolved against the configured base URL before it
//! goes into the precache list.

use crate::config::AssetConfig;

/// Ensure the base URL ends with exactly one `/`. Empty means the site root.
pub fn normalize_base_url(base: &str) -> String {
    let trimmed = base.trim();
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

/// Resolve an authored asset path against the base URL.
///
/// A single leading `/` is dropped so `/images/a.webp` and `images/a.webp`
/// resolve the same way. Absolute `http(s)` URLs pass through untouched.
pub fn public_asset_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let relative = path.strip_prefix('/').unwrap_or(path);
    format!("{}{relative}", normalize_base_url(base))
}

/// URL of the fallback image: the vector image without a size, the
/// `<stem>-<size>.png` raster with one.
pub fn fallback_image_url(base: &str, config: &AssetConfig, size: Option<u32>) -> String {
    match size {
        Some(size) => public_asset_url(base, &format!("{}-{size}.png", config.fallback_stem)),
        None => public_asset_url(base, &config.fallback_image),
    }
}

/// All fallback image URLs: the vector image first, then each raster size.
pub fn fallback_image_urls(base: &str, config: &AssetConfig) -> Vec<String> {
    std::iter::once(None)
        .chain(config.fallback_sizes.iter().copied().map(Some))
        .map(|size| fallback_image_url(base, config, size))
        .collect()
}
