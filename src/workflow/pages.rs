//! Deterministic page URL derivation.
//!
//! Discovery reports a total page count; the unit list is derived from
//! the seed URL alone. Page 1 is the seed itself; page *k* (k ≥ 2)
//! appends `k/` to the seed's path, preserving query and fragment:
//! `…/reviews/` with 3 pages yields `…/reviews/`, `…/reviews/2/`,
//! `…/reviews/3/`.

// ============================================================================
// Imports
// ============================================================================

use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Page URL Builder
// ============================================================================

/// Builds the ordered page URL list for `total_pages` pages.
///
/// # Errors
///
/// Returns [`Error::InvalidSeed`] if `seed` does not parse as an
/// absolute URL with a path (for example a `mailto:` URL).
pub fn build_page_urls(seed: &str, total_pages: u32) -> Result<Vec<String>> {
    let base = Url::parse(seed).map_err(|_| Error::invalid_seed(seed))?;
    if base.cannot_be_a_base() {
        return Err(Error::invalid_seed(seed));
    }

    let mut urls = Vec::with_capacity(total_pages.max(1) as usize);
    urls.push(seed.to_string());

    for page in 2..=total_pages {
        let mut page_url = base.clone();
        {
            let mut segments = page_url
                .path_segments_mut()
                .map_err(|()| Error::invalid_seed(seed))?;
            segments.pop_if_empty().push(&page.to_string()).push("");
        }
        urls.push(page_url.to_string());
    }

    Ok(urls)
}

// ============================================================================
// Tests
// ============================================================================
