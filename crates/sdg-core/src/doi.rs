//! DOI normalisation.
//!
//! Users paste DOIs either bare (`10.1/xyz`) or as resolver links
//! (`https://doi.org/10.1/xyz`). Lookups key on the bare form.

const RESOLVER_PREFIXES: &[&str] = &["https://doi.org/", "http://doi.org/"];

/// Strip surrounding whitespace and a leading `doi.org` resolver prefix.
///
/// Anything else is passed through unchanged.
pub fn normalize_doi(doi: &str) -> &str {
    let doi = doi.trim();
    RESOLVER_PREFIXES
        .iter()
        .find_map(|prefix| doi.strip_prefix(prefix))
        .unwrap_or(doi)
}
