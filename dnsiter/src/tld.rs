//! TLD-validity extraction: `spec.md` section 6 names
//! `effective_tld(hostname) -> Option<String>` as an external
//! collaborator used by the resolution engine's step 1.
//!
//! The original Python resolver delegates this to the third-party
//! `tldextract` public-suffix-list library. No crate in the retrieved
//! pack provides public-suffix-list handling, and vendoring a PSL
//! dataset by hand would fabricate a dependency, so this is a small
//! heuristic sized to exactly what `spec.md` section 4.6 step 1 needs
//! ("is there a TLD at all"), not precise public-suffix semantics.

/// Returns the rightmost label of `hostname` if it looks like a
/// plausible TLD: the hostname (after stripping one optional trailing
/// dot) must split into at least two non-empty labels, each
/// consisting only of ASCII alphanumerics and hyphens.
#[must_use]
pub fn effective_tld(hostname: &str) -> Option<String> {
    let trimmed = hostname.strip_suffix('.').unwrap_or(hostname);
    if trimmed.is_empty() {
        return None;
    }

    let labels: Vec<&str> = trimmed.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| !is_valid_label(label)) {
        return None;
    }

    labels.last().map(|tld| (*tld).to_string())
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
}
