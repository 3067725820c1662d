use url::Url;

use crate::error::MirrorError;

/// Joins a raw reference against its base URL, deciding whether the result
/// is fetchable at all.
///
/// `Ok(None)` means skip: empty references, `data:` URIs (embedded content
/// stays embedded), and schemes the fetcher cannot speak such as `mailto:`
/// or `javascript:`. A malformed reference is an error for the caller to
/// record, never a reason to stop the pass.
pub fn resolve(base: &Url, reference: &str) -> Result<Option<Url>, MirrorError> {
    if reference.is_empty() {
        return Ok(None);
    }

    if reference.starts_with("data:") {
        return Ok(None);
    }

    let resolved = base.join(reference).map_err(|e| MirrorError::Resolve {
        reference: reference.to_string(),
        message: e.to_string(),
    })?;

    match resolved.scheme() {
        "http" | "https" => Ok(Some(resolved)),
        _ => Ok(None),
    }
}
