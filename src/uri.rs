//! Claim-backed source URI parsing
//!
//! Model source URIs with the `pvc://` scheme reference a pre-provisioned
//! PersistentVolumeClaim instead of remote storage:
//! `pvc://<claim>[/sub/path]`. All other schemes are opaque to this crate
//! and passed through to the initializer unmodified.

use crate::error::Error;

/// Scheme prefix marking a claim-backed model source
pub const PVC_URI_PREFIX: &str = "pvc://";

/// Check whether a source URI is claim-backed
pub fn is_pvc_uri(uri: &str) -> bool {
    uri.starts_with(PVC_URI_PREFIX)
}

/// Parse a `pvc://` URI into `(claim_name, sub_path)`.
///
/// The first path segment after the scheme is the claim name; any remaining
/// segments are rejoined into the sub-path. `pvc://claim1` yields an empty
/// sub-path. A missing or empty claim segment is rejected.
pub fn parse_pvc_uri(uri: &str) -> Result<(String, String), Error> {
    let remainder = uri
        .strip_prefix(PVC_URI_PREFIX)
        .ok_or_else(|| Error::invalid_uri(uri))?;

    let mut parts = remainder.splitn(2, '/');
    let claim = parts.next().unwrap_or_default();
    if claim.is_empty() {
        return Err(Error::invalid_uri(uri));
    }
    let sub_path = parts.next().unwrap_or_default();

    Ok((claim.to_string(), sub_path.to_string()))
}
