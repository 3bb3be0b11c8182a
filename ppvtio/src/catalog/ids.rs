//! Composite identifiers exposed to addon clients.
//!
//! Clients share one id namespace across every installed addon, so each
//! upstream stream id is exposed as `ppv_to:<id>`.

pub const ID_PREFIX: &str = "ppv_to:";

/// Suffix of the single synthetic video inside a meta record.
const VIDEO_SUFFIX: &str = ":1:1";

/// Build the client-facing id for an upstream stream id.
pub fn composite(raw_id: &str) -> String {
    format!("{ID_PREFIX}{raw_id}")
}

/// Whether a client-supplied id belongs to this addon.
pub fn is_ours(id: &str) -> bool {
    id.starts_with(ID_PREFIX)
}

/// Strip the namespace prefix, returning the upstream id.
pub fn strip_prefix(id: &str) -> Option<&str> {
    id.strip_prefix(ID_PREFIX)
}

/// Id of the synthetic video belonging to a meta record.
pub fn video_id(composite_id: &str) -> String {
    format!("{composite_id}{VIDEO_SUFFIX}")
}
