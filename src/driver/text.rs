/// Marker appended to every excerpt.
pub const ELLIPSIS: &str = "...";

/// First `limit` characters of `text` followed by [`ELLIPSIS`].
///
/// Counts characters, not bytes, so multi-byte text is never split mid code point.
/// Shorter text is kept whole; the marker is appended either way.
pub fn truncate(text: &str, limit: usize) -> String {
    let mut excerpt: String = text.chars().take(limit).collect();
    excerpt.push_str(ELLIPSIS);
    excerpt
}
