//! Named character entity decoding for `rdf:XMLLiteral` values.
//!
//! Values lifted out of markup still carry `&nbsp;`, `&amp;`, `&#233;` and
//! friends. They are decoded to plain Unicode before the literal is escaped,
//! so the same content reached through a different markup spelling produces
//! the same key.

use quick_xml::escape::unescape;
use std::borrow::Cow;

/// Decode named (HTML5 table, via quick-xml's `escape-html` feature) and
/// numeric character references.
///
/// Text with a reference that cannot be resolved is kept as-is.
pub fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }
    match unescape(raw) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::debug!(error = %err, "keeping XML literal with undecodable entity as-is");
            Cow::Borrowed(raw)
        }
    }
}
