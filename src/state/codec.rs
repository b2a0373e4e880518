//! Reversible encoding of a parent branch name into one ref path segment.
//!
//! A feature branch's remote name is `[owner/]feature/<parent>/<name>`. The
//! parent may itself contain `/`, so it is escaped into a single segment:
//! `_` becomes `_5f`, `%` becomes `_25` and `/` becomes `_2f`. Decoding maps
//! every `_` back to `%` and percent-decodes.
//!
//! The underscore escape must run first; running it after the others would
//! re-escape the `_` they introduce.

/// Encode a branch name into a single path segment.
pub fn encode(name: &str) -> String {
    name.replace('_', "_5f")
        .replace('%', "_25")
        .replace('/', "_2f")
}

/// Decode a segment produced by [`encode`].
///
/// Total: malformed escapes pass through unchanged and invalid UTF-8 is
/// replaced, so callers should only decode segments they produced.
pub fn decode(token: &str) -> String {
    let percent = token.replace('_', "%");
    String::from_utf8_lossy(&urlencoding::decode_binary(percent.as_bytes())).into_owned()
}
