//! Quoting for text embedded inside an AppleScript string literal.
//!
//! Every piece of caller-supplied text that ends up in a script must pass
//! through [`escape_for_applescript`]. The script is built by interpolation,
//! so this function is the only thing standing between a note title and
//! arbitrary AppleScript.

/// Escape `text` so it can sit between double quotes in AppleScript.
///
/// Backslashes are doubled first, then double quotes are prefixed with a
/// backslash, then carriage returns are dropped. The order matters: quoting
/// first would double the backslashes it just inserted.
pub fn escape_for_applescript(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\r', "")
}

/// Undo [`escape_for_applescript`] (carriage returns are not restored).
pub fn unescape_applescript(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
