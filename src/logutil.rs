//! Log sanitising for player-supplied text (character names, guild names,
//! listing sellers) so every log record stays on one line.

/// Longest preview of a player string written to the log.
pub const MAX_LOG_PREVIEW: usize = 64;

/// Escape a player-supplied string for single-line logging.
///
/// Backslash, `\n`, `\r` and `\t` become two-character escapes, other
/// control characters become `\xNN`. Input longer than
/// [`MAX_LOG_PREVIEW`] characters is cut with an ellipsis.
pub fn escape_log(s: &str) -> String {
    escape_log_with(s, MAX_LOG_PREVIEW)
}

/// [`escape_log`] with an explicit preview length.
pub fn escape_log_with(s: &str, max_preview: usize) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(s.len().min(max_preview) + 4);
    for (count, ch) in s.chars().enumerate() {
        if count >= max_preview {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
