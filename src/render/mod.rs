//! Binary-safe value rendering.
//!
//! [`render_value`] is a total function: any byte sequence becomes a
//! displayable string. Well-formed JSON is pretty-printed; everything else
//! goes through mixed-content rendering, which passes printable text through
//! verbatim and folds invalid bytes and control characters into explicit
//! `[b64:…]` markers (padding-free standard base64). No raw control or
//! invalid byte ever reaches the display layer.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;

/// Placeholder for a zero-length value, distinct from an empty string.
pub const EMPTY_MARKER: &str = "(empty)";

/// Render a raw value for display or export. Never fails.
pub fn render_value(value: &[u8]) -> String {
    if value.is_empty() {
        return EMPTY_MARKER.to_string();
    }
    if let Some(pretty) = try_render_json(value) {
        return pretty;
    }
    mixed_content(value)
}

/// Pretty-print `value` if it is a complete, well-formed JSON document.
fn try_render_json(value: &[u8]) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_slice(value).ok()?;
    // Two-space indentation is serde_json's pretty default.
    serde_json::to_string_pretty(&parsed).ok()
}

/// Interleave printable text with bracketed base64 markers for binary runs.
fn mixed_content(value: &[u8]) -> String {
    let mut out = String::with_capacity(value.len());
    let mut run: Vec<u8> = Vec::new();
    let mut pos = 0;

    while pos < value.len() {
        match decode_one(&value[pos..]) {
            Some((ch, width)) if !ch.is_control() => {
                flush_run(&mut out, &mut run);
                out.push(ch);
                pos += width;
            }
            Some((_, width)) => {
                // Control character: keep its raw encoded bytes in the run.
                run.extend_from_slice(&value[pos..pos + width]);
                pos += width;
            }
            None => {
                // Undecodable byte.
                run.push(value[pos]);
                pos += 1;
            }
        }
    }
    flush_run(&mut out, &mut run);
    out
}

/// Decode one UTF-8 code point at the start of `bytes`.
///
/// Returns `None` when the leading byte starts no valid sequence (including
/// a multi-byte sequence truncated by the end of input), in which case the
/// caller consumes exactly one byte.
fn decode_one(bytes: &[u8]) -> Option<(char, usize)> {
    let window = &bytes[..bytes.len().min(4)];
    let valid = match std::str::from_utf8(window) {
        Ok(s) => s,
        Err(e) => {
            let n = e.valid_up_to();
            if n == 0 {
                return None;
            }
            // Guaranteed valid by the error's valid_up_to contract.
            std::str::from_utf8(&window[..n]).ok()?
        }
    };
    valid.chars().next().map(|ch| (ch, ch.len_utf8()))
}

fn flush_run(out: &mut String, run: &mut Vec<u8>) {
    if run.is_empty() {
        return;
    }
    out.push_str("[b64:");
    out.push_str(&STANDARD_NO_PAD.encode(&run));
    out.push(']');
    run.clear();
}
