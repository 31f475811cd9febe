// SPDX-License-Identifier: MIT

//! Hand-rolled label/value scanning over `str::find`/byte slicing.
//!
//! The label set here is fixed and small (`Progress`, `Speed`, `ETA`); a
//! regex engine would be the usual reach, but this workspace's dependency
//! stack carries no regex crate, so this is plain scanning rather than
//! pulling one in for three fixed labels. See DESIGN.md for the tradeoff.

use crate::record::ProgressRecord;

/// Parse a single read-buffer of cracker stdout/stderr text into at most one
/// [`ProgressRecord`]. `now_epoch_ms` anchors the `ETA` label's `hh:mm:ss`
/// offset to an absolute timestamp; the parser itself owns no clock.
///
/// Returns `None` unless a `Progress` label with the `A/B (P.P%)` shape is
/// present somewhere in `buf` — speed and ETA are optional enrichments of
/// that same record, never emitted alone.
pub fn parse_chunk(buf: &str, now_epoch_ms: u64) -> Option<ProgressRecord> {
    let progress_pct = find_progress_pct(buf)?;
    let speed_hps = find_speed_hps(buf);
    let eta_epoch_ms = find_eta(buf).map(|offset_secs| now_epoch_ms + offset_secs * 1000);
    Some(ProgressRecord { progress_pct, speed_hps, eta_epoch_ms })
}

/// Thin, deliberately stateless wrapper around [`parse_chunk`] — kept as a
/// type so callers that want to pass a scanner around by value (rather than
/// a bare function pointer) have one, and so a future stateful variant (if
/// cross-buffer continuation is ever added) has a natural home.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChunkScanner;

impl ChunkScanner {
    pub fn new() -> Self {
        Self
    }

    pub fn scan(&self, buf: &str, now_epoch_ms: u64) -> Option<ProgressRecord> {
        parse_chunk(buf, now_epoch_ms)
    }
}

/// Case-insensitive search for `label` in `buf`, returning the byte offset
/// just past the label and any immediately-following punctuation/whitespace
/// (e.g. `"Progress.........: "`).
fn label_value_start(buf: &str, label: &str) -> Option<usize> {
    let lower = buf.to_ascii_lowercase();
    let label_lower = label.to_ascii_lowercase();
    let label_pos = lower.find(&label_lower)?;
    let mut pos = label_pos + label_lower.len();
    let bytes = buf.as_bytes();
    while pos < bytes.len() {
        let c = bytes[pos] as char;
        if c.is_ascii_alphanumeric() {
            break;
        }
        pos += 1;
        if c == ' ' || c == '\t' {
            // keep consuming whitespace, but stop once we hit the value
            while pos < bytes.len() && (bytes[pos] as char).is_whitespace() {
                pos += 1;
            }
        }
    }
    Some(pos)
}

fn find_progress_pct(buf: &str) -> Option<f64> {
    let start = label_value_start(buf, "progress")?;
    let rest = &buf[start..];
    let open = rest.find('(')?;
    let close = rest[open..].find('%')?;
    let inner = rest[open + 1..open + close].trim();
    inner.parse::<f64>().ok()
}

fn find_speed_hps(buf: &str) -> Option<i64> {
    let start = label_value_start(buf, "speed")?;
    let rest = &buf[start..];
    let digits_end = rest.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 {
        return None;
    }
    let value: i64 = rest[..digits_end].parse().ok()?;
    let after = rest[digits_end..].trim_start();
    if after.to_ascii_lowercase().starts_with("h/s") {
        Some(value)
    } else {
        None
    }
}

fn find_eta(buf: &str) -> Option<u64> {
    let start = label_value_start(buf, "eta")?;
    let rest = &buf[start..];
    let line_end = rest.find(['\n', '\r']).unwrap_or(rest.len());
    let candidate = rest[..line_end].trim();
    let mut parts = candidate.splitn(3, ':');
    let h: u64 = parts.next()?.trim().parse().ok()?;
    let m: u64 = parts.next()?.trim().parse().ok()?;
    let s_field = parts.next()?;
    let s_end = s_field.find(|c: char| !c.is_ascii_digit()).unwrap_or(s_field.len());
    if s_end == 0 {
        return None;
    }
    let s: u64 = s_field[..s_end].parse().ok()?;
    Some(h * 3600 + m * 60 + s)
}
