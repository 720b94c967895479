//! Marker-delimited warning block inside a shared login notice file.
//!
//! The notice file (e.g. `/etc/motd`) may hold other content, so the
//! warning lives between two marker lines. Installing replaces any
//! existing block; removing deletes it and nothing else.

const BEGIN: &str = "# >>> hostaudit compliance warning >>>";
const END: &str = "# <<< hostaudit compliance warning <<<";

/// Return `existing` without the warning block.
///
/// A begin marker not closed before the next begin marker is not a block;
/// those lines are kept as they are.
#[must_use]
pub fn remove_block(existing: &str) -> String {
    let lines: Vec<&str> = existing.lines().collect();
    let mut out = String::with_capacity(existing.len());
    let mut idx = 0;

    while idx < lines.len() {
        if lines[idx].trim_end() == BEGIN {
            let next_marker = lines[idx + 1..]
                .iter()
                .position(|l| matches!(l.trim_end(), BEGIN | END));
            if let Some(offset) = next_marker {
                if lines[idx + 1 + offset].trim_end() == END {
                    idx += offset + 2;
                    continue;
                }
            }
        }
        out.push_str(lines[idx]);
        out.push('\n');
        idx += 1;
    }

    out
}

/// Return `existing` with exactly one warning block holding `message`.
#[must_use]
pub fn install_block(existing: &str, message: &str) -> String {
    let mut out = remove_block(existing);
    out.push_str(BEGIN);
    out.push('\n');
    for line in message.lines() {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(END);
    out.push('\n');
    out
}

/// Whether `existing` carries a warning block.
#[must_use]
pub fn has_block(existing: &str) -> bool {
    existing.lines().any(|l| l.trim_end() == BEGIN)
}
