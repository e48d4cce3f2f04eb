//! Source line counting
//!
//! A single pass over the lines with two states. Transition rules, applied in
//! this order to each trimmed line:
//!
//! 1. a line containing `/*` enters the block comment;
//! 2. a line containing `*/` leaves it and is itself excluded;
//! 3. any line inside the block comment is excluded;
//! 4. blank lines and lines starting with `//` or `#` are excluded;
//! 5. everything else counts.
//!
//! So `/* note */` on one line is excluded, and `x = 1; /* note */` is too.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    BlockComment,
}

/// Count source lines, excluding blanks and comments
pub fn count_sloc(content: &str) -> u64 {
    let mut state = ScanState::Code;
    let mut sloc = 0;

    for line in content.split('\n') {
        let trimmed = line.trim();

        if trimmed.contains("/*") {
            state = ScanState::BlockComment;
        }
        if trimmed.contains("*/") {
            state = ScanState::Code;
            continue;
        }
        if state == ScanState::BlockComment {
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with("//") || trimmed.starts_with('#') {
            continue;
        }

        sloc += 1;
    }

    sloc
}
