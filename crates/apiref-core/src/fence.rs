//! Code regions of documentation text.
//!
//! References inside fenced code blocks and inline code spans are literal
//! text. [`code_regions`] returns the byte ranges covered by either, so the
//! reference scanner can skip matches that start inside them.

use std::ops::Range;

/// A fenced code block was still open at the end of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnclosedFence;

/// Open fence: character and length of the opening marker.
#[derive(Debug, Default)]
struct Fence {
    open: Option<(char, usize)>,
}

impl Fence {
    fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line. Returns `true` if the line belongs to a fenced block,
    /// including the opening and closing marker lines.
    fn feed(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        match self.open {
            Some((ch, len)) => {
                if closes(trimmed, ch, len) {
                    self.open = None;
                }
                true
            }
            None => {
                self.open = opens(trimmed);
                self.open.is_some()
            }
        }
    }
}

fn marker_run(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let count = trimmed.chars().take_while(|&c| c == first).count();
    (count >= 3).then_some((first, count))
}

fn opens(trimmed: &str) -> Option<(char, usize)> {
    marker_run(trimmed)
}

/// Closing marker: same character, at least as long, nothing but whitespace after.
fn closes(trimmed: &str, ch: char, min_len: usize) -> bool {
    match marker_run(trimmed) {
        Some((c, count)) if c == ch && count >= min_len => {
            trimmed[count * c.len_utf8()..].trim().is_empty()
        }
        _ => false,
    }
}

/// Byte ranges of fenced blocks and inline code spans in `text`.
pub(crate) fn code_regions(text: &str) -> Result<Vec<Range<usize>>, UnclosedFence> {
    let mut regions = Vec::new();
    let mut fence = Fence::default();
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        if fence.feed(line) {
            regions.push(start..offset);
        } else {
            regions.extend(
                code_spans(line)
                    .into_iter()
                    .map(|span| span.start + start..span.end + start),
            );
        }
    }

    if fence.is_open() {
        return Err(UnclosedFence);
    }
    Ok(regions)
}

/// Inline code spans within one line.
///
/// A span opens with a run of backticks and closes at the next run of the
/// same length. An opening run without a match is literal.
fn code_spans(line: &str) -> Vec<Range<usize>> {
    let bytes = line.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let start = i;
        let run = backtick_run(bytes, i);
        let mut j = start + run;
        let mut end = None;
        while j < bytes.len() {
            if bytes[j] == b'`' {
                let closing = backtick_run(bytes, j);
                if closing == run {
                    end = Some(j + closing);
                    break;
                }
                j += closing;
            } else {
                j += 1;
            }
        }
        match end {
            Some(end) => {
                spans.push(start..end);
                i = end;
            }
            None => i = start + run,
        }
    }
    spans
}

fn backtick_run(bytes: &[u8], from: usize) -> usize {
    bytes[from..].iter().take_while(|&&b| b == b'`').count()
}
