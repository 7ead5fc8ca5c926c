//! Code block and code span tracking for marker tagging.
//!
//! Marker syntax inside fenced or indented code blocks and inline code
//! spans is example text, not a marker, so the taggers only ever see the
//! prose around them.

use std::ops::Range;

/// Tracks code fence state during line-by-line processing.
///
/// Code fences in `CommonMark` can use backticks or tildes (three or more).
/// The closing fence must use the same character and be at least as long
/// as the opening fence.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    fence_char: Option<char>,
    fence_len: usize,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Check if currently inside a fenced code block.
    pub(crate) fn in_fence(&self) -> bool {
        self.fence_char.is_some()
    }

    /// Update fence state based on a line.
    ///
    /// Returns `true` if the line is a fence marker (opening or closing).
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();

        if let Some(fence_char) = self.fence_char {
            if is_closing_fence(trimmed, fence_char, self.fence_len) {
                self.fence_char = None;
                self.fence_len = 0;
                return true;
            }
            false
        } else if let Some((ch, len)) = detect_fence(trimmed) {
            self.fence_char = Some(ch);
            self.fence_len = len;
            true
        } else {
            false
        }
    }
}

/// Tracks fenced and indented code blocks during line-by-line processing.
///
/// A line indented four or more columns opens an indented code block only
/// after a blank line (or a heading, or the start of input) and never
/// inside a list, where the indentation belongs to the list item.
#[derive(Debug)]
pub(crate) struct CodeBlockTracker {
    fence: FenceTracker,
    indented: bool,
    in_list: bool,
    after_break: bool,
}

impl CodeBlockTracker {
    pub(crate) fn new() -> Self {
        Self {
            fence: FenceTracker::new(),
            indented: false,
            in_list: false,
            after_break: true,
        }
    }

    /// Advance past `line`, returning `true` if it is code or a fence marker.
    pub(crate) fn is_code(&mut self, line: &str) -> bool {
        if self.fence.in_fence() {
            self.fence.update(line);
            return true;
        }

        if line.trim().is_empty() {
            self.after_break = true;
            return self.indented;
        }

        let indent = indent_width(line);
        if indent >= 4 && !self.in_list && (self.indented || self.after_break) {
            self.indented = true;
            self.after_break = false;
            return true;
        }
        self.indented = false;

        let trimmed = line.trim_start();
        if is_list_item(trimmed) {
            self.in_list = true;
        } else if indent == 0 && self.after_break {
            self.in_list = false;
        }
        self.after_break = is_atx_heading(trimmed);
        self.fence.update(line)
    }
}

/// Leading whitespace in columns, tabs advancing to the next multiple of four.
fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4 - width % 4,
            _ => break,
        }
    }
    width
}

fn is_list_item(trimmed: &str) -> bool {
    let marker_end = match trimmed.as_bytes().first() {
        Some(b'-' | b'*' | b'+') => 1,
        Some(b'0'..=b'9') => {
            let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
            if digits > 9 || !matches!(trimmed.as_bytes().get(digits), Some(b'.' | b')')) {
                return false;
            }
            digits + 1
        }
        _ => return false,
    };
    matches!(trimmed.as_bytes().get(marker_end), None | Some(b' ' | b'\t' | b'\n' | b'\r'))
}

fn is_atx_heading(trimmed: &str) -> bool {
    let hashes = trimmed.bytes().take_while(|&b| b == b'#').count();
    (1..=6).contains(&hashes)
        && matches!(trimmed.as_bytes().get(hashes), None | Some(b' ' | b'\t' | b'\n' | b'\r'))
}

fn detect_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    (count >= 3).then_some((first, count))
}

fn is_closing_fence(trimmed: &str, expected_char: char, min_len: usize) -> bool {
    if !trimmed.starts_with(expected_char) {
        return false;
    }

    let count = trimmed.chars().take_while(|&c| c == expected_char).count();
    if count < min_len {
        return false;
    }

    // Fence characters are ASCII, so `count` is also a byte offset.
    trimmed[count..].chars().all(char::is_whitespace)
}

/// Byte ranges of inline code spans within a single line.
///
/// A span opens with a run of N backticks and closes at the next run of
/// exactly N backticks. An opening run with no closing partner is literal text.
pub(crate) fn code_span_ranges(line: &str) -> Vec<Range<usize>> {
    let bytes = line.as_bytes();
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'`' {
            pos += 1;
            continue;
        }
        let open_start = pos;
        let open_len = backtick_run(bytes, pos);
        pos += open_len;

        let mut search = pos;
        let mut closed = false;
        while search < bytes.len() {
            if bytes[search] == b'`' {
                let run = backtick_run(bytes, search);
                if run == open_len {
                    spans.push(open_start..search + run);
                    pos = search + run;
                    closed = true;
                    break;
                }
                search += run;
            } else {
                search += 1;
            }
        }
        if !closed {
            pos = open_start + open_len;
        }
    }

    spans
}

fn backtick_run(bytes: &[u8], start: usize) -> usize {
    bytes[start..].iter().take_while(|&&b| b == b'`').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fence_initially() {
        let tracker = FenceTracker::new();
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_backtick_fence() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("```markdown"));
        assert!(tracker.in_fence());

        assert!(!tracker.update("[drop-zone]"));
        assert!(tracker.in_fence());

        assert!(tracker.update("```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_tilde_fence_needs_matching_char() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("~~~~"));
        assert!(!tracker.update("```"));
        assert!(tracker.in_fence());
        assert!(!tracker.update("~~~"));
        assert!(tracker.update("~~~~"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_closing_fence_rejects_trailing_text() {
        let mut tracker = FenceTracker::new();

        tracker.update("```");
        assert!(!tracker.update("``` not a close"));
        assert!(tracker.in_fence());
    }

    #[test]
    fn test_two_backticks_not_a_fence() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.update("``code``"));
        assert!(!tracker.in_fence());
    }

    fn code_lines(input: &str) -> Vec<bool> {
        let mut tracker = CodeBlockTracker::new();
        input
            .split_inclusive('\n')
            .map(|line| tracker.is_code(line))
            .collect()
    }

    #[test]
    fn test_indented_block_after_blank_line() {
        assert_eq!(
            code_lines("text\n\n    [drop-zone]\n\n    more\nafter"),
            vec![false, false, true, true, true, false]
        );
    }

    #[test]
    fn test_indented_line_continues_paragraph() {
        assert_eq!(code_lines("text\n    [drop-zone]"), vec![false, false]);
    }

    #[test]
    fn test_indented_block_at_start_and_after_heading() {
        assert_eq!(code_lines("    code\n# Title\n\tcode"), vec![true, false, true]);
    }

    #[test]
    fn test_indented_line_in_list_is_not_code() {
        assert_eq!(
            code_lines("- item\n\n    [drop-zone]\n\n1. next\n\n    x\n\nend\n\n    code"),
            vec![false, false, false, false, false, false, false, false, false, false, true]
        );
    }

    #[test]
    fn test_fence_lines_are_code() {
        assert_eq!(code_lines("```\n[drop-zone]\n```\nx"), vec![true, true, true, false]);
    }

    #[test]
    fn test_code_span_ranges_single() {
        let line = "before `[drop-zone]` after";
        let spans = code_span_ranges(line);
        assert_eq!(spans, vec![7..20]);
        assert_eq!(&line[spans[0].clone()], "`[drop-zone]`");
    }

    #[test]
    fn test_code_span_ranges_double_backticks() {
        let line = "a ``x ` y`` b";
        let spans = code_span_ranges(line);
        assert_eq!(&line[spans[0].clone()], "``x ` y``");
    }

    #[test]
    fn test_code_span_unclosed_is_literal() {
        assert!(code_span_ranges("a ` b").is_empty());
    }
}
