//! Line scanning primitives
//!
//! Lines end in CRLF or a bare LF. A CR not followed by LF is ordinary line
//! content. Nothing here reads past `buffer.len()`.

use crate::types::TextRange;

/// Position of a line terminator found by [`find_line_end`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEnd {
    /// Length of the line content, terminator excluded
    pub len: usize,
    /// Offset just past the terminator
    pub next: usize,
}

impl LineEnd {
    /// Length of the terminator itself (2 for CRLF, 1 for LF)
    pub fn terminator_len(&self, offset: usize) -> usize {
        self.next - offset - self.len
    }
}

/// Find the end of the line starting at `offset`
///
/// Returns `None` when the buffer ends before a line terminator.
pub fn find_line_end(buffer: &[u8], offset: usize) -> Option<LineEnd> {
    let rest = buffer.get(offset..)?;
    let lf = rest.iter().position(|&b| b == b'\n')?;
    let len = if lf > 0 && rest[lf - 1] == b'\r' {
        lf - 1
    } else {
        lf
    };
    Some(LineEnd {
        len,
        next: offset + lf + 1,
    })
}

/// A line produced by [`Lines`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    /// Line content, terminator excluded
    pub range: TextRange,
    /// Offset of the following line
    pub next: usize,
    /// False only for a trailing fragment without a terminator
    pub terminated: bool,
}

/// Iterator over the lines of a buffer
///
/// Unlike [`find_line_end`], a trailing fragment without a terminator is
/// yielded as a final line so that raw renderings lose nothing.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Lines<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }
}

impl Iterator for Lines<'_> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        if self.offset >= self.buffer.len() {
            return None;
        }
        let start = self.offset;
        let line = match find_line_end(self.buffer, start) {
            Some(end) => Line {
                range: TextRange::new(start, start + end.len),
                next: end.next,
                terminated: true,
            },
            None => Line {
                range: TextRange::new(start, self.buffer.len()),
                next: self.buffer.len(),
                terminated: false,
            },
        };
        self.offset = line.next;
        Some(line)
    }
}

/// Split a buffer into line ranges, terminators excluded
pub fn split_lines(buffer: &[u8]) -> Vec<TextRange> {
    Lines::new(buffer).map(|line| line.range).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crlf_line() {
        let buffer = b"MSRP a SEND\r\nrest";
        let end = find_line_end(buffer, 0).unwrap();
        assert_eq!(end, LineEnd { len: 11, next: 13 });
        assert_eq!(end.terminator_len(0), 2);
    }

    #[test]
    fn test_bare_lf_line() {
        let buffer = b"abc\ndef\n";
        let end = find_line_end(buffer, 0).unwrap();
        assert_eq!(end, LineEnd { len: 3, next: 4 });
        assert_eq!(end.terminator_len(0), 1);

        let second = find_line_end(buffer, 4).unwrap();
        assert_eq!(second, LineEnd { len: 3, next: 8 });
    }

    #[test]
    fn test_empty_line() {
        let buffer = b"\r\n";
        assert_eq!(find_line_end(buffer, 0), Some(LineEnd { len: 0, next: 2 }));
        assert_eq!(find_line_end(b"\n", 0), Some(LineEnd { len: 0, next: 1 }));
    }

    #[test]
    fn test_bare_cr_is_content() {
        let buffer = b"a\rb\r\n";
        assert_eq!(find_line_end(buffer, 0), Some(LineEnd { len: 3, next: 5 }));
    }

    #[test]
    fn test_no_terminator() {
        assert_eq!(find_line_end(b"no newline here", 0), None);
        assert_eq!(find_line_end(b"abc\r", 0), None);
        assert_eq!(find_line_end(b"", 0), None);
    }

    #[test]
    fn test_offset_past_end() {
        assert_eq!(find_line_end(b"abc\r\n", 5), None);
        assert_eq!(find_line_end(b"abc\r\n", 100), None);
    }

    #[test]
    fn test_lines_iterator_keeps_trailing_fragment() {
        let buffer = b"one\r\ntwo\nthree";
        let lines: Vec<Line> = Lines::new(buffer).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].range.slice(buffer), b"one");
        assert_eq!(lines[1].range.slice(buffer), b"two");
        assert_eq!(lines[2].range.slice(buffer), b"three");
        assert!(lines[1].terminated);
        assert!(!lines[2].terminated);
    }

    #[test]
    fn test_split_lines_with_blank_lines() {
        let ranges = split_lines(b"a\r\n\r\nb\r\n");
        assert_eq!(ranges, vec![TextRange::new(0, 1), TextRange::new(3, 3), TextRange::new(5, 6)]);
        assert!(split_lines(b"").is_empty());
    }
}
