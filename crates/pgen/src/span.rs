use std::fmt::Display;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Span {
    start: u32,
    end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Span {
        Self { start, end }
    }
    pub fn at(pos: u32) -> Span {
        Self {
            start: pos,
            end: pos,
        }
    }
    pub fn is_empty(self) -> bool {
        self.start >= self.end
    }
    #[track_caller]
    pub fn as_str(self, src: &str) -> &str {
        &src[self.start as usize..self.end as usize]
    }
    pub fn start(self) -> u32 {
        self.start
    }
    pub fn end(self) -> u32 {
        self.end
    }
    /// 1-based line and column (in bytes) of the start of the span.
    pub fn line_column(self, src: &str) -> (u32, u32) {
        let offset = (self.start as usize).min(src.len());
        let before = &src.as_bytes()[..offset];

        let line = before.iter().filter(|&&b| b == b'\n').count() as u32;
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |newline| newline + 1);

        (line + 1, (offset - line_start) as u32 + 1)
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[test]
fn test_line_column() {
    let src = "a: \"x\"\n\nbad\r\n  rule";

    assert_eq!(Span::at(0).line_column(src), (1, 1));
    assert_eq!(Span::at(3).line_column(src), (1, 4));
    assert_eq!(Span::at(8).line_column(src), (3, 1));
    assert_eq!(Span::at(15).line_column(src), (4, 3));
    // offsets past the end clamp to the last position
    assert_eq!(Span::at(100).line_column(src), (4, 7));
}
