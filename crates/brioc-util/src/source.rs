//! Byte-offset to line/column mapping over a source text.
//!
//! The pipeline reports positions as byte offsets. For display the
//! driver wraps the source in a [`SourceText`], which precomputes the
//! offset of each line start so lookups are a binary search.

/// A source text with a line-start table for position lookups.
pub struct SourceText<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> SourceText<'a> {
    /// Wraps a source string, computing its line-start table.
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { text, line_starts }
    }

    /// Returns the wrapped source text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Converts a byte offset into a 1-based (line, column) pair.
    ///
    /// Offsets past the end of the text resolve to the last position.
    /// Columns count bytes, matching how offsets are produced.
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let column = offset - self.line_starts[line];
        (line as u32 + 1, column as u32 + 1)
    }

    /// Returns the text of a 1-based line, without its trailing newline.
    pub fn line(&self, line: u32) -> Option<&'a str> {
        let i = line.checked_sub(1)? as usize;
        let start = *self.line_starts.get(i)?;
        let end = self
            .line_starts
            .get(i + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        Some(&self.text[start..end])
    }
}
