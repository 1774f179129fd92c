//! Whitespace and comment skipping.

use crate::Scanner;

impl<'src> Scanner<'src> {
    /// Advances past whitespace and `//` line comments.
    ///
    /// Line comments run to the newline but do not consume it, so the
    /// cursor's line count advances through the normal newline path.
    pub(crate) fn skip_whitespace(&mut self) {
        loop {
            match self.cursor.peek() {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.cursor.advance();
                }
                b'/' => {
                    if self.cursor.peek_next() == b'/' {
                        while self.cursor.peek() != b'\n' && !self.cursor.is_at_end() {
                            self.cursor.advance();
                        }
                    } else {
                        return;
                    }
                }
                _ => return,
            }
        }
    }
}
