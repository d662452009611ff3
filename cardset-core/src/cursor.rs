use crate::{CursorError, FlashcardGroup, Term};

/// Wrap-around position over a fixed number of terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReviewCursor {
    position: usize,
    len: usize,
}

impl ReviewCursor {
    pub fn new(len: usize) -> Result<Self, CursorError> {
        if len == 0 {
            return Err(CursorError::Empty);
        }
        Ok(Self { position: 0, len })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn next(&mut self) -> usize {
        self.position = (self.position + 1) % self.len;
        self.position
    }

    pub fn previous(&mut self) -> usize {
        self.position = (self.position + self.len - 1) % self.len;
        self.position
    }

    /// Out-of-range indexes are rejected and leave the position unchanged.
    pub fn jump_to(&mut self, index: usize) -> Result<(), CursorError> {
        if index >= self.len {
            return Err(CursorError::OutOfRange {
                index,
                len: self.len,
            });
        }
        self.position = index;
        Ok(())
    }

    /// One-based position and total, as in "2/5".
    pub fn progress(&self) -> (usize, usize) {
        (self.position + 1, self.len)
    }
}

/// A group being stepped through.
#[derive(Clone, Debug)]
pub struct ReviewSession<'a> {
    group: &'a FlashcardGroup,
    cursor: ReviewCursor,
}

impl<'a> ReviewSession<'a> {
    pub fn new(group: &'a FlashcardGroup) -> Result<Self, CursorError> {
        Ok(Self {
            group,
            cursor: ReviewCursor::new(group.terms.len())?,
        })
    }

    pub fn group(&self) -> &'a FlashcardGroup {
        self.group
    }

    pub fn cursor(&self) -> &ReviewCursor {
        &self.cursor
    }

    pub fn current_term(&self) -> &'a Term {
        &self.group.terms[self.cursor.position()]
    }

    pub fn next(&mut self) -> &'a Term {
        self.cursor.next();
        self.current_term()
    }

    pub fn previous(&mut self) -> &'a Term {
        self.cursor.previous();
        self.current_term()
    }

    pub fn jump_to(&mut self, index: usize) -> Result<&'a Term, CursorError> {
        self.cursor.jump_to(index)?;
        Ok(self.current_term())
    }

    pub fn progress_label(&self) -> String {
        let (n, total) = self.cursor.progress();
        format!("{n}/{total}")
    }
}
