use crate::{DynObject, Value};

/// Cursor over an object's own members, in insertion order.
///
/// The member map is read afresh at every step, so members added behind
/// the cursor are picked up. Prototype members are never visited.
#[derive(Debug, Clone)]
pub struct Members {
    object: DynObject,
    cursor: usize,
}

impl Members {
    pub(crate) fn new(object: DynObject) -> Self {
        Members { object, cursor: 0 }
    }

    /// Back to the first member
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn valid(&self) -> bool {
        self.cursor < self.object.len()
    }

    pub fn key(&self) -> Option<String> {
        self.object
            .entry_at(self.cursor)
            .map(|(name, _)| name)
    }

    pub fn current(&self) -> Option<Value> {
        self.object
            .entry_at(self.cursor)
            .map(|(_, value)| value)
    }
}

impl Iterator for Members {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.object.entry_at(self.cursor)?;
        self.cursor += 1;
        Some(entry)
    }
}
