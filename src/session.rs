use crate::editor::Position;

/// Where the next select-next-member invocation continues.
///
/// Owned by one command handler. Any other command, a failure, or a missing capability resets
/// it, so a fresh select-next always starts from the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigation {
    next_position: Option<Position>,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_position(&self) -> Option<Position> {
        self.next_position
    }

    pub fn is_active(&self) -> bool {
        self.next_position.is_some()
    }

    /// The persisted position when a sequence is running, otherwise `cursor`
    pub fn lookup_position(&self, cursor: Position) -> Position {
        self.next_position.unwrap_or(cursor)
    }

    pub fn advance_to(&mut self, position: Position) {
        self.next_position = Some(position);
    }

    pub fn reset(&mut self) {
        if self.next_position.take().is_some() {
            log::trace!("member navigation reset");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_follows_persisted_position_until_reset() {
        let mut navigation = Navigation::new();
        let cursor = Position::new(4, 2);
        assert_eq!(navigation.lookup_position(cursor), cursor);

        navigation.advance_to(Position::new(9, 0));
        assert!(navigation.is_active());
        assert_eq!(navigation.lookup_position(cursor), Position::new(9, 0));

        navigation.reset();
        assert!(!navigation.is_active());
        assert_eq!(navigation.lookup_position(cursor), cursor);
    }
}
