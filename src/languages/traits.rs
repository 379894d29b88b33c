use crate::{
    editor::{Position, Range, Selection, TextDocument},
    members::{self, Direction, MemberWithRange, Reorder, SortOrder},
};

/// Why a handler could not answer
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The language does not offer this capability at all
    #[error("{0} is not supported")]
    Unsupported(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type Capability<T> = Result<T, HandlerError>;

/// Element lookups and member operations for one language.
///
/// Lookups return `Ok(None)` when nothing applies at the position; optional capabilities
/// return [`HandlerError::Unsupported`] unless the language implements them. Every method is
/// side-effect free and answers against the snapshot it is given.
pub trait LanguageHandler: Send + Sync {
    fn class_range(
        &self,
        document: &TextDocument,
        position: Position,
        word: &str,
    ) -> Capability<Option<Range>>;

    fn function_range(
        &self,
        document: &TextDocument,
        position: Position,
        word: &str,
    ) -> Capability<Option<Range>>;

    fn variable_range(
        &self,
        document: &TextDocument,
        position: Position,
        word: &str,
    ) -> Capability<Option<Range>>;

    fn object_key_range(
        &self,
        document: &TextDocument,
        position: Position,
        word: &str,
    ) -> Capability<Option<Range>>;

    fn class_member_range(
        &self,
        document: &TextDocument,
        position: Position,
        word: &str,
    ) -> Capability<Option<Range>>;

    fn multiline_string_range(
        &self,
        document: &TextDocument,
        position: Position,
        word: &str,
    ) -> Capability<Option<Range>>;

    fn jsx_element_range(
        &self,
        _document: &TextDocument,
        _position: Position,
    ) -> Capability<Option<Range>> {
        Err(HandlerError::Unsupported("jsx element selection"))
    }

    /// Markup element around the position
    fn element_range(
        &self,
        _document: &TextDocument,
        _position: Position,
        _word: &str,
    ) -> Capability<Option<Range>> {
        Err(HandlerError::Unsupported("markup element selection"))
    }

    /// Structured-data property addressed by the key path around the position
    fn property_range(
        &self,
        _document: &TextDocument,
        _position: Position,
        _word: &str,
    ) -> Capability<Option<Range>> {
        Err(HandlerError::Unsupported("property selection"))
    }

    fn function_scope_range(
        &self,
        _document: &TextDocument,
        _position: Position,
    ) -> Capability<Option<Range>> {
        Err(HandlerError::Unsupported("function scope selection"))
    }

    /// Members of the innermost scope around the position, in declaration order
    fn members_in_scope(
        &self,
        _document: &TextDocument,
        _position: Position,
    ) -> Capability<Vec<MemberWithRange>> {
        Err(HandlerError::Unsupported("member navigation"))
    }

    fn next_member_range(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> Capability<Option<MemberWithRange>> {
        let members = self.members_in_scope(document, position)?;
        Ok(members::find_next_member(&members, document.offset_at(position)).cloned())
    }

    fn sort_members_by_name(
        &self,
        document: &TextDocument,
        position: Position,
        order: SortOrder,
    ) -> Capability<Reorder> {
        let members = self.members_in_scope(document, position)?;
        Ok(members::plan_sort(&members, order))
    }

    fn move_member_up(
        &self,
        document: &TextDocument,
        selections: &[Selection],
    ) -> Capability<Reorder> {
        let (members, selected) = self.selected_members(document, selections)?;
        Ok(members::plan_move(document, &members, &selected, Direction::Up))
    }

    fn move_member_down(
        &self,
        document: &TextDocument,
        selections: &[Selection],
    ) -> Capability<Reorder> {
        let (members, selected) = self.selected_members(document, selections)?;
        Ok(members::plan_move(document, &members, &selected, Direction::Down))
    }

    /// The scope of the first selection's anchor, with the indices any selection overlaps
    fn selected_members(
        &self,
        document: &TextDocument,
        selections: &[Selection],
    ) -> Capability<(Vec<MemberWithRange>, Vec<usize>)> {
        let Some(first) = selections.first() else {
            return Ok((vec![], vec![]));
        };
        let members = self.members_in_scope(document, first.anchor)?;
        let selected = members::overlapping_indices(&members, selections);
        Ok((members, selected))
    }
}
