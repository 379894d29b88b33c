mod document;
mod edit;
mod memory;

pub use document::{Position, Range, Selection, TextDocument};
pub use edit::{relocate, EditConflict, EditPlan, TextEdit};
pub use memory::MemoryEditor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// Services the host editor provides to element commands.
///
/// Every method except [`EditorService::apply_edits`] is synchronous. An edit batch is applied
/// atomically against the document version it was planned from, and either lands completely or
/// not at all.
#[allow(async_fn_in_trait)]
pub trait EditorService {
    /// Snapshot of the document in the active view, if any
    fn active_document(&self) -> Option<TextDocument>;

    fn selections(&self) -> Vec<Selection>;

    fn set_selections(&mut self, selections: Vec<Selection>);

    fn reveal(&mut self, range: Range);

    /// Apply every edit or none. Returns false when the host rejected the batch.
    async fn apply_edits(&mut self, document: &TextDocument, edits: Vec<TextEdit>) -> bool;

    fn notify(&mut self, level: MessageLevel, message: &str);

    fn write_clipboard(&mut self, text: String);
}
