use fieldwork::Fieldwork;

use super::{
    edit::apply_spans, EditorService, MessageLevel, Position, Range, Selection, TextDocument,
    TextEdit,
};

/// In-process editor over a single document.
///
/// Backs the command line harness and the test suite.
#[derive(Debug, Clone, Fieldwork)]
#[fieldwork(get)]
pub struct MemoryEditor {
    document: TextDocument,
    #[fieldwork(skip)]
    selections: Vec<Selection>,
    #[fieldwork(skip)]
    clipboard: Option<String>,
    messages: Vec<(MessageLevel, String)>,
    revealed: Vec<Range>,
    #[fieldwork(skip)]
    fail_next_edit: bool,
    #[fieldwork(skip)]
    detached: bool,
}

impl MemoryEditor {
    pub fn new(document: TextDocument) -> Self {
        Self {
            document,
            selections: vec![Selection::cursor(Position::default())],
            clipboard: None,
            messages: vec![],
            revealed: vec![],
            fail_next_edit: false,
            detached: false,
        }
    }

    pub fn with_cursor(mut self, position: Position) -> Self {
        self.selections = vec![Selection::cursor(position)];
        self
    }

    pub fn with_selections(mut self, selections: Vec<Selection>) -> Self {
        self.selections = selections;
        self
    }

    /// Behave as if no document were open
    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }

    pub fn text(&self) -> String {
        self.document.text()
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    /// Reject the next edit batch, as a host would when the document changed underneath it
    pub fn fail_next_edit(&mut self) {
        self.fail_next_edit = true;
    }

    fn clamp(&self, position: Position) -> Position {
        self.document
            .position_at(self.document.offset_at(position))
    }
}

impl EditorService for MemoryEditor {
    fn active_document(&self) -> Option<TextDocument> {
        (!self.detached).then(|| self.document.clone())
    }

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn set_selections(&mut self, selections: Vec<Selection>) {
        self.selections = selections;
    }

    fn reveal(&mut self, range: Range) {
        self.revealed.push(range);
    }

    async fn apply_edits(&mut self, document: &TextDocument, edits: Vec<TextEdit>) -> bool {
        if std::mem::take(&mut self.fail_next_edit) {
            log::debug!("rejecting edit batch on request");
            return false;
        }

        if document.version() != self.document.version()
            || document.file_name() != self.document.file_name()
        {
            log::debug!(
                "rejecting edit batch planned against {}@{}",
                document.file_name(),
                document.version()
            );
            return false;
        }

        let spans = edits
            .iter()
            .map(|edit| (self.document.span_of(edit.range), edit.new_text.as_str()))
            .collect();

        match apply_spans(self.document.rope(), spans) {
            Ok(rope) => {
                self.document = self.document.revise(rope);
                self.selections = self
                    .selections
                    .iter()
                    .map(|selection| Selection {
                        anchor: self.clamp(selection.anchor),
                        active: self.clamp(selection.active),
                    })
                    .collect();
                true
            }
            Err(conflict) => {
                log::debug!("rejecting edit batch: {conflict}");
                false
            }
        }
    }

    fn notify(&mut self, level: MessageLevel, message: &str) {
        self.messages.push((level, message.to_string()));
    }

    fn write_clipboard(&mut self, text: String) {
        self.clipboard = Some(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(text: &str) -> MemoryEditor {
        MemoryEditor::new(TextDocument::new("a.ts", "typescript", text))
    }

    fn range(a: (usize, usize), b: (usize, usize)) -> Range {
        Range::new(Position::new(a.0, a.1), Position::new(b.0, b.1))
    }

    #[tokio::test]
    async fn applies_batch_atomically() {
        let mut editor = editor("let a = 1;\nlet b = 2;\n");
        let snapshot = editor.active_document().unwrap();
        let applied = editor
            .apply_edits(
                &snapshot,
                vec![
                    TextEdit::replace(range((1, 4), (1, 5)), "bee"),
                    TextEdit::replace(range((0, 4), (0, 5)), "ay"),
                ],
            )
            .await;
        assert!(applied);
        assert_eq!(editor.text(), "let ay = 1;\nlet bee = 2;\n");
        assert_eq!(editor.document().version(), 1);
    }

    #[tokio::test]
    async fn overlapping_batch_leaves_document_untouched() {
        let mut editor = editor("abcdef");
        let snapshot = editor.active_document().unwrap();
        let applied = editor
            .apply_edits(
                &snapshot,
                vec![
                    TextEdit::delete(range((0, 0), (0, 3))),
                    TextEdit::delete(range((0, 2), (0, 5))),
                ],
            )
            .await;
        assert!(!applied);
        assert_eq!(editor.text(), "abcdef");
    }

    #[tokio::test]
    async fn stale_snapshot_is_rejected() {
        let mut editor = editor("abc");
        let snapshot = editor.active_document().unwrap();
        assert!(
            editor
                .apply_edits(&snapshot, vec![TextEdit::delete(range((0, 0), (0, 1)))])
                .await
        );
        assert!(
            !editor
                .apply_edits(&snapshot, vec![TextEdit::delete(range((0, 0), (0, 1)))])
                .await
        );
        assert_eq!(editor.text(), "bc");
    }

    #[tokio::test]
    async fn requested_failure_applies_once() {
        let mut editor = editor("abc");
        editor.fail_next_edit();
        let snapshot = editor.active_document().unwrap();
        let edits = vec![TextEdit::delete(range((0, 0), (0, 1)))];
        assert!(!editor.apply_edits(&snapshot, edits.clone()).await);
        assert!(editor.apply_edits(&snapshot, edits).await);
        assert_eq!(editor.text(), "bc");
    }
}
