use ropey::Rope;

use super::Range;
use crate::syntax::Span;

/// Replace `range` with `new_text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

impl TextEdit {
    pub fn replace(range: Range, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }

    pub fn delete(range: Range) -> Self {
        Self::replace(range, "")
    }
}

/// A batch of edits planned against one document snapshot.
///
/// `focus` holds byte spans in the post-edit document that should become the selections once
/// the batch lands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditPlan {
    pub edits: Vec<TextEdit>,
    pub focus: Vec<Span>,
    pub summary: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditConflict {
    #[error("edits overlap at byte {0}")]
    Overlap(usize),
    #[error("edit ends past the document at byte {0}")]
    OutOfBounds(usize),
}

/// Where each replaced span lands once every replacement is applied.
///
/// Takes `(original span, replacement length)` pairs over disjoint spans, in any order; the
/// result is in the same order as the input.
pub fn relocate(replacements: &[(Span, usize)]) -> Vec<Span> {
    let mut order = (0..replacements.len()).collect::<Vec<_>>();
    order.sort_by_key(|&index| replacements[index].0.start);

    let mut relocated = vec![Span::default(); replacements.len()];
    let mut delta: isize = 0;
    for index in order {
        let (span, new_len) = replacements[index];
        let start = span.start.saturating_add_signed(delta);
        relocated[index] = Span::new(start, start + new_len);
        delta += new_len as isize - span.len() as isize;
    }
    relocated
}

/// Apply byte-span replacements to a copy of `rope`, all or nothing
pub(crate) fn apply_spans(rope: &Rope, mut edits: Vec<(Span, &str)>) -> Result<Rope, EditConflict> {
    edits.sort_by_key(|(span, _)| (span.start, span.end));

    if let Some((span, _)) = edits.iter().find(|(span, _)| span.end > rope.len_bytes()) {
        return Err(EditConflict::OutOfBounds(span.end));
    }
    if let Some(pair) = edits.windows(2).find(|pair| pair[0].0.end > pair[1].0.start) {
        return Err(EditConflict::Overlap(pair[1].0.start));
    }

    let mut rope = rope.clone();
    for (span, text) in edits.into_iter().rev() {
        let start_char = rope.byte_to_char(span.start);
        let end_char = rope.byte_to_char(span.end);
        rope.remove(start_char..end_char);
        rope.insert(start_char, text);
    }
    Ok(rope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relocate_shifts_later_spans() {
        let spans = relocate(&[(Span::new(10, 14), 0), (Span::new(0, 2), 5)]);
        assert_eq!(spans, vec![Span::new(13, 13), Span::new(0, 5)]);
    }

    #[test]
    fn apply_spans_is_order_independent() {
        let rope = Rope::from_str("one two three");
        let edited = apply_spans(
            &rope,
            vec![(Span::new(8, 13), "3"), (Span::new(0, 3), "1")],
        )
        .unwrap();
        assert_eq!(edited.to_string(), "1 two 3");
        assert_eq!(rope.to_string(), "one two three");
    }

    #[test]
    fn overlapping_spans_are_rejected() {
        let rope = Rope::from_str("abcdef");
        assert_eq!(
            apply_spans(&rope, vec![(Span::new(0, 3), ""), (Span::new(2, 4), "")]),
            Err(EditConflict::Overlap(2))
        );
        assert_eq!(
            apply_spans(&rope, vec![(Span::new(4, 9), "")]),
            Err(EditConflict::OutOfBounds(9))
        );
    }
}
