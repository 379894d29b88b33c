use crate::{
    editor::{Position, Range, TextDocument},
    languages::LanguageCommon,
    resolver::ElementResolver,
};

/// A resolved element boundary, with the text it covered when it was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub range: Range,
    pub source_text: String,
}

/// One candidate per cursor that resolves to an element; cursors that resolve to nothing are
/// dropped
pub fn collect_candidates(
    resolver: &ElementResolver,
    language: &LanguageCommon,
    document: &TextDocument,
    cursors: &[Position],
) -> anyhow::Result<Vec<Candidate>> {
    let mut candidates = vec![];
    for &cursor in cursors {
        if let Some(range) = resolver.resolve(language, document, cursor)? {
            candidates.push(Candidate {
                range,
                source_text: document.text_in(range),
            });
        }
    }
    Ok(candidates)
}

/// Latest start first; a candidate survives only if it overlaps none of those already kept
pub fn remove_overlaps(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.range.start.cmp(&a.range.start));

    let mut kept: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if kept.iter().all(|k| !k.range.overlaps(&candidate.range)) {
            kept.push(candidate);
        } else {
            log::trace!("dropping overlapping candidate {:?}", candidate.range);
        }
    }
    kept
}

pub fn arbitrate(
    resolver: &ElementResolver,
    language: &LanguageCommon,
    document: &TextDocument,
    cursors: &[Position],
) -> anyhow::Result<Vec<Candidate>> {
    Ok(remove_overlaps(collect_candidates(
        resolver, language, document, cursors,
    )?))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::languages::LanguageRegistry;

    fn candidate(start: (usize, usize), end: (usize, usize)) -> Candidate {
        Candidate {
            range: Range::new(
                Position::new(start.0, start.1),
                Position::new(end.0, end.1),
            ),
            source_text: String::new(),
        }
    }

    #[test]
    fn latest_start_wins_and_output_is_descending() {
        let kept = remove_overlaps(vec![
            candidate((0, 0), (9, 1)),
            candidate((2, 2), (4, 3)),
            candidate((6, 2), (6, 9)),
        ]);
        assert_eq!(
            kept,
            vec![candidate((6, 2), (6, 9)), candidate((2, 2), (4, 3))]
        );
    }

    #[test]
    fn touching_candidates_overlap() {
        let kept = remove_overlaps(vec![candidate((0, 0), (0, 5)), candidate((0, 5), (0, 8))]);
        assert_eq!(kept, vec![candidate((0, 5), (0, 8))]);
    }

    #[test]
    fn arbitration_is_idempotent() {
        let once = remove_overlaps(vec![
            candidate((1, 0), (3, 0)),
            candidate((2, 0), (2, 4)),
            candidate((5, 0), (5, 4)),
        ]);
        assert_eq!(remove_overlaps(once.clone()), once);
    }

    #[test]
    fn method_survives_its_class() {
        let source = "class Store {\n  save() {\n    return 1;\n  }\n}\n";
        let registry = LanguageRegistry::new();
        let language = registry.get_language("typescript").unwrap();
        let document = TextDocument::new("store.ts", "typescript", source);

        let kept = arbitrate(
            &ElementResolver::default(),
            language,
            &document,
            &[Position::new(0, 8), Position::new(1, 3), Position::new(2, 4)],
        )
        .unwrap();

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].source_text, "save() {\n    return 1;\n  }");
    }
}
