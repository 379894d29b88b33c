use std::sync::Arc;

use fieldwork::Fieldwork;

use crate::{
    arbitrator::{arbitrate, Candidate},
    config::Settings,
    editor::{
        relocate, EditPlan, EditorService, MessageLevel, Position, Selection, TextDocument,
        TextEdit,
    },
    error::CommandError,
    languages::{traits::HandlerError, LanguageCommon, LanguageRegistry},
    members::{self, MemberWithRange, Reorder, SortOrder},
    resolver::ElementResolver,
    session::Navigation,
};

/// Every command the engine offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, clap::ValueEnum)]
#[strum(serialize_all = "kebab-case")]
pub enum Command {
    SelectElement,
    DeleteElement,
    CutElement,
    SelectNextMember,
    AddNextMember,
    SortMembersAscending,
    SortMembersDescending,
    MoveMemberUp,
    MoveMemberDown,
    SelectFunctionScope,
    SelectJsxElement,
    ListMembers,
}

/// A command that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done(String),
    /// Nothing needed doing; the document is untouched
    NothingToDo(String),
}

impl Outcome {
    pub fn message(&self) -> &str {
        match self {
            Self::Done(message) | Self::NothingToDo(message) => message,
        }
    }
}

/// The command boundary.
///
/// Owns the navigation state, turns every result into a notification and submits edits through
/// the editor service.
#[derive(Debug, Fieldwork)]
#[fieldwork(get)]
pub struct ElementCommands {
    registry: Arc<LanguageRegistry>,
    settings: Settings,
    #[fieldwork(get(copy))]
    navigation: Navigation,
}

impl ElementCommands {
    pub fn new(registry: Arc<LanguageRegistry>, settings: Settings) -> Self {
        Self {
            registry,
            settings,
            navigation: Navigation::new(),
        }
    }

    pub fn from_settings(settings: Settings) -> Self {
        let registry = LanguageRegistry::with_cache_capacity(settings.tree_cache_capacity());
        Self::new(Arc::new(registry), settings)
    }

    /// Run `command` against the editor's active document and report how it went.
    ///
    /// The result is already surfaced through [`EditorService::notify`] when this returns.
    pub async fn run(
        &mut self,
        editor: &mut impl EditorService,
        command: Command,
    ) -> Result<Outcome, CommandError> {
        if command != Command::SelectNextMember {
            self.navigation.reset();
        }

        let result = self.execute(editor, command).await;

        match &result {
            Ok(outcome) => {
                log::debug!("{command}: {}", outcome.message());
                editor.notify(MessageLevel::Info, outcome.message());
            }
            Err(error) => {
                self.navigation.reset();
                if let CommandError::Internal(internal) = error {
                    log::error!("{command} failed: {internal:?}");
                }
                if let Some(level) = error.level() {
                    let message = match error {
                        CommandError::Internal(_) => format!("{command} failed unexpectedly"),
                        other => other.to_string(),
                    };
                    editor.notify(level, &message);
                }
            }
        }

        result
    }

    async fn execute(
        &mut self,
        editor: &mut impl EditorService,
        command: Command,
    ) -> Result<Outcome, CommandError> {
        let document = editor
            .active_document()
            .ok_or(CommandError::NoActiveContext)?;
        let registry = self.registry.clone();
        let language = registry.for_document(&document).ok_or_else(|| {
            CommandError::UnsupportedLanguage {
                language: document.language_id().to_string(),
                capability: "element commands",
            }
        })?;
        let selections = editor.selections();
        let cursor = selections
            .first()
            .map(|selection| selection.active)
            .ok_or(CommandError::NoActiveContext)?;

        log::trace!("{command} in {} at {cursor:?}", document.file_name());

        match command {
            Command::SelectElement => {
                let candidates = self.candidates(language, &document, &selections)?;
                editor.set_selections(
                    candidates
                        .iter()
                        .map(|candidate| Selection::from_range(candidate.range))
                        .collect(),
                );
                // candidates come latest first
                if let Some(earliest) = candidates.last() {
                    editor.reveal(earliest.range);
                }
                Ok(Outcome::Done(format!(
                    "Selected {}",
                    count(candidates.len(), "element")
                )))
            }

            Command::DeleteElement | Command::CutElement => {
                let cut = command == Command::CutElement;
                self.remove_elements(editor, language, &document, &selections, cut)
                    .await
            }

            Command::SelectNextMember => {
                self.select_next_member(editor, language, &document, &selections, cursor)
            }

            Command::AddNextMember => {
                let member = language
                    .handler()
                    .next_member_range(&document, cursor)
                    .map_err(handler_error(language))?
                    .ok_or(CommandError::NoElementFound("member"))?;

                if selections.iter().any(|selection| selection.range() == member.range) {
                    return Ok(Outcome::NothingToDo(format!(
                        "{} is already selected",
                        display_name(&member)
                    )));
                }

                let mut selections = selections;
                selections.push(Selection::from_range(member.range));
                editor.set_selections(selections);
                editor.reveal(member.range);
                Ok(Outcome::Done(format!("Added {}", display_name(&member))))
            }

            Command::SortMembersAscending | Command::SortMembersDescending => {
                let order = if command == Command::SortMembersAscending {
                    SortOrder::Ascending
                } else {
                    SortOrder::Descending
                };
                let reorder = language
                    .handler()
                    .sort_members_by_name(&document, cursor, order)
                    .map_err(handler_error(language))?;
                self.apply_reorder(editor, &document, reorder, "Members are already sorted")
                    .await
            }

            Command::MoveMemberUp | Command::MoveMemberDown => {
                let handler = language.handler();
                let reorder = if command == Command::MoveMemberUp {
                    handler.move_member_up(&document, &selections)
                } else {
                    handler.move_member_down(&document, &selections)
                }
                .map_err(handler_error(language))?;
                self.apply_reorder(editor, &document, reorder, "Nothing to move").await
            }

            Command::SelectFunctionScope => {
                let range = language
                    .handler()
                    .function_scope_range(&document, cursor)
                    .map_err(handler_error(language))?
                    .ok_or(CommandError::NoElementFound("function"))?;
                editor.set_selections(vec![Selection::from_range(range)]);
                editor.reveal(range);
                Ok(Outcome::Done("Selected function scope".into()))
            }

            Command::SelectJsxElement => {
                let range = language
                    .handler()
                    .jsx_element_range(&document, cursor)
                    .map_err(handler_error(language))?
                    .ok_or(CommandError::NoElementFound("JSX element"))?;
                editor.set_selections(vec![Selection::from_range(range)]);
                editor.reveal(range);
                Ok(Outcome::Done("Selected JSX element".into()))
            }

            Command::ListMembers => {
                let members = language
                    .handler()
                    .members_in_scope(&document, cursor)
                    .map_err(handler_error(language))?;
                if members.is_empty() {
                    return Err(CommandError::NoElementFound("member"));
                }
                let names = members.iter().map(display_name).collect::<Vec<_>>();
                Ok(Outcome::Done(format!("Members: {}", names.join(", "))))
            }
        }
    }

    fn candidates(
        &self,
        language: &LanguageCommon,
        document: &TextDocument,
        selections: &[Selection],
    ) -> Result<Vec<Candidate>, CommandError> {
        let cursors = selections
            .iter()
            .map(|selection| selection.active)
            .collect::<Vec<_>>();
        let resolver = ElementResolver::new(self.settings.resolver_order());
        let candidates = arbitrate(&resolver, language, document, &cursors)?;
        if candidates.is_empty() {
            Err(CommandError::NoElementFound("element"))
        } else {
            Ok(candidates)
        }
    }

    /// Delete the arbitrated elements in one batch, and for a cut put their text on the
    /// clipboard once the batch has landed
    async fn remove_elements(
        &self,
        editor: &mut impl EditorService,
        language: &LanguageCommon,
        document: &TextDocument,
        selections: &[Selection],
        cut: bool,
    ) -> Result<Outcome, CommandError> {
        let candidates = self.candidates(language, document, selections)?;
        let edits = candidates
            .iter()
            .map(|candidate| TextEdit::delete(candidate.range))
            .collect();

        if !editor.apply_edits(document, edits).await {
            return Err(CommandError::EditApplicationFailure);
        }

        // candidates come latest first
        let in_document_order = candidates.iter().rev();
        if cut {
            let text = in_document_order
                .clone()
                .map(|candidate| candidate.source_text.as_str())
                .collect::<Vec<_>>()
                .join(self.settings.clipboard_separator());
            editor.write_clipboard(text);
        }

        let removed = in_document_order
            .map(|candidate| (document.span_of(candidate.range), 0))
            .collect::<Vec<_>>();
        if let Some(edited) = editor.active_document() {
            editor.set_selections(
                relocate(&removed)
                    .into_iter()
                    .map(|span| Selection::cursor(edited.position_at(span.start)))
                    .collect(),
            );
        }

        let verb = if cut { "Cut" } else { "Deleted" };
        Ok(Outcome::Done(format!(
            "{verb} {}",
            count(candidates.len(), "element")
        )))
    }

    fn select_next_member(
        &mut self,
        editor: &mut impl EditorService,
        language: &LanguageCommon,
        document: &TextDocument,
        selections: &[Selection],
        cursor: Position,
    ) -> Result<Outcome, CommandError> {
        let lookup = self.navigation.lookup_position(cursor);
        let members = language
            .handler()
            .members_in_scope(document, lookup)
            .map_err(handler_error(language))?;
        let step = members::select_next(&members, document.offset_at(lookup))
            .ok_or(CommandError::NoElementFound("member"))?;

        let mut selections = selections
            .iter()
            .filter(|selection| !selection.is_empty())
            .copied()
            .collect::<Vec<_>>();
        if !selections
            .iter()
            .any(|selection| selection.range() == step.current.range)
        {
            selections.push(Selection::from_range(step.current.range));
        }
        editor.set_selections(selections);
        editor.reveal(step.current.range);

        self.navigation.advance_to(step.upcoming.range.start);

        Ok(Outcome::Done(format!(
            "Selected {}; next is {}",
            display_name(&step.current),
            display_name(&step.upcoming)
        )))
    }

    async fn apply_reorder(
        &self,
        editor: &mut impl EditorService,
        document: &TextDocument,
        reorder: Reorder,
        unchanged: &str,
    ) -> Result<Outcome, CommandError> {
        let EditPlan {
            edits,
            focus,
            summary,
        } = match reorder {
            Reorder::Planned(plan) => plan,
            Reorder::Unchanged => return Ok(Outcome::NothingToDo(unchanged.into())),
            Reorder::AtBoundary(message) => return Err(CommandError::BoundaryExceeded(message)),
            Reorder::NoMembers => return Err(CommandError::NoElementFound("member")),
        };

        if !editor.apply_edits(document, edits).await {
            return Err(CommandError::EditApplicationFailure);
        }

        if let (false, Some(edited)) = (focus.is_empty(), editor.active_document()) {
            let selections = focus
                .iter()
                .map(|span| Selection::from_range(edited.range_of(*span)))
                .collect::<Vec<_>>();
            if let Some(first) = selections.first() {
                editor.reveal(first.range());
            }
            editor.set_selections(selections);
        }

        Ok(Outcome::Done(summary))
    }
}

fn handler_error(language: &LanguageCommon) -> impl Fn(HandlerError) -> CommandError {
    let name = language.name();
    move |error| CommandError::from_handler(error, name.to_string())
}

fn display_name(member: &MemberWithRange) -> String {
    if member.name.is_empty() {
        format!("member {}", member.index + 1)
    } else {
        member.name.clone()
    }
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
