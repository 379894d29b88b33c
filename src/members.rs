use std::cmp::Ordering;

use crate::{
    editor::{relocate, EditPlan, Range, Selection, TextDocument, TextEdit},
    syntax::{MemberDescriptor, Span},
};

/// A member projected onto one document snapshot.
///
/// `text` and `range` are only valid for the snapshot they were taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberWithRange {
    pub name: String,
    pub range: Range,
    pub span: Span,
    pub text: String,
    pub index: usize,
}

pub fn project(document: &TextDocument, descriptors: &[MemberDescriptor]) -> Vec<MemberWithRange> {
    descriptors
        .iter()
        .enumerate()
        .map(|(index, descriptor)| MemberWithRange {
            name: descriptor.name.clone(),
            range: document.range_of(descriptor.span),
            span: descriptor.span,
            text: document.slice(descriptor.span),
            index,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Result of planning a sort or a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reorder {
    Planned(EditPlan),
    /// The members are already in the requested order
    Unchanged,
    /// The move would leave the scope
    AtBoundary(String),
    NoMembers,
}

/// Case-insensitive comparison, lowercase before uppercase on ties
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| case_tiebreak(a, b))
        .then_with(|| a.cmp(b))
}

fn case_tiebreak(a: &str, b: &str) -> Ordering {
    a.chars()
        .zip(b.chars())
        .find(|(x, y)| x != y)
        .map_or(Ordering::Equal, |(x, y)| {
            match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => Ordering::Equal,
            }
        })
}

/// Stable sort by name; equal names keep their declaration order in both directions
pub fn sort_members_by_name(
    members: &[MemberWithRange],
    order: SortOrder,
) -> Vec<&MemberWithRange> {
    let mut sorted = members.iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| match order {
        SortOrder::Ascending => compare_names(&a.name, &b.name),
        SortOrder::Descending => compare_names(&b.name, &a.name),
    });
    sorted
}

/// Rewrite every slot with the member that ranks there, last slot first
pub fn plan_sort(members: &[MemberWithRange], order: SortOrder) -> Reorder {
    if members.is_empty() {
        return Reorder::NoMembers;
    }

    let sorted = sort_members_by_name(members, order);
    if sorted
        .iter()
        .zip(members)
        .all(|(sorted, original)| sorted.index == original.index)
    {
        return Reorder::Unchanged;
    }

    let edits = members
        .iter()
        .zip(&sorted)
        .rev()
        .map(|(slot, member)| TextEdit::replace(slot.range, member.text.clone()))
        .collect();

    Reorder::Planned(EditPlan {
        edits,
        focus: vec![],
        summary: format!("Sorted {} members {order}", members.len()),
    })
}

/// Indices of the members any selection picks out
pub fn overlapping_indices(members: &[MemberWithRange], selections: &[Selection]) -> Vec<usize> {
    members
        .iter()
        .filter(|member| {
            selections
                .iter()
                .any(|selection| selection.touches(member.range))
        })
        .map(|member| member.index)
        .collect()
}

/// Move the selected members one slot up or down.
///
/// A single member swaps with its neighbor and the cursor follows it; several selected members
/// move as the block from the first to the last of them, keeping the block selected.
pub fn plan_move(
    document: &TextDocument,
    members: &[MemberWithRange],
    selected: &[usize],
    direction: Direction,
) -> Reorder {
    let (Some(&first), Some(&last)) = (selected.iter().min(), selected.iter().max()) else {
        return Reorder::NoMembers;
    };

    let (slots, block_slots) = match direction {
        Direction::Up if first == 0 => {
            return Reorder::AtBoundary(format!("Cannot move {} up", members[first].name));
        }
        Direction::Down if last + 1 >= members.len() => {
            return Reorder::AtBoundary(format!("Cannot move {} down", members[last].name));
        }
        Direction::Up => (first - 1..=last, first - 1..=last - 1),
        Direction::Down => (first..=last + 1, first + 1..=last + 1),
    };

    let arrangement = match direction {
        Direction::Up => (first..=last).chain([first - 1]).collect::<Vec<_>>(),
        Direction::Down => [last + 1].into_iter().chain(first..=last).collect(),
    };

    // (slot, member that lands in it)
    let placements = slots
        .clone()
        .zip(arrangement)
        .collect::<Vec<(usize, usize)>>();

    let replacements = placements
        .iter()
        .map(|&(slot, member)| (members[slot].span, members[member].text.len()))
        .collect::<Vec<_>>();
    let relocated = relocate(&replacements);

    let focus = if first == last {
        // the cursor lands at the start of the moved member
        let start = relocated[*block_slots.start() - slots.start()].start;
        Span::new(start, start)
    } else {
        Span::new(
            relocated[*block_slots.start() - slots.start()].start,
            relocated[*block_slots.end() - slots.start()].end,
        )
    };

    let edits = placements
        .iter()
        .rev()
        .map(|&(slot, member)| TextEdit::replace(members[slot].range, members[member].text.clone()))
        .collect();

    let subject = if first == last {
        members[first].name.clone()
    } else {
        format!("{} members", last - first + 1)
    };

    log::debug!(
        "moving {subject} {direction} in {}",
        document.file_name()
    );

    Reorder::Planned(EditPlan {
        edits,
        focus: vec![focus],
        summary: format!("Moved {subject} {direction}"),
    })
}

/// The first member starting after `offset`, wrapping to the first member
pub fn find_next_member(members: &[MemberWithRange], offset: usize) -> Option<&MemberWithRange> {
    members
        .iter()
        .find(|member| member.span.start > offset)
        .or_else(|| members.first())
}

/// The member containing `offset`, else the last one starting at or before it, else the first
pub fn current_member_index(members: &[MemberWithRange], offset: usize) -> usize {
    members
        .iter()
        .position(|member| member.span.contains(offset))
        .or_else(|| members.iter().rposition(|member| member.span.start <= offset))
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectNext {
    pub current: MemberWithRange,
    pub upcoming: MemberWithRange,
}

pub fn select_next(members: &[MemberWithRange], offset: usize) -> Option<SelectNext> {
    if members.is_empty() {
        return None;
    }

    let current = current_member_index(members, offset);
    let upcoming = (current + 1) % members.len();
    Some(SelectNext {
        current: members[current].clone(),
        upcoming: members[upcoming].clone(),
    })
}
