use parse_display::Display;
use serde::{Deserialize, Serialize};


/// An element that keeps its identity but changes position.
///
/// `old_index` refers to the sequence before the transaction, `new_index` to the sequence after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub old_index: usize,
    pub new_index: usize,
}

impl Move {
    pub fn new(old_index: usize, new_index: usize) -> Self {
        Self {
            old_index,
            new_index,
        }
    }
}

/// A change notification delivered to the handler of an [`ObservableVec`](crate::ObservableVec).
///
/// Events arrive in transactions: `BeginUpdates`, then at most one each of
/// `Moves`, `Deletes`, `Inserts` and `Updates` in that order, then `EndUpdates`.
/// Consumers should apply the events of one transaction atomically.
/// Delete indices and move sources refer to the sequence before the transaction;
/// insert indices, move destinations and update indices refer to the sequence after it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeEvent<T> {
    BeginUpdates,
    Moves(Vec<Move>),
    Deletes { indices: Vec<usize>, elements: Vec<T> },
    Inserts { indices: Vec<usize>, elements: Vec<T> },
    Updates { indices: Vec<usize>, elements: Vec<T> },
    EndUpdates,
}

/// Kind of a [`ChangeEvent`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[display(style = "camelCase")]
pub enum ChangeKind {
    BeginUpdates,
    Moves,
    Deletes,
    Inserts,
    Updates,
    EndUpdates,
}

impl<T> ChangeEvent<T> {
    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeEvent::BeginUpdates => ChangeKind::BeginUpdates,
            ChangeEvent::Moves(_) => ChangeKind::Moves,
            ChangeEvent::Deletes { .. } => ChangeKind::Deletes,
            ChangeEvent::Inserts { .. } => ChangeKind::Inserts,
            ChangeEvent::Updates { .. } => ChangeKind::Updates,
            ChangeEvent::EndUpdates => ChangeKind::EndUpdates,
        }
    }

    /// Indices touched by this event. For moves, these are the destination indices.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        use iter_n::iter3::*;
        match self {
            ChangeEvent::Moves(moves) => moves.iter().map(|m| m.new_index).into_iter0(),
            ChangeEvent::Deletes { indices, .. }
            | ChangeEvent::Inserts { indices, .. }
            | ChangeEvent::Updates { indices, .. } => indices.iter().copied().into_iter1(),
            ChangeEvent::BeginUpdates | ChangeEvent::EndUpdates => [].into_iter2(),
        }
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self, ChangeEvent::BeginUpdates | ChangeEvent::EndUpdates)
    }
}
