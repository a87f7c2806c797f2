use super::{GroupDimension, GroupKey};
use crate::model::ticket::Ticket;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Render-ready board: ordered columns of borrowed tickets.
///
/// Column order is the canonical priority order for
/// [`GroupDimension::ByPriority`] and first appearance in the input for the
/// other dimensions. The view borrows from the ticket slice it was built
/// from and never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedView<'a> {
    dimension: GroupDimension,
    groups: IndexMap<GroupKey, Vec<&'a Ticket>>,
}

impl<'a> GroupedView<'a> {
    pub(crate) fn from_groups(
        dimension: GroupDimension,
        groups: IndexMap<GroupKey, Vec<&'a Ticket>>,
    ) -> Self {
        Self { dimension, groups }
    }

    pub(crate) fn into_groups(self) -> (GroupDimension, IndexMap<GroupKey, Vec<&'a Ticket>>) {
        (self.dimension, self.groups)
    }

    #[must_use]
    pub const fn dimension(&self) -> GroupDimension {
        self.dimension
    }

    /// Tickets in the column for `key`, if that column exists.
    #[must_use]
    pub fn get(&self, key: &GroupKey) -> Option<&[&'a Ticket]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &[&'a Ticket])> {
        self.groups.iter().map(|(key, tickets)| (key, tickets.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.keys()
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total tickets across all columns.
    #[must_use]
    pub fn ticket_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

#[derive(Serialize)]
struct ColumnRepr<'v, 'a> {
    key: &'v GroupKey,
    label: String,
    tickets: &'v [&'a Ticket],
}

#[derive(Serialize)]
struct ViewRepr<'v, 'a> {
    dimension: GroupDimension,
    columns: Vec<ColumnRepr<'v, 'a>>,
}

impl Serialize for GroupedView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ViewRepr {
            dimension: self.dimension,
            columns: self
                .iter()
                .map(|(key, tickets)| ColumnRepr {
                    key,
                    label: key.label(),
                    tickets,
                })
                .collect(),
        }
        .serialize(serializer)
    }
}
