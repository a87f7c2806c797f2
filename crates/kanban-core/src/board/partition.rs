use super::{GroupDimension, GroupKey, GroupedView};
use crate::model::ticket::{Priority, Ticket};
use indexmap::IndexMap;
use tracing::debug;

/// Split `tickets` into columns by `dimension`.
///
/// Every ticket lands in exactly one column, in input order. Grouping by
/// priority always yields the five canonical columns, empty or not; owner
/// and status columns exist only for values seen in the input.
#[must_use]
pub fn partition(tickets: &[Ticket], dimension: GroupDimension) -> GroupedView<'_> {
    let mut groups: IndexMap<GroupKey, Vec<&Ticket>> = IndexMap::new();

    if dimension == GroupDimension::ByPriority {
        for priority in Priority::ALL {
            groups.insert(GroupKey::Priority(priority), Vec::new());
        }
    }

    for ticket in tickets {
        groups.entry(dimension.key_of(ticket)).or_default().push(ticket);
    }

    debug!(%dimension, columns = groups.len(), tickets = tickets.len(), "partitioned");
    GroupedView::from_groups(dimension, groups)
}
