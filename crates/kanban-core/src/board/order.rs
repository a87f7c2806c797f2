use super::collate::compare_titles;
use super::{GroupedView, SortKey};
use tracing::debug;

/// Reorder every column of `view` by `key`.
///
/// Column membership and column order are unchanged. Both sorts are stable,
/// so tickets that compare equal keep their relative order, and applying
/// the same key twice gives the same result as applying it once.
#[must_use]
pub fn order(view: GroupedView<'_>, key: SortKey) -> GroupedView<'_> {
    let (dimension, mut groups) = view.into_groups();

    for tickets in groups.values_mut() {
        match key {
            SortKey::ByPriorityDescending => {
                tickets.sort_by(|a, b| b.priority.cmp(&a.priority));
            }
            SortKey::ByTitleAscending => {
                tickets.sort_by(|a, b| compare_titles(&a.title, &b.title));
            }
        }
    }

    debug!(
        %key,
        columns = groups.len(),
        tickets = groups.values().map(Vec::len).sum::<usize>(),
        "ordered"
    );
    GroupedView::from_groups(dimension, groups)
}
