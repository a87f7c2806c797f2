//! Board shaping: partition tickets into columns, then order each column.
//!
//! ```text
//! tickets ──partition(dimension)──▶ GroupedView ──order(sort)──▶ GroupedView
//! ```
//!
//! Both stages are pure. A board is recomputed from scratch whenever the
//! tickets or the [`BoardOptions`] change; nothing is patched in place.

pub mod collate;
pub mod order;
pub mod partition;
pub mod view;

pub use order::order;
pub use partition::partition;
pub use view::GroupedView;

use crate::error::BoardError;
use crate::model::ticket::{Priority, Ticket};
use serde::{Deserialize, Serialize, Serializer};
use std::{fmt, str::FromStr};
use tracing::debug;

/// The criterion used to partition tickets into columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GroupDimension {
    #[serde(rename = "userId", alias = "user", alias = "owner")]
    ByOwner,
    #[default]
    #[serde(rename = "status")]
    ByStatus,
    #[serde(rename = "priority")]
    ByPriority,
}

impl GroupDimension {
    pub const ALL: [Self; 3] = [Self::ByOwner, Self::ByStatus, Self::ByPriority];

    const fn as_str(self) -> &'static str {
        match self {
            Self::ByOwner => "userId",
            Self::ByStatus => "status",
            Self::ByPriority => "priority",
        }
    }

    /// The column a ticket belongs to under this dimension.
    #[must_use]
    pub fn key_of(self, ticket: &Ticket) -> GroupKey {
        match self {
            Self::ByOwner => GroupKey::Owner(ticket.user_id.clone()),
            Self::ByStatus => GroupKey::Status(ticket.status.clone()),
            Self::ByPriority => GroupKey::Priority(ticket.priority),
        }
    }
}

fn normalize(input: &str) -> String {
    input
        .trim()
        .to_ascii_lowercase()
        .replace(['_', ' '], "-")
}

impl fmt::Display for GroupDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupDimension {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "userid" | "user-id" | "user" | "owner" => Ok(Self::ByOwner),
            "status" => Ok(Self::ByStatus),
            "priority" => Ok(Self::ByPriority),
            _ => Err(BoardError::UnsupportedGroupDimension(s.to_string())),
        }
    }
}

/// The criterion used to order tickets within a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "priority")]
    ByPriorityDescending,
    #[serde(rename = "title")]
    ByTitleAscending,
}

impl SortKey {
    pub const ALL: [Self; 2] = [Self::ByPriorityDescending, Self::ByTitleAscending];

    const fn as_str(self) -> &'static str {
        match self {
            Self::ByPriorityDescending => "priority",
            Self::ByTitleAscending => "title",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "priority" => Ok(Self::ByPriorityDescending),
            "title" => Ok(Self::ByTitleAscending),
            _ => Err(BoardError::UnsupportedSortKey(s.to_string())),
        }
    }
}

/// The user's current board selection, passed by value on every recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardOptions {
    #[serde(default)]
    pub dimension: GroupDimension,
    #[serde(default)]
    pub sort: SortKey,
}

/// Identifies a column. The variant always matches the view's dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Owner(String),
    Status(String),
    Priority(Priority),
}

impl GroupKey {
    /// Human-readable column header.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Owner(value) | Self::Status(value) => value.clone(),
            Self::Priority(priority) => priority.label().to_string(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner(value) | Self::Status(value) => f.write_str(value),
            Self::Priority(priority) => write!(f, "{}", priority.level()),
        }
    }
}

/// Serialized as the raw key: a string for owner/status, an integer for priority.
impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Owner(value) | Self::Status(value) => serializer.serialize_str(value),
            Self::Priority(priority) => serializer.serialize_u8(priority.level()),
        }
    }
}

/// Build the board for `tickets` under `options`.
#[must_use]
pub fn assemble(tickets: &[Ticket], options: BoardOptions) -> GroupedView<'_> {
    let view = order(partition(tickets, options.dimension), options.sort);
    debug!(
        dimension = %options.dimension,
        sort = %options.sort,
        columns = view.len(),
        tickets = view.ticket_count(),
        "assembled board"
    );
    view
}
