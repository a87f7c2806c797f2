use std::fmt;

/// Machine-readable error codes for scripts and agents consuming the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    SourceUnavailable,
    SourceDecodeFailed,
    InvalidPriority,
    DuplicateTicket,
    UnsupportedGroupDimension,
    UnsupportedSortKey,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::SourceUnavailable => "E1101",
            Self::SourceDecodeFailed => "E1102",
            Self::InvalidPriority => "E2005",
            Self::DuplicateTicket => "E2006",
            Self::UnsupportedGroupDimension => "E2101",
            Self::UnsupportedSortKey => "E2102",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::SourceUnavailable => "Ticket source unavailable",
            Self::SourceDecodeFailed => "Ticket payload could not be decoded",
            Self::InvalidPriority => "Ticket priority outside 0..=4",
            Self::DuplicateTicket => "Duplicate ticket ID",
            Self::UnsupportedGroupDimension => "Unsupported grouping option",
            Self::UnsupportedSortKey => "Unsupported ordering option",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .kanban/config.toml and retry."),
            Self::SourceUnavailable => {
                Some("Check the source URL or pass --input with a saved payload.")
            }
            Self::SourceDecodeFailed => {
                Some("The payload must be a JSON object with a `tickets` array.")
            }
            Self::InvalidPriority => {
                Some("Use --skip-invalid to quarantine the record and render the rest.")
            }
            Self::DuplicateTicket => {
                Some("Use --skip-invalid to keep the first occurrence of each ID.")
            }
            Self::UnsupportedGroupDimension => Some("Group by one of: userId, status, priority."),
            Self::UnsupportedSortKey => Some("Order by one of: priority, title."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failures surfaced by ticket sources, ingestion, config, and option parsing.
///
/// Partitioning and ordering themselves are infallible once tickets have
/// been ingested: priority is already a closed enum and option dispatch is
/// an exhaustive match.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("ticket '{ticket_id}' has priority {value}, expected 0..=4")]
    InvalidPriority { ticket_id: String, value: i64 },

    #[error("ticket id '{ticket_id}' appears more than once")]
    DuplicateTicket { ticket_id: String },

    #[error("unsupported grouping option '{0}'")]
    UnsupportedGroupDimension(String),

    #[error("unsupported ordering option '{0}'")]
    UnsupportedSortKey(String),

    #[error("failed to decode ticket payload: {0}")]
    SourceDecode(String),

    #[error("ticket source {source_name} unavailable: {message}")]
    SourceUnavailable { source_name: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Config { path: String, message: String },
}

impl BoardError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidPriority { .. } => ErrorCode::InvalidPriority,
            Self::DuplicateTicket { .. } => ErrorCode::DuplicateTicket,
            Self::UnsupportedGroupDimension(_) => ErrorCode::UnsupportedGroupDimension,
            Self::UnsupportedSortKey(_) => ErrorCode::UnsupportedSortKey,
            Self::SourceDecode(_) => ErrorCode::SourceDecodeFailed,
            Self::SourceUnavailable { .. } => ErrorCode::SourceUnavailable,
            Self::Config { .. } => ErrorCode::ConfigParseError,
        }
    }
}
