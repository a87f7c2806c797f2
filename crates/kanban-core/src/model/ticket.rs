use crate::error::BoardError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// The five canonical priority levels.
///
/// Serialized as the integer level used on the wire (`0` through `4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Priority {
    NoPriority,
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// All levels in ascending order.
    pub const ALL: [Self; 5] = [
        Self::NoPriority,
        Self::Low,
        Self::Medium,
        Self::High,
        Self::Urgent,
    ];

    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::NoPriority => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Urgent => 4,
        }
    }

    /// Display name used for column headers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoPriority => "No Priority",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }

    /// Validate a wire-level priority for the ticket `ticket_id`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidPriority`] when `value` is outside `0..=4`.
    pub fn from_level(ticket_id: &str, value: i64) -> Result<Self, BoardError> {
        match value {
            0 => Ok(Self::NoPriority),
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            4 => Ok(Self::Urgent),
            _ => Err(BoardError::InvalidPriority {
                ticket_id: ticket_id.to_string(),
                value,
            }),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.level()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated, immutable work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub tag: String,
    pub priority: Priority,
    pub user_id: String,
    pub status: String,
}

/// Ticket tags arrive either as a single label or a list of labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagField {
    One(String),
    Many(Vec<String>),
}

impl Default for TagField {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl TagField {
    fn into_label(self) -> String {
        match self {
            Self::One(tag) => tag,
            Self::Many(tags) => tags.join(", "),
        }
    }
}

/// A ticket exactly as the source delivers it, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTicket {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tag: TagField,
    pub priority: i64,
    pub user_id: String,
    pub status: String,
}

impl RawTicket {
    /// Validate this record into a [`Ticket`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidPriority`] for an out-of-range priority.
    pub fn validate(self) -> Result<Ticket, BoardError> {
        let priority = Priority::from_level(&self.id, self.priority)?;
        Ok(Ticket {
            id: self.id,
            title: self.title,
            tag: self.tag.into_label(),
            priority,
            user_id: self.user_id,
            status: self.status,
        })
    }
}

/// A user referenced by `Ticket::user_id`. Only used to label owner columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub available: bool,
}

/// The JSON body returned by a ticket source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketPayload {
    pub tickets: Vec<RawTicket>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl TicketPayload {
    /// Decode a payload from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::SourceDecode`] if the body is not a JSON object
    /// with a `tickets` array of well-formed records.
    pub fn from_json(body: &str) -> Result<Self, BoardError> {
        serde_json::from_str(body).map_err(|err| BoardError::SourceDecode(err.to_string()))
    }

    /// Display name for `user_id`, if the payload carries one.
    #[must_use]
    pub fn user_name(&self, user_id: &str) -> Option<&str> {
        self.users
            .iter()
            .find(|user| user.id == user_id)
            .map(|user| user.name.as_str())
    }
}

/// Result of lenient ingestion: the valid tickets plus quarantined records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ingested {
    pub tickets: Vec<Ticket>,
    pub rejected: Vec<BoardError>,
}

/// Validate every record, failing on the first data-contract violation.
///
/// # Errors
///
/// Returns [`BoardError::InvalidPriority`] or [`BoardError::DuplicateTicket`]
/// for the first offending record.
pub fn ingest(raw: impl IntoIterator<Item = RawTicket>) -> Result<Vec<Ticket>, BoardError> {
    let mut seen = HashSet::new();
    let mut tickets = Vec::new();
    for record in raw {
        if !seen.insert(record.id.clone()) {
            return Err(BoardError::DuplicateTicket {
                ticket_id: record.id,
            });
        }
        tickets.push(record.validate()?);
    }
    Ok(tickets)
}

/// Validate every record, quarantining violations instead of failing.
///
/// The first occurrence of a duplicated id is kept; later ones are rejected.
#[must_use]
pub fn ingest_lenient(raw: impl IntoIterator<Item = RawTicket>) -> Ingested {
    let mut seen = HashSet::new();
    let mut out = Ingested::default();
    for record in raw {
        if seen.contains(&record.id) {
            warn!(ticket_id = %record.id, "quarantined duplicate ticket");
            out.rejected.push(BoardError::DuplicateTicket {
                ticket_id: record.id,
            });
            continue;
        }
        let id = record.id.clone();
        match record.validate() {
            Ok(ticket) => {
                seen.insert(id);
                out.tickets.push(ticket);
            }
            Err(err) => {
                warn!(ticket_id = %id, error = %err, "quarantined invalid ticket");
                out.rejected.push(err);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, priority: i64) -> RawTicket {
        RawTicket {
            id: id.to_string(),
            title: format!("title {id}"),
            tag: TagField::One("Feature Request".to_string()),
            priority,
            user_id: "usr-1".to_string(),
            status: "Todo".to_string(),
        }
    }

    #[test]
    fn priority_levels_and_labels() {
        let labels: Vec<_> = Priority::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(
            labels,
            vec!["No Priority", "Low", "Medium", "High", "Urgent"]
        );
        for (level, priority) in Priority::ALL.iter().enumerate() {
            assert_eq!(usize::from(priority.level()), level);
        }
    }

    #[test]
    fn priority_rejects_out_of_range() {
        assert_eq!(
            Priority::from_level("CAM-9", 5),
            Err(BoardError::InvalidPriority {
                ticket_id: "CAM-9".to_string(),
                value: 5,
            })
        );
        assert!(Priority::from_level("CAM-9", -1).is_err());
    }

    #[test]
    fn priority_json_is_integer() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "3");
        assert_eq!(serde_json::to_string(&Priority::NoPriority).unwrap(), "0");
    }

    #[test]
    fn payload_decodes_wire_schema() {
        let body = r#"{
            "tickets": [
                {"id": "CAM-1", "title": "Update user profile", "tag": ["Feature Request"],
                 "userId": "usr-1", "status": "Todo", "priority": 4},
                {"id": "CAM-2", "title": "Dark mode", "tag": "UI",
                 "userId": "usr-2", "status": "In progress", "priority": 0}
            ],
            "users": [{"id": "usr-1", "name": "Anoop Sharma", "available": false}]
        }"#;
        let payload = TicketPayload::from_json(body).unwrap();
        assert_eq!(payload.tickets.len(), 2);
        assert_eq!(payload.user_name("usr-1"), Some("Anoop Sharma"));
        assert_eq!(payload.user_name("usr-2"), None);

        let tickets = ingest(payload.tickets).unwrap();
        assert_eq!(tickets[0].tag, "Feature Request");
        assert_eq!(tickets[0].priority, Priority::Urgent);
        assert_eq!(tickets[1].tag, "UI");
    }

    #[test]
    fn payload_without_tickets_is_a_decode_error() {
        let err = TicketPayload::from_json(r#"{"users": []}"#).unwrap_err();
        assert!(matches!(err, BoardError::SourceDecode(_)));
    }

    #[test]
    fn ingest_rejects_first_invalid_record() {
        let err = ingest(vec![raw("a", 1), raw("b", 7), raw("c", 9)]).unwrap_err();
        assert_eq!(
            err,
            BoardError::InvalidPriority {
                ticket_id: "b".to_string(),
                value: 7,
            }
        );
    }

    #[test]
    fn ingest_rejects_duplicate_ids() {
        let err = ingest(vec![raw("a", 1), raw("a", 2)]).unwrap_err();
        assert_eq!(
            err,
            BoardError::DuplicateTicket {
                ticket_id: "a".to_string()
            }
        );
        assert_eq!(err.code().code(), "E2006");
    }

    #[test]
    fn lenient_ingest_quarantines_and_keeps_order() {
        let out = ingest_lenient(vec![raw("a", 1), raw("b", 5), raw("c", 3), raw("a", 0)]);
        let ids: Vec<_> = out.tickets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(out.rejected.len(), 2);
        assert!(matches!(
            out.rejected[0],
            BoardError::InvalidPriority { value: 5, .. }
        ));
        assert!(matches!(out.rejected[1], BoardError::DuplicateTicket { .. }));
    }

    #[test]
    fn invalid_record_does_not_reserve_its_id() {
        let out = ingest_lenient(vec![raw("a", 9), raw("a", 2)]);
        assert_eq!(out.tickets.len(), 1);
        assert_eq!(out.tickets[0].priority, Priority::Medium);
    }
}
