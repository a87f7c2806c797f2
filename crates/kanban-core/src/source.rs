//! The ticket-source contract.
//!
//! A source yields the raw payload; validation happens afterwards in
//! [`crate::model::ticket::ingest`] so every source gets the same checks.

use crate::error::BoardError;
use crate::model::ticket::TicketPayload;

pub trait TicketSource {
    /// Short description for logs and error messages (a URL or a path).
    fn describe(&self) -> String;

    /// Retrieve the current payload.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::SourceUnavailable`] when the source cannot be
    /// reached and [`BoardError::SourceDecode`] when its body is malformed.
    fn fetch(&self) -> Result<TicketPayload, BoardError>;
}

/// A fixed payload, mostly useful for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    payload: TicketPayload,
}

impl StaticSource {
    #[must_use]
    pub const fn new(payload: TicketPayload) -> Self {
        Self { payload }
    }
}

impl TicketSource for StaticSource {
    fn describe(&self) -> String {
        "static payload".to_string()
    }

    fn fetch(&self) -> Result<TicketPayload, BoardError> {
        Ok(self.payload.clone())
    }
}
