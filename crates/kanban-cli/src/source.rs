//! Concrete ticket sources: the remote endpoint and saved payloads.

use kanban_core::BoardError;
use kanban_core::model::ticket::TicketPayload;
use kanban_core::source::TicketSource;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Fetches the payload with a blocking HTTP GET.
pub struct HttpSource {
    url: String,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("kanban-cli/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            url: url.into(),
            agent,
        }
    }

    fn unavailable(&self, message: impl Into<String>) -> BoardError {
        BoardError::SourceUnavailable {
            source_name: self.url.clone(),
            message: message.into(),
        }
    }
}

impl TicketSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<TicketPayload, BoardError> {
        info!(url = %self.url, "fetching tickets");

        let response = self
            .agent
            .get(&self.url)
            .set("Accept", "application/json")
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(code, _) => self.unavailable(format!("HTTP {code}")),
                ureq::Error::Transport(transport) => self.unavailable(transport.to_string()),
            })?;

        let body = response
            .into_string()
            .map_err(|err| self.unavailable(format!("failed to read body: {err}")))?;

        debug!(bytes = body.len(), "received ticket payload");
        TicketPayload::from_json(&body)
    }
}

/// Reads a saved payload from a file, or from stdin when the path is `-`.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }
}

impl TicketSource for FileSource {
    fn describe(&self) -> String {
        if self.is_stdin() {
            "stdin".to_string()
        } else {
            self.path.display().to_string()
        }
    }

    fn fetch(&self) -> Result<TicketPayload, BoardError> {
        let read = if self.is_stdin() {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body).map(|_| body)
        } else {
            std::fs::read_to_string(&self.path)
        };

        let body = read.map_err(|err| BoardError::SourceUnavailable {
            source_name: self.describe(),
            message: err.to_string(),
        })?;

        debug!(source = %self.describe(), bytes = body.len(), "read ticket payload");
        TicketPayload::from_json(&body)
    }
}
