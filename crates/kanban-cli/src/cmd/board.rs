//! `kb board`: fetch tickets and render them as a grouped, ordered board.

use crate::output::{OutputMode, pretty_section, render_mode};
use crate::source::{FileSource, HttpSource};
use anyhow::{Context, Result};
use clap::Args;
use kanban_core::config::EffectiveConfig;
use kanban_core::model::ticket::{TicketPayload, ingest, ingest_lenient};
use kanban_core::source::TicketSource;
use kanban_core::{BoardError, BoardOptions, GroupDimension, GroupKey, GroupedView, SortKey, Ticket, assemble};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub struct BoardArgs {
    /// Column grouping: userId, status, priority.
    #[arg(short, long, value_name = "DIMENSION")]
    pub group_by: Option<GroupDimension>,

    /// Ordering within each column: priority, title.
    #[arg(short, long, value_name = "KEY")]
    pub order_by: Option<SortKey>,

    /// Ticket endpoint to fetch from (overrides config and KANBAN_SOURCE_URL).
    #[arg(long, conflicts_with = "input")]
    pub url: Option<String>,

    /// Read a saved payload instead of fetching; `-` reads stdin.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Skip tickets that break the data contract instead of failing.
    #[arg(long)]
    pub skip_invalid: bool,
}

impl BoardArgs {
    /// Configured board options with any flag overrides applied.
    fn options(&self, config: &EffectiveConfig) -> BoardOptions {
        let mut options = config.board.options();
        if let Some(dimension) = self.group_by {
            options.dimension = dimension;
        }
        if let Some(sort) = self.order_by {
            options.sort = sort;
        }
        options
    }

    fn source(&self, config: &EffectiveConfig) -> Box<dyn TicketSource> {
        if let Some(path) = &self.input {
            return Box::new(FileSource::new(path.clone()));
        }
        let url = self.url.clone().unwrap_or_else(|| config.source.url.clone());
        Box::new(HttpSource::new(
            url,
            Duration::from_secs(config.source.timeout_secs),
        ))
    }
}

/// A record dropped by `--skip-invalid`.
#[derive(Debug, Serialize)]
struct Rejected {
    error_code: &'static str,
    message: String,
}

impl From<&BoardError> for Rejected {
    fn from(err: &BoardError) -> Self {
        Self {
            error_code: err.code().code(),
            message: err.to_string(),
        }
    }
}

#[derive(Serialize)]
struct BoardReport<'v, 'a> {
    source: String,
    sort: SortKey,
    #[serde(flatten)]
    board: &'v GroupedView<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rejected: Vec<Rejected>,
    #[serde(skip)]
    payload: &'v TicketPayload,
}

pub fn run_board(args: &BoardArgs, config: &EffectiveConfig, output: OutputMode) -> Result<()> {
    let options = args.options(config);
    let skip_invalid = args.skip_invalid || config.board.skip_invalid;
    let source = args.source(config);

    let payload = source
        .fetch()
        .with_context(|| format!("failed to load tickets from {}", source.describe()))?;

    let (tickets, rejected) = if skip_invalid {
        let ingested = ingest_lenient(payload.tickets.iter().cloned());
        if !ingested.rejected.is_empty() {
            warn!(count = ingested.rejected.len(), "skipped invalid tickets");
        }
        (ingested.tickets, ingested.rejected)
    } else {
        (ingest(payload.tickets.iter().cloned())?, Vec::new())
    };

    let view = assemble(&tickets, options);
    info!(
        columns = view.len(),
        tickets = view.ticket_count(),
        rejected = rejected.len(),
        "board ready"
    );

    let report = BoardReport {
        source: source.describe(),
        sort: options.sort,
        board: &view,
        rejected: rejected.iter().map(Rejected::from).collect(),
        payload: &payload,
    };

    render_mode(
        output,
        &report,
        |r, w| write_text(r.board, w),
        |r, w| write_pretty(r.board, r.sort, r.payload, &r.rejected, w),
    )
}

fn column_label(key: &GroupKey, payload: &TicketPayload) -> String {
    match key {
        GroupKey::Owner(user_id) => payload
            .user_name(user_id)
            .map_or_else(|| user_id.clone(), |name| format!("{name} ({user_id})")),
        GroupKey::Status(_) | GroupKey::Priority(_) => key.label(),
    }
}

fn write_card(ticket: &Ticket, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "  {:<8} {}", ticket.id, ticket.title)?;
    if ticket.tag.is_empty() {
        writeln!(w, "  {:<8} [{}]", "", ticket.priority)
    } else {
        writeln!(w, "  {:<8} [{}] ! {}", "", ticket.priority, ticket.tag)
    }
}

fn write_pretty(
    view: &GroupedView<'_>,
    sort: SortKey,
    payload: &TicketPayload,
    rejected: &[Rejected],
    w: &mut dyn Write,
) -> io::Result<()> {
    writeln!(
        w,
        "Board grouped by {}, ordered by {} ({} tickets)",
        view.dimension(),
        sort,
        view.ticket_count()
    )?;

    if view.is_empty() {
        writeln!(w)?;
        writeln!(w, "No tickets.")?;
    }

    for (key, tickets) in view.iter() {
        writeln!(w)?;
        pretty_section(w, &format!("{} ({})", column_label(key, payload), tickets.len()))?;
        if tickets.is_empty() {
            writeln!(w, "  (empty)")?;
        }
        for ticket in tickets {
            write_card(ticket, w)?;
        }
    }

    if !rejected.is_empty() {
        writeln!(w)?;
        pretty_section(w, &format!("Skipped ({})", rejected.len()))?;
        for record in rejected {
            writeln!(w, "  {} {}", record.error_code, record.message)?;
        }
    }
    Ok(())
}

/// One tab-separated row per ticket: column, id, priority, title, tag.
/// Empty columns produce no rows; use JSON output to see every column.
fn write_text(view: &GroupedView<'_>, w: &mut dyn Write) -> io::Result<()> {
    for (key, tickets) in view.iter() {
        for ticket in tickets {
            writeln!(
                w,
                "{}\t{}\t{}\t{}\t{}",
                key,
                ticket.id,
                ticket.priority.level(),
                ticket.title,
                ticket.tag
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanban_core::Priority;
    use kanban_core::model::ticket::User;

    fn ticket(id: &str, title: &str, priority: Priority, status: &str, user: &str) -> Ticket {
        Ticket {
            id: id.to_string(),
            title: title.to_string(),
            tag: "Feature Request".to_string(),
            priority,
            user_id: user.to_string(),
            status: status.to_string(),
        }
    }

    fn render_pretty(view: &GroupedView<'_>, sort: SortKey, payload: &TicketPayload) -> String {
        let mut buf = Vec::new();
        write_pretty(view, sort, payload, &[], &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn board_args_defaults() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: BoardArgs,
        }
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.group_by.is_none());
        assert!(w.args.order_by.is_none());
        assert!(w.args.input.is_none());
        assert!(!w.args.skip_invalid);

        let w = Wrapper::parse_from(["test", "-g", "userId", "-o", "title"]);
        assert_eq!(w.args.group_by, Some(GroupDimension::ByOwner));
        assert_eq!(w.args.order_by, Some(SortKey::ByTitleAscending));
    }

    #[test]
    fn flags_override_configured_options() {
        use clap::Parser;
        use kanban_core::config::{EnvOverrides, FileConfig, layer};

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: BoardArgs,
        }
        let mut project = FileConfig::default();
        project.board.group_by = Some("priority".to_string());
        project.board.order_by = Some("title".to_string());
        let config = layer(&project, &FileConfig::default(), &EnvOverrides::default()).unwrap();

        let w = Wrapper::parse_from(["test"]);
        assert_eq!(w.args.options(&config), config.board.options());

        let w = Wrapper::parse_from(["test", "--order-by", "priority"]);
        assert_eq!(
            w.args.options(&config),
            BoardOptions {
                dimension: GroupDimension::ByPriority,
                sort: SortKey::ByPriorityDescending,
            }
        );
    }

    #[test]
    fn board_args_reject_unknown_options() {
        use clap::Parser;

        #[derive(Parser, Debug)]
        struct Wrapper {
            #[command(flatten)]
            args: BoardArgs,
        }
        let err = Wrapper::try_parse_from(["test", "--order-by", "date"]).unwrap_err();
        assert!(err.to_string().contains("unsupported ordering option"));
    }

    #[test]
    fn text_rows_follow_board_order() {
        let tickets = vec![
            ticket("CAM-1", "Zed", Priority::Low, "Todo", "usr-1"),
            ticket("CAM-2", "Alpha", Priority::Urgent, "Todo", "usr-1"),
        ];
        let view = assemble(
            &tickets,
            BoardOptions {
                dimension: GroupDimension::ByStatus,
                sort: SortKey::ByTitleAscending,
            },
        );
        let mut buf = Vec::new();
        write_text(&view, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Todo\tCAM-2\t4\tAlpha\tFeature Request\nTodo\tCAM-1\t1\tZed\tFeature Request\n"
        );
    }

    #[test]
    fn pretty_shows_every_priority_column() {
        let tickets = vec![ticket("CAM-1", "Login", Priority::High, "Todo", "usr-1")];
        let view = assemble(
            &tickets,
            BoardOptions {
                dimension: GroupDimension::ByPriority,
                sort: SortKey::ByPriorityDescending,
            },
        );
        let text = render_pretty(&view, SortKey::ByPriorityDescending, &TicketPayload::default());
        assert!(text.starts_with("Board grouped by priority, ordered by priority (1 tickets)"));
        for label in ["No Priority (0)", "Low (0)", "Medium (0)", "High (1)", "Urgent (0)"] {
            assert!(text.contains(label), "missing column {label}");
        }
        assert!(text.contains("[High] ! Feature Request"));
        assert_eq!(text.matches("(empty)").count(), 4);
    }

    #[test]
    fn owner_columns_use_display_names_when_known() {
        let tickets = vec![
            ticket("CAM-1", "Login", Priority::High, "Todo", "usr-1"),
            ticket("CAM-2", "Logout", Priority::Low, "Todo", "usr-9"),
        ];
        let payload = TicketPayload {
            tickets: Vec::new(),
            users: vec![User {
                id: "usr-1".to_string(),
                name: "Anoop Sharma".to_string(),
                available: true,
            }],
        };
        let view = assemble(
            &tickets,
            BoardOptions {
                dimension: GroupDimension::ByOwner,
                sort: SortKey::ByTitleAscending,
            },
        );
        let text = render_pretty(&view, SortKey::ByTitleAscending, &payload);
        assert!(text.contains("Anoop Sharma (usr-1) (1)"));
        assert!(text.contains("usr-9 (1)"));
    }

    #[test]
    fn empty_status_board_says_so() {
        let view = assemble(&[], BoardOptions::default());
        let text = render_pretty(&view, SortKey::default(), &TicketPayload::default());
        assert!(text.contains("No tickets."));
    }

    #[test]
    fn json_report_flattens_columns() {
        let tickets = vec![ticket("CAM-1", "Login", Priority::High, "Todo", "usr-1")];
        let view = assemble(&tickets, BoardOptions::default());
        let payload = TicketPayload::default();
        let report = BoardReport {
            source: "stdin".to_string(),
            sort: SortKey::default(),
            board: &view,
            rejected: vec![Rejected::from(&BoardError::InvalidPriority {
                ticket_id: "CAM-9".to_string(),
                value: 8,
            })],
            payload: &payload,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["source"], "stdin");
        assert_eq!(json["dimension"], "status");
        assert_eq!(json["sort"], "priority");
        assert_eq!(json["columns"][0]["key"], "Todo");
        assert_eq!(json["rejected"][0]["error_code"], "E2005");
    }
}
