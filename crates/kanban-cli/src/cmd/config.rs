//! `kb config`: inspect configuration layers.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use kanban_core::config::{
    EffectiveConfig, FileConfig, load_project_config, load_user_config, project_config_path,
    user_config_path,
};
use std::io::Write;
use std::path::Path;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Show resolved or raw configuration
    Show(ShowArgs),
    /// Print the config file locations
    Path,
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Show raw project config only
    #[arg(long, conflicts_with = "user")]
    project: bool,

    /// Show raw user config only
    #[arg(long)]
    user: bool,
}

pub fn run_config(
    args: &ConfigArgs,
    effective: &EffectiveConfig,
    project_root: &Path,
    output: OutputMode,
) -> Result<()> {
    match &args.command {
        ConfigCommand::Show(show) => run_show(show, effective, project_root, output),
        ConfigCommand::Path => run_path(project_root, output),
    }
}

fn run_show(
    args: &ShowArgs,
    effective: &EffectiveConfig,
    project_root: &Path,
    output: OutputMode,
) -> Result<()> {
    if args.project || args.user {
        let raw = if args.project {
            load_project_config(project_root)?
        } else {
            load_user_config()?
        };
        return render_mode(output, &raw, write_toml, write_toml);
    }

    render_mode(output, effective, write_effective_text, write_effective_pretty)
}

fn write_toml(raw: &FileConfig, w: &mut dyn Write) -> std::io::Result<()> {
    let rendered = toml::to_string_pretty(raw).map_err(std::io::Error::other)?;
    write!(w, "{rendered}")
}

fn write_effective_text(cfg: &EffectiveConfig, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "source.url\t{}", cfg.source.url)?;
    writeln!(w, "source.timeout_secs\t{}", cfg.source.timeout_secs)?;
    writeln!(w, "board.group_by\t{}", cfg.board.group_by)?;
    writeln!(w, "board.order_by\t{}", cfg.board.order_by)?;
    writeln!(w, "board.skip_invalid\t{}", cfg.board.skip_invalid)?;
    writeln!(w, "output\t{}", cfg.output.as_deref().unwrap_or("auto"))
}

fn write_effective_pretty(cfg: &EffectiveConfig, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Effective configuration")?;
    pretty_kv(w, "source url", &cfg.source.url)?;
    pretty_kv(w, "timeout", format!("{}s", cfg.source.timeout_secs))?;
    pretty_kv(w, "group by", cfg.board.group_by.to_string())?;
    pretty_kv(w, "order by", cfg.board.order_by.to_string())?;
    pretty_kv(w, "skip invalid", cfg.board.skip_invalid.to_string())?;
    pretty_kv(w, "output", cfg.output.as_deref().unwrap_or("auto"))
}

fn run_path(project_root: &Path, output: OutputMode) -> Result<()> {
    let paths = serde_json::json!({
        "project": project_config_path(project_root),
        "user": user_config_path(),
    });
    let user = user_config_path()
        .map_or_else(|| "(no config directory)".to_string(), |p| p.display().to_string());
    let project = project_config_path(project_root).display().to_string();

    render_mode(
        output,
        &paths,
        |_, w| {
            writeln!(w, "project\t{project}")?;
            writeln!(w, "user\t{user}")
        },
        |_, w| {
            pretty_kv(w, "project", &project)?;
            pretty_kv(w, "user", &user)
        },
    )
    .context("failed to print config paths")
}
