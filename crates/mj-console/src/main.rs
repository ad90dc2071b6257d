use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mj_console::client::{ApiClient, Role};
use mj_console::viewer::LogViewer;
use mj_console::{Error, Result, tags};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the console config TOML
    #[arg(long, global = true, default_value = "console.toml")]
    config: PathBuf,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive log table (filter form + pagination)
    Tui,
    /// Print task log pages to stdout
    List {
        /// 1-based page to show; earlier pages are fetched along the way
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Filter by channel id (privileged only)
        #[arg(long)]
        channel_id: Option<String>,
        /// Filter by task id
        #[arg(long)]
        mj_id: Option<String>,
        /// Window start (RFC3339, "YYYY-MM-DD HH:MM:SS" local, or epoch ms)
        #[arg(long)]
        start: Option<String>,
        /// Window end (same formats as --start)
        #[arg(long)]
        end: Option<String>,
    },
    /// Delete logs older than the given time, print the count purged
    Purge {
        /// Cutoff (RFC3339, "YYYY-MM-DD HH:MM:SS" local, or epoch seconds)
        before: String,
    },
    /// Write a gateway option key
    SetOption { key: String, value: String },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    if !matches!(args.cmd, Command::Tui) {
        init_tracing();
    }

    let cfg = mj_console::config::load(&args.config)?;
    match args.cmd {
        Command::Tui => mj_console::ui::run_tui(&cfg),
        Command::List {
            page,
            channel_id,
            mj_id,
            start,
            end,
        } => cmd_list(&cfg, page, channel_id, mj_id, start, end),
        Command::Purge { before } => cmd_purge(&cfg, &before),
        Command::SetOption { key, value } => cmd_set_option(&cfg, &key, &value),
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn build_viewer(cfg: &mj_console::config::ConsoleConfig) -> Result<LogViewer> {
    let client = ApiClient::new(&cfg.resolve_base_url(), cfg.resolve_token())?;
    Ok(LogViewer::new(client, cfg.resolve_role()?, cfg.page_size()))
}

fn cmd_list(
    cfg: &mj_console::config::ConsoleConfig,
    page: usize,
    channel_id: Option<String>,
    mj_id: Option<String>,
    start: Option<String>,
    end: Option<String>,
) -> Result<()> {
    let mut viewer = build_viewer(cfg)?;
    if let Some(c) = channel_id {
        viewer.filters.channel_id = c;
    }
    if let Some(m) = mj_id {
        viewer.filters.mj_id = m;
    }
    if let Some(s) = start {
        viewer.filters.start_timestamp = parse_time_ms(&s)?;
    }
    if let Some(e) = end {
        viewer.filters.end_timestamp = parse_time_ms(&e)?;
    }

    viewer.refresh()?;
    // Only forward-by-one jumps are supported; walk up to the asked page.
    let target = page.max(1);
    for p in 2..=target {
        if viewer.pager().len() < (p - 1) * viewer.pager().page_size() {
            break;
        }
        viewer.go_to_page(p)?;
    }

    let privileged = viewer.role().is_privileged();
    let rows = viewer.visible_rows();
    if rows.is_empty() {
        println!("(no records on page {})", viewer.pager().active_page());
        return Ok(());
    }
    for rec in rows {
        let submit = rec
            .submit_time
            .map(tags::format_timestamp_ms)
            .unwrap_or_else(|| "N/A".into());
        let duration = tags::duration_tag(rec.submit_time, rec.finish_time).label;
        let action = tags::action_tag(rec.action).label;
        let progress = tags::progress_percent(rec.progress.as_deref());
        if privileged {
            println!(
                "{:<19}  {:>8}  ch:{:<5} {:<10} {:<20} {:<8} {:<6} {:>4}%  {}",
                submit,
                duration,
                rec.channel_id,
                action,
                rec.mj_id,
                tags::code_tag(rec.code).label,
                tags::status_tag(rec.status).label,
                progress,
                truncate(&rec.prompt, 60),
            );
        } else {
            println!(
                "{:<19}  {:>8}  {:<10} {:<20} {:>4}%  {}",
                submit,
                duration,
                action,
                rec.mj_id,
                progress,
                truncate(&rec.prompt, 60),
            );
        }
    }
    println!(
        "-- page {} · ~{} records --",
        viewer.pager().active_page(),
        viewer.pager().estimated_total()
    );
    Ok(())
}

fn cmd_purge(cfg: &mj_console::config::ConsoleConfig, before: &str) -> Result<()> {
    let client = ApiClient::new(&cfg.resolve_base_url(), cfg.resolve_token())?;
    let secs = parse_time_ms(before)? / 1000;
    let purged = client.purge_logs(secs)?;
    println!("purged {purged} log records");
    Ok(())
}

fn cmd_set_option(cfg: &mj_console::config::ConsoleConfig, key: &str, value: &str) -> Result<()> {
    let client = ApiClient::new(&cfg.resolve_base_url(), cfg.resolve_token())?;
    client.set_option(key, value)?;
    // The notify flag also gates the local banner; mirror it so the TUI
    // picks the change up without another gateway round trip.
    if key == "mj_notify_enabled" {
        let path = cfg.prefs_path();
        let mut stored = mj_console::prefs::load(&path);
        stored.mj_notify_enabled = value.to_string();
        mj_console::prefs::store(&path, &stored)?;
    }
    println!("option '{key}' updated");
    Ok(())
}

/// Accepts RFC3339, a local "YYYY-MM-DD HH:MM:SS", or a raw epoch value
/// (treated as seconds below 1e12, millis otherwise). Returns epoch millis.
fn parse_time_ms(raw: &str) -> Result<i64> {
    let raw = raw.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.timestamp_millis());
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        use chrono::TimeZone;
        if let Some(local) = chrono::Local.from_local_datetime(&naive).single() {
            return Ok(local.timestamp_millis());
        }
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(if n < 1_000_000_000_000 { n * 1000 } else { n });
    }
    Err(Error::msg(format!(
        "could not parse time '{raw}' (expected RFC3339, 'YYYY-MM-DD HH:MM:SS', or an epoch value)"
    )))
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{cut}…")
}
