//! Quiz SRS CLI
//!
//! Command-line consumer of the spaced-repetition scheduler.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use quiz_srs_core::scheduler::next_reminder_at;
use quiz_srs_core::{
    MasteryLevel, ReviewSchedule, ScheduleSnapshot, SchedulerConfig, SqliteScheduleStore,
    SrsScheduler, SystemClock, quality_from_correct,
};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Database file name inside `--data-dir`
const DB_FILE_NAME: &str = "schedules.db";

/// Quiz SRS - spaced-repetition scheduler CLI
#[derive(Parser)]
#[command(name = "quiz-srs")]
#[command(author = "Quiz SRS Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "CLI for the quiz spaced-repetition scheduler")]
#[command(long_about = "Records quiz answers into SM-2 review schedules and shows what is due.\n\nSchedules live in a SQLite database under the platform data directory unless --data-dir is given.")]
struct Cli {
    /// Custom data directory
    #[arg(long, global = true, env = "QUIZ_SRS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one answer for an item
    Review {
        /// Item (question) id
        item_id: String,
        /// Group (proposal) id the item belongs to
        #[arg(long)]
        group: String,
        /// Answer was correct (quality 5)
        #[arg(long, conflicts_with_all = ["incorrect", "quality"])]
        correct: bool,
        /// Answer was incorrect (quality 0)
        #[arg(long, conflicts_with = "quality")]
        incorrect: bool,
        /// Explicit SM-2 quality, 0-5
        #[arg(long, allow_hyphen_values = true)]
        quality: Option<i32>,
    },

    /// List item ids due at or before an instant
    Due {
        /// RFC 3339 instant, defaults to now
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Show today's review queue
    Queue {
        /// Restrict to one group
        #[arg(long)]
        group: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show review statistics for a group
    Stats {
        group: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the schedule of one item
    Show {
        item_id: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored schedules
    List {
        /// Restrict to one group
        #[arg(long)]
        group: Option<String>,
    },

    /// Show what a correct or incorrect answer would do to an item
    Preview { item_id: String },

    /// Show the due-review reminder, if any
    Remind,

    /// Delete every schedule of a group
    Reset {
        group: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Export all schedules as a JSON snapshot
    Export {
        /// Output file path
        output: PathBuf,
    },

    /// Replace all schedules with a JSON snapshot
    Import {
        /// Snapshot file path
        file: PathBuf,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Create a full backup of the SQLite database
    Backup {
        /// Output file path for the backup
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    let db_path = resolve_db_path(cli.data_dir.as_deref());
    let store = Arc::new(SqliteScheduleStore::new(db_path)?);
    let scheduler = SrsScheduler::new(store.clone(), Arc::new(SystemClock), SchedulerConfig::from_env());

    match cli.command {
        Commands::Review {
            item_id,
            group,
            correct,
            incorrect,
            quality,
        } => {
            let quality = resolve_quality(correct, incorrect, quality)?;
            run_review(&scheduler, &item_id, &group, quality).await
        }
        Commands::Due { as_of } => run_due(&scheduler, as_of.as_deref()).await,
        Commands::Queue { group, json } => run_queue(&scheduler, group.as_deref(), json).await,
        Commands::Stats { group, json } => run_stats(&scheduler, &group, json).await,
        Commands::Show { item_id, json } => run_show(&scheduler, &item_id, json).await,
        Commands::List { group } => run_list(&scheduler, group.as_deref()).await,
        Commands::Preview { item_id } => run_preview(&scheduler, &item_id).await,
        Commands::Remind => run_remind(&scheduler).await,
        Commands::Reset { group, yes } => run_reset(&scheduler, &group, yes).await,
        Commands::Export { output } => run_export(&scheduler, &output).await,
        Commands::Import { file, yes } => run_import(&scheduler, &file, yes).await,
        Commands::Backup { output } => run_backup(&store, &output),
    }
}

/// Database path for `--data-dir`, or `None` for the platform default
fn resolve_db_path(data_dir: Option<&Path>) -> Option<PathBuf> {
    data_dir.map(|dir| dir.join(DB_FILE_NAME))
}

/// Quality from the mutually exclusive answer flags
fn resolve_quality(correct: bool, incorrect: bool, quality: Option<i32>) -> anyhow::Result<i32> {
    match (correct, incorrect, quality) {
        (true, false, None) => Ok(quality_from_correct(true)),
        (false, true, None) => Ok(quality_from_correct(false)),
        (false, false, Some(q)) => Ok(q),
        _ => anyhow::bail!("Specify exactly one of --correct, --incorrect or --quality"),
    }
}

fn parse_as_of(raw: Option<&str>) -> anyhow::Result<Option<DateTime<Utc>>> {
    raw.map(|s| {
        DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| anyhow::anyhow!("Invalid --as-of '{}': {}", s, e))
    })
    .transpose()
}

/// Record an answer
async fn run_review(
    scheduler: &SrsScheduler,
    item_id: &str,
    group: &str,
    quality: i32,
) -> anyhow::Result<()> {
    let schedule = scheduler
        .update_schedule_after_review(item_id, group, quality)
        .await?;
    let tz = scheduler.config().utc_offset;

    println!("{} {} (quality {})", "Recorded".green().bold(), item_id, quality);
    println!(
        "  {}: {}",
        "Next review".white().bold(),
        format_instant(schedule.next_review_due_at, &tz)
    );
    println!("  {}: {}", "Interval".white().bold(), format_interval(schedule.interval_seconds));
    println!("  {}: {:.2}", "Ease".white().bold(), schedule.ease_factor);
    println!("  {}: {}", "Mastery".white().bold(), level_colored(schedule.mastery_level()));
    Ok(())
}

async fn run_due(scheduler: &SrsScheduler, as_of: Option<&str>) -> anyhow::Result<()> {
    let as_of = parse_as_of(as_of)?.unwrap_or_else(|| scheduler.now());
    let due = scheduler.get_due_reviews(as_of).await?;

    if due.is_empty() {
        println!("{}", "Nothing due.".dimmed());
        return Ok(());
    }
    for item_id in due {
        println!("{}", item_id);
    }
    Ok(())
}

async fn run_queue(scheduler: &SrsScheduler, group: Option<&str>, json: bool) -> anyhow::Result<()> {
    let queue = scheduler.generate_daily_queue(group).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&queue)?);
        return Ok(());
    }

    let title = match group {
        Some(g) => format!("=== Review Queue: {} ===", g),
        None => "=== Review Queue ===".to_string(),
    };
    println!("{}", title.cyan().bold());
    println!();

    if queue.review_items.is_empty() {
        println!("{}", "No reviews due today.".dimmed());
    } else {
        for (i, item_id) in queue.review_items.iter().enumerate() {
            println!("  {:>3}. {}", i + 1, item_id);
        }
    }
    println!();
    println!("{}: {}", "Reviews".white().bold(), queue.review_items.len());
    println!("{}: {}", "New items to add".white().bold(), queue.new_items_target);
    Ok(())
}

async fn run_stats(scheduler: &SrsScheduler, group: &str, json: bool) -> anyhow::Result<()> {
    let stats = scheduler.get_review_stats(group).await?;

    if json {
        let mut value = serde_json::to_value(&stats)?;
        value["masteryScore"] = serde_json::json!(stats.mastery_score());
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let tz = scheduler.config().utc_offset;
    println!("{}", format!("=== Review Statistics: {} ===", group).cyan().bold());
    println!();
    println!("{}: {}", "Total Reviews".white().bold(), stats.total_reviews);
    println!("{}: {}", "Overdue".white().bold(), stats.overdue_count);
    println!("{}: {}", "Due Today".white().bold(), stats.due_today_count);
    println!("{}: {:.2}", "Average Ease".white().bold(), stats.average_ease_factor);
    println!("{}: {:.1}", "Mastery Score".white().bold(), stats.mastery_score());
    match stats.next_review_date {
        Some(next) => println!("{}: {}", "Next Review".white().bold(), format_instant(next, &tz)),
        None => println!("{}: {}", "Next Review".white().bold(), "-".dimmed()),
    }

    let total = stats.mastery_level_counts.total();
    println!();
    println!("{}", "=== Mastery Distribution ===".yellow().bold());
    if total == 0 {
        println!("{}", "No schedules found.".dimmed());
    } else {
        for level in MasteryLevel::ALL {
            print_distribution_bar(level, stats.mastery_level_counts.get(level), total);
        }
    }
    Ok(())
}

async fn run_show(scheduler: &SrsScheduler, item_id: &str, json: bool) -> anyhow::Result<()> {
    let Some(schedule) = scheduler.get_schedule(item_id).await? else {
        anyhow::bail!("No schedule for item '{}'", item_id);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
        return Ok(());
    }
    print_schedule(&schedule, &scheduler.config().utc_offset);
    Ok(())
}

async fn run_list(scheduler: &SrsScheduler, group: Option<&str>) -> anyhow::Result<()> {
    let schedules = scheduler.get_all_schedules().await?;
    let mut rows: Vec<&ReviewSchedule> = schedules
        .values()
        .filter(|s| group.is_none_or(|g| s.group_id == g))
        .collect();
    rows.sort_by(|a, b| {
        a.group_id
            .cmp(&b.group_id)
            .then_with(|| a.next_review_due_at.cmp(&b.next_review_due_at))
            .then_with(|| a.item_id.cmp(&b.item_id))
    });

    if rows.is_empty() {
        println!("{}", "No schedules found.".dimmed());
        return Ok(());
    }

    let tz = scheduler.config().utc_offset;
    let now = scheduler.now();
    println!(
        "{}",
        format!("{:<24} {:<12} {:<17} {:>6} {:>5}  {}", "ITEM", "GROUP", "DUE", "EASE", "STREAK", "LEVEL").bold()
    );
    for s in rows {
        let due = format_instant(s.next_review_due_at, &tz);
        let due = if s.is_overdue(now) { due.red() } else { due.normal() };
        println!(
            "{:<24} {:<12} {:<17} {:>6.2} {:>5}  {}",
            s.item_id,
            s.group_id,
            due,
            s.ease_factor,
            s.consecutive_correct,
            level_colored(s.mastery_level())
        );
    }
    Ok(())
}

async fn run_preview(scheduler: &SrsScheduler, item_id: &str) -> anyhow::Result<()> {
    let preview = scheduler.preview_review(item_id).await?;
    let tz = scheduler.config().utc_offset;

    println!("{}", format!("=== Preview: {} ===", item_id).cyan().bold());
    for (label, outcome) in [("Correct", &preview.correct), ("Incorrect", &preview.incorrect)] {
        println!();
        println!("{}", label.white().bold());
        println!("  Next review: {}", format_instant(outcome.next_review_due_at, &tz));
        println!("  Interval:    {}", format_interval(outcome.interval_seconds));
        println!("  Ease:        {:.2}", outcome.ease_factor);
        println!("  Mastery:     {}", level_colored(outcome.mastery_level()));
    }
    Ok(())
}

async fn run_remind(scheduler: &SrsScheduler) -> anyhow::Result<()> {
    let tz = scheduler.config().utc_offset;
    match scheduler.due_reminder().await? {
        Some(reminder) => {
            println!("{} {}", reminder.title.yellow().bold(), format!("[{}]", reminder.badge()).dimmed());
            println!("{}", reminder.body);
        }
        None => {
            println!("{}", "No reviews due.".green());
            if let Some(next) = next_reminder_at(
                scheduler.now(),
                &tz,
                quiz_srs_core::scheduler::DEFAULT_REMINDER_HOUR,
            ) {
                println!("{} {}", "Next check:".dimmed(), format_instant(next, &tz));
            }
        }
    }
    Ok(())
}

async fn run_reset(scheduler: &SrsScheduler, group: &str, yes: bool) -> anyhow::Result<()> {
    if !yes && !confirm(&format!("Delete all schedules of group '{}'?", group))? {
        println!("{}", "Aborted.".yellow());
        return Ok(());
    }

    let removed = scheduler.delete_schedules(group).await?;
    println!(
        "{}",
        format!("Deleted {} schedules from group '{}'", removed, group).green().bold()
    );
    Ok(())
}

async fn run_export(scheduler: &SrsScheduler, output: &Path) -> anyhow::Result<()> {
    let snapshot = scheduler.export_snapshot().await?;

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, snapshot.to_json()?)?;

    println!(
        "{}",
        format!("Exported {} schedules to {}", snapshot.len(), output.display()).green().bold()
    );
    Ok(())
}

async fn run_import(scheduler: &SrsScheduler, file: &Path, yes: bool) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(file)?;
    let snapshot = ScheduleSnapshot::from_json(&json)?;

    if !yes
        && !confirm(&format!(
            "Replace all schedules with {} from {}?",
            snapshot.len(),
            file.display()
        ))?
    {
        println!("{}", "Aborted.".yellow());
        return Ok(());
    }

    let imported = scheduler.import_snapshot(snapshot).await?;
    println!("{}", format!("Imported {} schedules", imported).green().bold());
    Ok(())
}

fn run_backup(store: &SqliteScheduleStore, output: &Path) -> anyhow::Result<()> {
    println!("{}", "=== Quiz SRS Backup ===".cyan().bold());
    println!();

    if output.exists() {
        anyhow::bail!("Backup target already exists: {}", output.display());
    }
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    println!("  {} {}", "From:".dimmed(), store.path().display());
    println!("  {}   {}", "To:".dimmed(), output.display());
    store.backup_to(output)?;

    let file_size = std::fs::metadata(output)?.len();
    println!();
    println!(
        "{}",
        format!("Backup complete: {}", format_size(file_size)).green().bold()
    );
    Ok(())
}

/// Ask a yes/no question on stdin, defaulting to no
fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{} {} [y/N] ", "WARNING:".red().bold(), question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

fn print_schedule(schedule: &ReviewSchedule, tz: &FixedOffset) {
    println!("{}", format!("=== {} ===", schedule.item_id).cyan().bold());
    println!("{}: {}", "Group".white().bold(), schedule.group_id);
    println!("{}: {}", "Next Review".white().bold(), format_instant(schedule.next_review_due_at, tz));
    println!("{}: {}", "Interval".white().bold(), format_interval(schedule.interval_seconds));
    println!("{}: {:.2}", "Ease".white().bold(), schedule.ease_factor);
    println!("{}: {}", "Streak".white().bold(), schedule.consecutive_correct);
    println!("{}: {}", "Reviews".white().bold(), schedule.review_count);
    println!("{}: {}", "Mastery".white().bold(), level_colored(schedule.mastery_level()));
    match schedule.last_reviewed_at {
        Some(last) => println!("{}: {}", "Last Reviewed".white().bold(), format_instant(last, tz)),
        None => println!("{}: {}", "Last Reviewed".white().bold(), "never".dimmed()),
    }
}

/// Print a horizontal bar for one mastery tier
fn print_distribution_bar(level: MasteryLevel, count: usize, total: usize) {
    let percentage = if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    let bar_width: usize = 30;
    let filled = ((percentage / 100.0) * bar_width as f64) as usize;
    let empty = bar_width.saturating_sub(filled);
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(empty));

    println!(
        "  {:15} [{:30}] {:>4} ({:>5.1}%)",
        level.label(),
        paint(bar, level),
        count,
        percentage
    );
}

fn paint(text: String, level: MasteryLevel) -> ColoredString {
    match level {
        MasteryLevel::Mastered => text.green(),
        MasteryLevel::Familiar => text.blue(),
        MasteryLevel::Reviewing => text.yellow(),
        MasteryLevel::Learning => text.red(),
    }
}

fn level_colored(level: MasteryLevel) -> ColoredString {
    paint(level.label().to_string(), level)
}

fn format_instant(instant: DateTime<Utc>, tz: &FixedOffset) -> String {
    instant.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string()
}

/// Human-readable interval: "1.0 days", "5.5 hours"
fn format_interval(seconds: f64) -> String {
    if seconds >= 86_400.0 {
        format!("{:.1} days", seconds / 86_400.0)
    } else if seconds >= 3_600.0 {
        format!("{:.1} hours", seconds / 3_600.0)
    } else {
        format!("{:.0} seconds", seconds)
    }
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} bytes", bytes)
    }
}
