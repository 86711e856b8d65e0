use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Parser, Subcommand};
use serde_json::json;
use tracing::warn;

use td_core::config::{load_config, TdConfig};
use td_core::period::{parse_date, IntervalMode};
use td_core::sessions::{self, FocusSession};
use td_core::store::{StoreError, TaskStore};

mod editor;
mod logging;
mod notify;
mod tui;

use notify::{ConsoleNotifier, DesktopNotifier, Notifier};
use tui::timer_view::TimerOutcome;

#[derive(Parser)]
#[command(
    name = "td",
    version,
    about = "To-Do ToDay: checkbox task lists kept in plain markdown files"
)]
struct Cli {
    /// Vault directory (overrides TD_VAULT_LOC and the config file)
    #[arg(long, global = true)]
    vault: Option<PathBuf>,
    /// File granularity: daily, weekly or monthly
    #[arg(long, global = true)]
    mode: Option<IntervalMode>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive task list (default)
    List {
        #[arg(long, default_value = "today")]
        date: String,
    },
    /// Append a task to the period's file
    Add {
        text: String,
        /// today, tomorrow, yesterday or YYYY-MM-DD
        #[arg(long, default_value = "today")]
        date: String,
        #[arg(long)]
        json: bool,
    },
    /// Print the period's tasks
    Show {
        #[arg(long, default_value = "today")]
        date: String,
        #[arg(long)]
        json: bool,
    },
    /// Mark the first task containing TEXT as done
    Check {
        text: String,
        #[arg(long, default_value = "today")]
        date: String,
    },
    /// Mark the first task containing TEXT as not done
    Uncheck {
        text: String,
        #[arg(long, default_value = "today")]
        date: String,
    },
    /// Copy unchecked tasks from the previous period (or --from) into this one
    Carry {
        #[arg(long)]
        from: Option<String>,
        #[arg(long, default_value = "today")]
        date: String,
    },
    /// Open the period's file in $EDITOR
    Edit {
        #[arg(long, default_value = "today")]
        date: String,
    },
    /// Print the period file path
    Path {
        #[arg(long, default_value = "today")]
        date: String,
    },
    /// Focus timer
    Pomo {
        /// Session length (defaults to focus_minutes from config)
        #[arg(long)]
        minutes: Option<u64>,
        #[arg(long, default_value = sessions::DEFAULT_CATEGORY)]
        category: String,
        /// Print the completion message instead of sending a desktop notification
        #[arg(long)]
        silent: bool,
        /// List recorded sessions instead of starting one
        #[arg(long)]
        history: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if matches!(cli.command, Some(Command::Version)) {
        println!("td {}", td_core::version());
        return Ok(());
    }

    let env: HashMap<String, String> = std::env::vars().collect();
    let mut config = load_config(&env).context("load configuration")?;
    if let Some(vault) = cli.vault {
        config.vault_root = vault;
    }
    if let Some(mode) = cli.mode {
        config.interval_mode = mode;
    }

    let store = TaskStore::from_config(&config);
    store.ensure_vault().with_context(|| {
        format!(
            "cannot create vault directory {}",
            config.vault_root.display()
        )
    })?;
    logging::init(&config.vault_root);

    let today = Local::now().date_naive();
    match cli.command {
        None => open_list(&config, &store, today, &env),
        Some(Command::List { date }) => open_list(&config, &store, resolve(&date, today)?, &env),
        Some(Command::Add { text, date, json }) => {
            add(&store, resolve(&date, today)?, &text, json)
        }
        Some(Command::Show { date, json }) => show(&store, resolve(&date, today)?, json),
        Some(Command::Check { text, date }) => {
            set_status(&store, resolve(&date, today)?, &text, true)
        }
        Some(Command::Uncheck { text, date }) => {
            set_status(&store, resolve(&date, today)?, &text, false)
        }
        Some(Command::Carry { from, date }) => {
            let target = resolve(&date, today)?;
            let source = match from {
                Some(from) => resolve(&from, today)?,
                None => store.period().previous(target),
            };
            let copied = store.copy_unchecked_from(source, target)?;
            println!("Copied {copied} unchecked task(s) from {source} to {target}");
            Ok(())
        }
        Some(Command::Edit { date }) => {
            let path = store.prepare_for_edit(resolve(&date, today)?)?;
            editor::open(&path, 1, &env)
        }
        Some(Command::Path { date }) => {
            println!("{}", store.file_path(resolve(&date, today)?).display());
            Ok(())
        }
        Some(Command::Pomo {
            minutes,
            category,
            silent,
            history,
            json,
        }) => {
            if history {
                return pomo_history(&config, json);
            }
            pomo(&config, minutes.unwrap_or(config.focus_minutes), &category, silent)
        }
        Some(Command::Version) => Ok(()),
    }
}

fn resolve(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    Ok(parse_date(input, today)?)
}

fn open_list(
    config: &TdConfig,
    store: &TaskStore,
    date: NaiveDate,
    env: &HashMap<String, String>,
) -> Result<()> {
    if config.copy_previous_on_open {
        match store.seed_from_previous(date) {
            Ok(0) => {}
            Ok(copied) => tracing::info!(copied, %date, "carried tasks from previous period"),
            Err(err) => warn!(error = %err, "could not carry tasks from previous period"),
        }
    }
    tui::list_view::run(store, date, env)
}

fn add(store: &TaskStore, date: NaiveDate, text: &str, json: bool) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
        bail!("task text is empty");
    }
    let exists = store.contains_task(date, text)?;
    let path = if exists {
        store.file_path(date)
    } else {
        store.add_task(date, text)?
    };
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "ok": true,
                "added": !exists,
                "path": path.to_string_lossy(),
            }))?
        );
    } else if exists {
        println!("This item already exists. Skipping");
    } else {
        println!("Added to {}", path.display());
    }
    Ok(())
}

fn show(store: &TaskStore, date: NaiveDate, json: bool) -> Result<()> {
    let tasks = store.load_tasks(date)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "date": date.to_string(),
                "path": store.file_path(date).to_string_lossy(),
                "tasks": tasks,
            }))?
        );
        return Ok(());
    }
    print!("{}", store.period().header(date));
    for task in &tasks {
        let mark = if task.checked { "x" } else { " " };
        println!("[{mark}] {}", task.text);
    }
    Ok(())
}

fn set_status(store: &TaskStore, date: NaiveDate, text: &str, checked: bool) -> Result<()> {
    match store.set_task_status(date, text, checked) {
        Ok(()) => Ok(()),
        Err(StoreError::NotFound(text)) => bail!("no task matching '{text}' on {date}"),
        Err(err) => Err(err.into()),
    }
}

fn pomo(config: &TdConfig, minutes: u64, category: &str, silent: bool) -> Result<()> {
    let started = Local::now();
    let outcome = tui::timer_view::run(focus_duration(minutes), category)?;
    if outcome == TimerOutcome::Quit {
        return Ok(());
    }

    let notifier: Box<dyn Notifier> = if silent {
        Box::new(ConsoleNotifier)
    } else {
        Box::new(DesktopNotifier)
    };
    notify::deliver(
        notifier.as_ref(),
        &format!("Focus session complete: {category} ({minutes} min)"),
    );

    sessions::record_session(
        &config.vault_root,
        FocusSession {
            start: started,
            duration: minutes,
            category: category.to_string(),
        },
    )?;
    Ok(())
}

/// `--minutes` is unbounded, so the conversion saturates instead of overflowing.
fn focus_duration(minutes: u64) -> Duration {
    Duration::from_secs(minutes.saturating_mul(60))
}

fn pomo_history(config: &TdConfig, json: bool) -> Result<()> {
    let sessions = sessions::load_sessions(&config.vault_root)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }
    for session in &sessions {
        println!(
            "{} {:>4} min  {}",
            session.start.format("%Y-%m-%d %H:%M"),
            session.duration,
            session.category
        );
    }
    println!("total: {} min", sessions::total_minutes(&sessions, None));
    Ok(())
}
