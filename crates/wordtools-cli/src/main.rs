//! wordtools CLI: word counts and a daily writing history for markdown vaults.
//!
//! Commands: count, record, open, rename, today, history, vault, watch,
//! config, completions

mod watch;

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use wordtools_core::{
    display_total, normalize_and_count, CountingService, DayKey, HistoryStore, RecordOutcome,
    WordToolsConfig,
};
use wordtools_vault::{read_document, CountCache, HistoryFile, Vault};

#[derive(Parser)]
#[command(name = "wordtools")]
#[command(version)]
#[command(about = "Word counts and a daily writing history for markdown vaults")]
struct Cli {
    /// Vault root directory
    #[arg(long, global = true, default_value = ".")]
    vault: PathBuf,

    /// Config file (defaults to $WORDTOOLS_CONFIG, then <vault>/.wordtools/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// History file (defaults to <vault>/.wordtools/history.json)
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    /// Day to record under, as YYYY/M/D (defaults to today, UTC)
    #[arg(long, global = true)]
    day: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Count words and characters in a file (`-` reads stdin)
    Count {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Count a document and record it in today's history
    Record {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Start tracking a document today without changing its count
    Open { file: PathBuf },
    /// Carry today's tracker over to a renamed document
    Rename { old: PathBuf, new: PathBuf },
    /// Words written today
    Today {
        #[arg(long)]
        json: bool,
    },
    /// Daily totals, oldest first
    History {
        #[arg(long)]
        json: bool,
    },
    /// Word count over every markdown file in the vault
    Vault {
        /// Vault root (defaults to --vault)
        root: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Watch the vault and record changes as they happen
    Watch {
        /// Vault root (defaults to --vault)
        root: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config,
    /// Generate shell completions
    Completions { shell: Shell },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        vault,
        config,
        history,
        day,
        command,
        ..
    } = cli;

    if let Commands::Count { file, json } = &command {
        return cmd_count(file, config.as_deref(), *json);
    }
    if let Commands::Completions { shell } = &command {
        clap_complete::generate(*shell, &mut Cli::command(), "wordtools", &mut io::stdout());
        return Ok(());
    }

    let root = match &command {
        Commands::Vault { root: Some(root), .. } | Commands::Watch { root: Some(root) } => {
            root.clone()
        }
        _ => vault,
    };
    let session = Session::open(root, config, history, day)?;

    match command {
        Commands::Record { file, json } => cmd_record(&session, &file, json),
        Commands::Open { file } => cmd_open(&session, &file),
        Commands::Rename { old, new } => cmd_rename(&session, &old, &new),
        Commands::Today { json } => cmd_today(&session, json),
        Commands::History { json } => cmd_history(&session, json),
        Commands::Vault { json, .. } => cmd_vault(&session, json),
        Commands::Watch { .. } => watch::run(session),
        Commands::Config => {
            print!("{}", session.config().to_toml_string()?);
            Ok(())
        }
        Commands::Count { .. } | Commands::Completions { .. } => Ok(()),
    }
}

/// Resolved vault, config, and history location for one invocation.
pub(crate) struct Session {
    vault: Vault,
    config: WordToolsConfig,
    history_file: HistoryFile,
    day: Option<DayKey>,
}

impl Session {
    fn open(
        root: PathBuf,
        config: Option<PathBuf>,
        history: Option<PathBuf>,
        day: Option<String>,
    ) -> Result<Self> {
        let vault = Vault::open(&root)
            .with_context(|| format!("cannot open vault {}", root.display()))?;

        let config_path = config
            .or_else(WordToolsConfig::env_path)
            .unwrap_or_else(|| vault.root().join(".wordtools").join("config.toml"));
        let config = WordToolsConfig::load(&config_path).context("failed to load config")?;

        let history_file =
            history.map_or_else(|| HistoryFile::in_vault(vault.root()), HistoryFile::new);
        let day = day
            .map(|d| DayKey::parse(&d))
            .transpose()
            .context("invalid --day")?;

        tracing::debug!(
            vault = %vault.root().display(),
            config = %config_path.display(),
            history = %history_file.path().display(),
            "session opened"
        );
        Ok(Self {
            vault,
            config,
            history_file,
            day,
        })
    }

    pub(crate) fn vault(&self) -> &Vault {
        &self.vault
    }

    pub(crate) fn config(&self) -> &WordToolsConfig {
        &self.config
    }

    pub(crate) fn history_file(&self) -> &HistoryFile {
        &self.history_file
    }

    /// The pinned `--day`, or the current UTC day.
    pub(crate) fn day(&self) -> DayKey {
        self.day.clone().unwrap_or_else(DayKey::today)
    }

    pub(crate) fn load_service(&self) -> Result<CountingService> {
        let history = self
            .history_file
            .load()
            .context("failed to load history")?;
        Ok(CountingService::from_config(
            &self.config,
            HistoryStore::from_history(history),
        ))
    }

    pub(crate) fn save(&self, service: &CountingService) -> Result<()> {
        self.history_file
            .save(service.store().history())
            .context("failed to save history")
    }

    /// History key for a document: vault-relative when inside the vault.
    pub(crate) fn document_key(&self, path: &Path) -> String {
        let resolved = resolve(path);
        if resolved.starts_with(self.vault.root()) {
            self.vault.relative_key(&resolved)
        } else {
            path.to_string_lossy().into_owned()
        }
    }

    /// `N/goal words today`, or `N words today` with the goal hidden.
    pub(crate) fn today_line(&self, service: &CountingService) -> String {
        let total = service.display_daily_total(&self.day());
        if self.config.show_goal {
            format!("{total}/{} words today", self.config.daily_word_goal)
        } else {
            format!("{total} words today")
        }
    }
}

/// Canonical form of `path`, tolerating a missing final component.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(full) = path.canonicalize() {
        return full;
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

fn cmd_count(file: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let text = if file == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        read_document(file)?
    };

    let config = match config.map(Path::to_path_buf).or_else(WordToolsConfig::env_path) {
        Some(path) => WordToolsConfig::load(&path).context("failed to load config")?,
        None => WordToolsConfig::default(),
    };
    let counts = normalize_and_count(&text, &config.count_settings);

    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else {
        println!("{} words, {} characters", counts.words, counts.chars);
    }
    Ok(())
}

#[derive(Serialize)]
struct RecordOutput<'a> {
    path: &'a str,
    day: &'a DayKey,
    words: u64,
    chars: u64,
    daily_total: i64,
    frozen: bool,
}

fn cmd_record(session: &Session, file: &Path, json: bool) -> Result<()> {
    let raw = read_document(file)?;
    let key = session.document_key(file);
    let day = session.day();

    let mut service = session.load_service()?;
    let update = service.document_changed(&day, &key, &raw);
    session.save(&service)?;

    if json {
        let out = RecordOutput {
            path: &key,
            day: &day,
            words: update.counts.words,
            chars: update.counts.chars,
            daily_total: update.daily_total,
            frozen: update.outcome == RecordOutcome::Frozen,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{key}: {} words", update.counts.words);
        println!("{}", session.today_line(&service));
    }
    Ok(())
}

fn cmd_open(session: &Session, file: &Path) -> Result<()> {
    let raw = read_document(file)?;
    let key = session.document_key(file);

    let mut service = session.load_service()?;
    let counts = service.document_opened(&session.day(), &key, &raw);
    session.save(&service)?;

    println!("{key}: {} words", counts.words);
    Ok(())
}

fn cmd_rename(session: &Session, old: &Path, new: &Path) -> Result<()> {
    let from = session.document_key(old);
    let to = session.document_key(new);

    let mut service = session.load_service()?;
    if !service.document_renamed(&session.day(), &from, &to) {
        bail!("{from} is not tracked on {}", session.day());
    }
    session.save(&service)?;

    println!("Renamed {from} -> {to}");
    Ok(())
}

#[derive(Serialize)]
struct TodayOutput {
    day: DayKey,
    total: i64,
    display: u64,
    goal: u64,
}

fn cmd_today(session: &Session, json: bool) -> Result<()> {
    let service = session.load_service()?;
    let day = session.day();

    if json {
        let total = service.daily_total(&day);
        let out = TodayOutput {
            day,
            total,
            display: display_total(total),
            goal: session.config().daily_word_goal,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", session.today_line(&service));
    }
    Ok(())
}

#[derive(Serialize)]
struct HistoryRow<'a> {
    day: &'a DayKey,
    total: i64,
    pruned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    goal: Option<u64>,
}

fn cmd_history(session: &Session, json: bool) -> Result<()> {
    let service = session.load_service()?;
    let store = service.store();
    let rows: Vec<HistoryRow<'_>> = store
        .days_chronological()
        .into_iter()
        .map(|(day, record)| HistoryRow {
            day,
            total: store.historical_total(day),
            pruned: record.is_pruned(),
            goal: record.goal,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("No history yet.");
        return Ok(());
    }
    for row in &rows {
        match row.goal {
            Some(goal) => println!("{:<12} {:>6} / {goal}", row.day, row.total),
            None => println!("{:<12} {:>6}", row.day, row.total),
        }
    }
    Ok(())
}

fn cmd_vault(session: &Session, json: bool) -> Result<()> {
    let mut cache = CountCache::new(session.config().count_settings);
    let totals = session
        .vault()
        .scan(&mut cache)
        .context("failed to scan vault")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
    } else {
        println!(
            "{} words, {} characters in {} files",
            totals.counts.words, totals.counts.chars, totals.files
        );
    }
    Ok(())
}
