//! Binary entry point for feedbuckets.
//!
//! This binary provides the CLI interface for the bucketed unread view.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use feedbuckets::buckets::{BoundaryCalculator, PartitionScheme};
use feedbuckets::cli::{self, OutputFormat};
use feedbuckets::config::{CONFIG_PATH_ENV, FeedBucketsConfig};
use feedbuckets::observability::{self, RequestContext};
use feedbuckets::storage::{NewEntry, SqliteEntryStore};
use feedbuckets::timezone::{Clock, SystemClock, resolve_timezone};
use feedbuckets::{BucketService, Error, FeedId, UserId};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Feedbuckets - time-window partitioning for a feed reader's unread entries.
#[derive(Parser)]
#[command(name = "feedbuckets")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the entry database (overrides configuration).
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Print bucket boundaries for a timezone and instant.
    Boundaries {
        /// IANA timezone name.
        #[arg(short, long, default_value = "UTC")]
        timezone: String,

        /// Reference instant (RFC 3339, default: now).
        #[arg(long)]
        at: Option<String>,

        /// Partition scheme (default: configured scheme).
        #[arg(short, long)]
        scheme: Option<String>,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show a user's unread entries by bucket.
    View {
        /// User ID.
        #[arg(short, long)]
        user: i64,

        /// Bucket to display (`all` for every bucket, default: today).
        #[arg(short, long)]
        bucket: Option<String>,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Mark a bucket as read.
    MarkRead {
        /// User ID.
        #[arg(short, long)]
        user: i64,

        /// Bucket to mark (`all` for every globally visible feed).
        #[arg(short, long)]
        bucket: String,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Manage users.
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage feeds.
    Feed {
        #[command(subcommand)]
        action: FeedAction,
    },

    /// Manage entries.
    Entry {
        #[command(subcommand)]
        action: EntryAction,
    },
}

impl Commands {
    /// Name recorded on the request context.
    const fn name(&self) -> &'static str {
        match self {
            Self::Boundaries { .. } => "boundaries",
            Self::View { .. } => "view",
            Self::MarkRead { .. } => "mark-read",
            Self::User { .. } => "user",
            Self::Feed { .. } => "feed",
            Self::Entry { .. } => "entry",
        }
    }
}

/// User actions.
#[derive(Subcommand)]
enum UserAction {
    /// Create a user.
    Add {
        /// IANA timezone name.
        #[arg(short, long, default_value = "UTC")]
        timezone: String,

        /// Sort column: id, published_at, created_at or title.
        #[arg(long, default_value = "published_at")]
        order: String,

        /// Sort direction: asc or desc.
        #[arg(long, default_value = "asc")]
        direction: String,
    },
}

/// Feed actions.
#[derive(Subcommand)]
enum FeedAction {
    /// Create a feed.
    Add {
        /// Owning user ID.
        #[arg(short, long)]
        user: i64,

        /// Feed title.
        #[arg(short, long)]
        title: String,

        /// Exclude the feed from bucket counts and mark-as-read.
        #[arg(long)]
        hide_globally: bool,
    },
}

/// Entry actions.
#[derive(Subcommand)]
enum EntryAction {
    /// Insert an entry.
    Add {
        /// Owning user ID.
        #[arg(short, long)]
        user: i64,

        /// Feed ID.
        #[arg(long)]
        feed: i64,

        /// Entry title.
        #[arg(short, long)]
        title: String,

        /// Article URL.
        #[arg(long, default_value = "")]
        url: String,

        /// Publication time (RFC 3339).
        #[arg(short, long)]
        published: String,
    },
}

fn main() -> ExitCode {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), cli.database.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_config(Some(&config.logging), cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let _request = observability::activate(RequestContext::for_command(cli.command.name()));

    match run_command(cli.command, &config) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command and returns its output.
fn run_command(
    command: Commands,
    config: &FeedBucketsConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    match command {
        Commands::Boundaries {
            timezone,
            at,
            scheme,
            format,
        } => cmd_boundaries(config, &timezone, at.as_deref(), scheme.as_deref(), format),

        Commands::View {
            user,
            bucket,
            format,
        } => {
            let service = bucket_service(config)?;
            let view = service.bucketed_view(UserId::new(user), bucket.as_deref())?;
            Ok(cli::render_view(&view, format)?)
        },

        Commands::MarkRead {
            user,
            bucket,
            format,
        } => {
            let service = bucket_service(config)?;
            let outcome = service.mark_bucket_read(UserId::new(user), &bucket)?;
            Ok(cli::render_mark_read(&outcome, format)?)
        },

        Commands::User {
            action:
                UserAction::Add {
                    timezone,
                    order,
                    direction,
                },
        } => {
            let order = cli::parse_sort_column(&order)?;
            let direction = cli::parse_direction(&direction)?;
            let store = open_store(config)?;
            let user = store.create_user(&timezone, order, direction)?;
            Ok(format!(
                "Created user {} (timezone {}, order {} {})\n",
                user.id, user.timezone, user.entry_order, user.entry_direction
            ))
        },

        Commands::Feed {
            action:
                FeedAction::Add {
                    user,
                    title,
                    hide_globally,
                },
        } => {
            let store = open_store(config)?;
            let feed = store.create_feed(UserId::new(user), &title, hide_globally)?;
            Ok(format!("Created feed {feed} for user {user}\n"))
        },

        Commands::Entry {
            action:
                EntryAction::Add {
                    user,
                    feed,
                    title,
                    url,
                    published,
                },
        } => {
            let published = cli::parse_timestamp(&published)?;
            let store = open_store(config)?;
            let entry = NewEntry::new(UserId::new(user), FeedId::new(feed), title, published)
                .with_url(url);
            let id = store.insert_entry(&entry)?;
            Ok(format!("Created entry {id}\n"))
        },
    }
}

/// Prints the bucket set without touching the database.
fn cmd_boundaries(
    config: &FeedBucketsConfig,
    timezone: &str,
    at: Option<&str>,
    scheme: Option<&str>,
    format: OutputFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let scheme = match scheme {
        Some(raw) => PartitionScheme::parse(raw)
            .ok_or_else(|| Error::InvalidInput(format!("unknown partition scheme '{raw}'")))?,
        None => config.scheme,
    };
    let tz = resolve_timezone(timezone);
    let reference = match at {
        Some(raw) => cli::parse_timestamp(raw)?.with_timezone(&tz),
        None => SystemClock.now(tz),
    };

    let set = BoundaryCalculator::compute(&reference, scheme);
    Ok(cli::render_boundaries(&set, tz, format)?)
}

fn open_store(config: &FeedBucketsConfig) -> Result<Arc<SqliteEntryStore>, Error> {
    SqliteEntryStore::new(&config.database_path).map(Arc::new)
}

fn bucket_service(config: &FeedBucketsConfig) -> Result<BucketService, Error> {
    let store = open_store(config)?;
    Ok(BucketService::new(
        store.clone(),
        store,
        Arc::new(SystemClock),
        config.scheme,
    ))
}

/// Loads configuration.
fn load_config(
    path: Option<&str>,
    database: Option<&Path>,
) -> Result<FeedBucketsConfig, Box<dyn std::error::Error>> {
    // Explicit flag, then environment, then default locations
    let config = if let Some(config_path) = path {
        FeedBucketsConfig::load_from_file(Path::new(config_path))?
    } else if let Some(config_path) = std::env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|p| !p.trim().is_empty())
    {
        FeedBucketsConfig::load_from_file(Path::new(&config_path))?
    } else {
        FeedBucketsConfig::load_default()?
    };

    let config = config.apply_env_overrides()?;
    Ok(match database {
        Some(path) => config.with_database_path(path),
        None => config,
    })
}
