//! Veil - content moderation gate for whispers and memorial tributes.
//!
//! This is the main binary:
//! - `veil serve` runs the HTTP submission API
//! - `veil classify` classifies text from the command line
//! - `veil resources` prints the crisis resource bundle

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args as ClapArgs, Parser, Subcommand};
use directories::ProjectDirs;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use veil_core::alerts::DEFAULT_DASHBOARD_URL;
use veil_core::moderation::{PatternTables, SubmissionType};
use veil_core::{crisis_resources, ContentModerator};
use veil_server::{
    AlertSender, AppState, HttpMailer, LogMailer, MailerConfig, Server, ServerConfig,
    DEFAULT_HOST, DEFAULT_PORT,
};
use veil_storage::Database;

/// Default sender address for operator alerts.
const DEFAULT_ALERT_FROM: &str = "alerts@vaelorinverse.com";

/// Veil - content moderation gate for whispers and memorial tributes
#[derive(Parser, Debug)]
#[command(name = "veil", version, about)]
struct Args {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP submission API
    Serve(ServeArgs),

    /// Classify text and print the verdict as JSON
    Classify {
        /// Submission type (whisper or tribute)
        #[arg(long = "type", short = 't', default_value = "whisper")]
        kind: SubmissionType,

        /// Custom pattern tables (JSON)
        #[arg(long, env = "VEIL_PATTERNS")]
        patterns: Option<PathBuf>,

        /// Text to classify
        text: String,
    },

    /// Print the crisis resource bundle as JSON
    Resources,
}

#[derive(ClapArgs, Debug)]
struct ServeArgs {
    /// Host to bind to
    #[arg(long, env = "VEIL_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port to bind to
    #[arg(long, env = "VEIL_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Database file (defaults to the platform data directory)
    #[arg(long, env = "VEIL_DB")]
    db: Option<PathBuf>,

    /// Custom pattern tables (JSON)
    #[arg(long, env = "VEIL_PATTERNS")]
    patterns: Option<PathBuf>,

    /// Include failure details in error responses (development only)
    #[arg(long, env = "VEIL_EXPOSE_ERRORS")]
    expose_errors: bool,

    /// Mail relay endpoint; alerts are only logged when unset
    #[arg(long, env = "MAIL_API_URL")]
    mail_api_url: Option<String>,

    /// Bearer token for the mail relay
    #[arg(long, env = "MAIL_API_KEY", hide_env_values = true)]
    mail_api_key: Option<String>,

    /// Sender address for alerts
    #[arg(long, env = "ALERT_FROM", default_value = DEFAULT_ALERT_FROM)]
    alert_from: String,

    /// Recipient for urgent alerts
    #[arg(long, env = "ADMIN_EMAIL")]
    admin_email: Option<String>,

    /// Recipient for review notices
    #[arg(long, env = "INFO_EMAIL")]
    info_email: Option<String>,

    /// Dashboard link included in alerts
    #[arg(long, env = "DASHBOARD_URL", default_value = DEFAULT_DASHBOARD_URL)]
    dashboard_url: String,
}

/// Get the logs directory path.
fn logs_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "vaelorinverse", "veil").map(|dirs| dirs.data_dir().join("logs"))
}

/// Initialize logging with file rotation.
///
/// Only `serve` writes log files; one-shot commands log to stderr so
/// their JSON output stays clean.
fn init_logging(args: &Args) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_level = if args.debug { "debug" } else { &args.log_level };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("veil={},warn", log_level)));

    if matches!(args.command, Command::Serve(_)) {
        if let Some(log_dir) = logs_dir() {
            if std::fs::create_dir_all(&log_dir).is_ok() {
                // Rotates daily, keeps the last five files
                let file_appender = RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .max_log_files(5)
                    .filename_prefix("veil")
                    .filename_suffix("log")
                    .build(&log_dir)
                    .ok();

                if let Some(appender) = file_appender {
                    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(std::io::stdout))
                        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                        .init();

                    tracing::info!("Logging to {:?}", log_dir);
                    return Some(guard);
                }
            }
        }

        tracing_subscriber::fmt().with_env_filter(env_filter).init();
        tracing::warn!("File logging unavailable, using console only");
        return None;
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    None
}

/// Build the moderator, from a pattern file when one is given.
fn load_moderator(patterns: Option<&Path>) -> anyhow::Result<ContentModerator> {
    match patterns {
        Some(path) => {
            let tables = PatternTables::from_file(path)?;
            let moderator = ContentModerator::from_tables(&tables)?;
            tracing::info!("Loaded pattern tables from {:?}", path);
            Ok(moderator)
        }
        None => Ok(ContentModerator::shared().clone()),
    }
}

/// Pick the alert sender from the mail settings.
fn build_mailer(args: &ServeArgs) -> Arc<dyn AlertSender> {
    match &args.mail_api_url {
        Some(endpoint) => {
            if args.admin_email.is_none() {
                tracing::warn!("ADMIN_EMAIL not set, urgent alerts cannot be delivered");
            }
            Arc::new(HttpMailer::new(MailerConfig {
                endpoint: endpoint.clone(),
                api_key: args.mail_api_key.clone(),
                from: args.alert_from.clone(),
                admin_email: args.admin_email.clone(),
                info_email: args.info_email.clone(),
            }))
        }
        None => {
            tracing::warn!("No mail relay configured, alerts will only be logged");
            Arc::new(LogMailer)
        }
    }
}

/// Assemble server config and state from the serve arguments.
fn build_server(args: &ServeArgs) -> anyhow::Result<(ServerConfig, AppState)> {
    let db_path = match &args.db {
        Some(path) => path.clone(),
        None => Database::default_db_path()?,
    };
    let db = Database::with_path(&db_path)?;
    tracing::info!("Database opened at {:?}", db_path);

    let state = AppState::new(db)
        .with_moderator(load_moderator(args.patterns.as_deref())?)
        .with_mailer(build_mailer(args))
        .with_dashboard_url(args.dashboard_url.clone())
        .with_error_details(args.expose_errors);

    if args.expose_errors {
        tracing::warn!("Error details are exposed in responses; do not use in production");
    }

    // The database is already open and owned by the state
    let config = ServerConfig::default()
        .with_host(args.host.clone())
        .with_port(args.port);

    Ok((config, state))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Keep guard alive for the duration of the program
    let _log_guard = init_logging(&args);

    match &args.command {
        Command::Serve(serve) => {
            tracing::info!("Starting Veil...");
            let (config, state) = build_server(serve)?;
            let server = Server::with_state(config, state)?;
            server.run().await?;
            tracing::info!("Veil shutting down");
        }
        Command::Classify {
            kind,
            patterns,
            text,
        } => {
            let moderator = load_moderator(patterns.as_deref())?;
            let verdict = moderator.classify(text, *kind);
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
        Command::Resources => {
            println!("{}", serde_json::to_string_pretty(&crisis_resources())?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_args() {
        let args =
            Args::try_parse_from(["veil", "classify", "--type", "tribute", "rot in hell"]).unwrap();
        match args.command {
            Command::Classify { kind, text, .. } => {
                assert_eq!(kind, SubmissionType::Tribute);
                assert_eq!(text, "rot in hell");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_classify_defaults_to_whisper() {
        let args = Args::try_parse_from(["veil", "classify", "hello"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Classify {
                kind: SubmissionType::Whisper,
                ..
            }
        ));
    }

    #[test]
    fn test_serve_args() {
        let args = Args::try_parse_from([
            "veil",
            "--debug",
            "serve",
            "--port",
            "9100",
            "--expose-errors",
        ])
        .unwrap();
        assert!(args.debug);
        let Command::Serve(serve) = args.command else {
            panic!("expected serve");
        };
        assert_eq!(serve.port, 9100);
        assert!(serve.expose_errors);
    }

    #[test]
    fn test_build_server_with_custom_patterns() {
        let dir = tempfile::tempdir().unwrap();
        let patterns = dir.path().join("patterns.json");
        let tables = PatternTables {
            crisis: vec![r"\bstorm\b".to_string()],
            ..PatternTables::default()
        };
        std::fs::write(&patterns, serde_json::to_string(&tables).unwrap()).unwrap();

        let db = dir.path().join("veil.db");
        let db_arg = db.to_string_lossy().into_owned();
        let patterns_arg = patterns.to_string_lossy().into_owned();
        let args = Args::try_parse_from([
            "veil",
            "serve",
            "--db",
            db_arg.as_str(),
            "--patterns",
            patterns_arg.as_str(),
            "--port",
            "9200",
        ])
        .unwrap();
        let Command::Serve(serve) = args.command else {
            panic!("expected serve");
        };

        let (config, state) = build_server(&serve).unwrap();
        assert_eq!(config.port, 9200);
        assert_eq!(config.host, DEFAULT_HOST);
        assert!(config.db_path.is_none());
        assert!(db.exists());
        assert!(state
            .moderator
            .classify("a storm is coming", SubmissionType::Whisper)
            .is_urgent());
    }

    #[test]
    fn test_invalid_pattern_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let patterns = dir.path().join("bad.json");
        std::fs::write(&patterns, r#"{"crisis": ["(unclosed"]}"#).unwrap();

        assert!(load_moderator(Some(patterns.as_path())).is_err());
    }
}
