use log::LevelFilter;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::{Path, PathBuf};

const ROLL_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const ENCODER_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";

/// Initializes the logging system from the default file `log4rs.yaml` in the working directory.
/// Prefer `configure_logging` for programmatic control.
///
/// # Errors
/// Returns an error if the file cannot be read or a logger is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    init_path(Path::new("log4rs.yaml"))
}

/// Initializes the logging system from a specific config file path.
///
/// # Errors
/// Returns an error if the file cannot be read or a logger is already installed.
pub fn init_path(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    log4rs::init_file(path, log4rs::config::Deserializers::default())?;
    Ok(())
}

fn parse_level(level: Option<&str>) -> LevelFilter {
    match level.unwrap_or("info").to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn rolling_appender(
    base: &Path,
    stem: &str,
    keep: u32,
) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
    let roller = FixedWindowRoller::builder()
        .build(&format!("{}", base.join(format!("{stem}.{{}}.log")).display()), keep)?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE_BYTES)), Box::new(roller));
    let appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(ENCODER_PATTERN)))
        .build(base.join(format!("{stem}.log")), Box::new(policy))?;
    Ok(appender)
}

/// Configure logging globally for the process.
/// - dir: base directory for logs; if None, current directory.
/// - level: off|error|warn|info|debug|trace
/// - retention: number of rolled files to keep (default 7)
///
/// # Errors
/// Returns an error if an appender cannot be created or a logger is already installed.
pub fn configure_logging(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    configure_logging_with_trace(dir, level, retention, false)
}

/// Configure logging globally with optional routing of per-clause evaluation traces.
/// If `enable_trace` is true, lines emitted through `eval_trace!` (target `docmatch::trace`)
/// are persisted to a `trace.log` rolling file in the base directory.
///
/// # Errors
/// Returns an error if an appender cannot be created or a logger is already installed.
pub fn configure_logging_with_trace(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<usize>,
    enable_trace: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let base = match dir {
        Some(d) => PathBuf::from(d),
        None => std::env::current_dir()?,
    };
    std::fs::create_dir_all(&base)?;
    let keep = u32::try_from(retention.unwrap_or(7)).unwrap_or(u32::MAX);
    let lvl = parse_level(level);

    let mut builder = Config::builder()
        .appender(Appender::builder().build("app", Box::new(rolling_appender(&base, "app", keep)?)))
        .appender(
            Appender::builder()
                .build("metrics", Box::new(rolling_appender(&base, "metrics", keep)?)),
        )
        .logger(
            Logger::builder().appender("metrics").additive(false).build("docmatch::metrics", lvl),
        );

    if enable_trace {
        builder = builder
            .appender(
                Appender::builder().build("trace", Box::new(rolling_appender(&base, "trace", keep)?)),
            )
            .logger(
                Logger::builder()
                    .appender("trace")
                    .additive(false)
                    .build(crate::utils::devlog::TRACE_TARGET, LevelFilter::Trace),
            );
    } else {
        builder = builder.logger(
            Logger::builder().additive(false).build(crate::utils::devlog::TRACE_TARGET, LevelFilter::Off),
        );
    }

    let config = builder.build(Root::builder().appender("app").build(lvl))?;
    log4rs::init_config(config)?;
    Ok(())
}

/// Configure logging from environment variables if present:
/// - DOCMATCH_LOG_DIR
/// - DOCMATCH_LOG_LEVEL
/// - DOCMATCH_LOG_RETENTION
/// - DOCMATCH_TRACE (1|true|yes)
///
/// # Errors
/// See [`configure_logging_with_trace`].
pub fn configure_from_env() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::var("DOCMATCH_LOG_DIR").ok().map(PathBuf::from);
    let level = std::env::var("DOCMATCH_LOG_LEVEL").ok();
    let retention =
        std::env::var("DOCMATCH_LOG_RETENTION").ok().and_then(|s| s.parse::<usize>().ok());
    let trace_enabled = std::env::var("DOCMATCH_TRACE")
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    configure_logging_with_trace(dir.as_deref(), level.as_deref(), retention, trace_enabled)
}
