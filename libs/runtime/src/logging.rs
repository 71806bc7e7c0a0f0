use crate::config::{LoggingConfig, Section};
use parking_lot::Mutex;
use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt,
    layer::{Filter, SubscriberExt},
    util::SubscriberInitExt,
    Layer, Registry,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

// -------- level helpers --------
fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// Returns true if target == subsystem or target starts with "subsystem::"
fn matches_prefix(target: &str, subsystem: &str) -> bool {
    target
        .strip_prefix(subsystem)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

// -------- rotating writer for files --------
#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

/// Writer that may have no destination; writes are then dropped.
struct MaybeWriter(Option<RotWriter>);

impl Write for MaybeWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(w) => w.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

/// Route log records to different files by target prefix,
/// falling back to the "default" file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<RotWriter>,
    by_prefix: Vec<(String, RotWriter)>,
}

impl FileRouter {
    fn resolve_for(&self, target: &str) -> Option<RotWriter> {
        self.by_prefix
            .iter()
            .find(|(prefix, _)| matches_prefix(target, prefix))
            .map(|(_, w)| w.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = MaybeWriter;

    fn make_writer(&'a self) -> Self::Writer {
        MaybeWriter(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        MaybeWriter(self.resolve_for(meta.target()))
    }
}

// -------- path resolution helpers --------

/// Resolve a log file path against `base_dir` (home_dir).
/// Absolute paths are kept as-is; relative paths are joined with `base_dir`.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn file_limit(section: &Section) -> FileLimit {
    match (section.max_age_days, section.max_backups) {
        (Some(days), _) => FileLimit::Age(chrono::Duration::days(i64::from(days))),
        (None, Some(n)) => FileLimit::MaxFiles(n),
        (None, None) => FileLimit::MaxFiles(3),
    }
}

/// Create a rotating writer for a section, ensuring the parent directory exists.
fn create_rotating_writer(section: &Section, base_dir: &Path) -> std::io::Result<RotWriter> {
    let log_path = resolve_log_path(&section.file, base_dir);
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let max_bytes = section.max_size_mb.unwrap_or(100) * 1024 * 1024;
    let rot = FileRotate::new(
        &log_path,
        AppendTimestamp::default(file_limit(section)),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None, // file permissions (Unix only)
    );

    Ok(RotWriter(Arc::new(Mutex::new(rot))))
}

// -------- plan --------

/// Logging sections split into the catch-all and per-subsystem entries.
struct LogPlan<'a> {
    default_section: Option<&'a Section>,
    subsystems: Vec<(&'a str, &'a Section)>,
}

impl<'a> LogPlan<'a> {
    fn from_config(cfg: &'a LoggingConfig) -> Self {
        let mut subsystems: Vec<(&str, &Section)> = cfg
            .iter()
            .filter(|(k, _)| k.as_str() != "default")
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        // Longest prefix first so nested subsystems win over their parents.
        subsystems.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));

        Self {
            default_section: cfg.get("default"),
            subsystems,
        }
    }

    fn subsystem_names(&self) -> Vec<String> {
        self.subsystems.iter().map(|(n, _)| n.to_string()).collect()
    }

    fn console_targets(&self) -> Targets {
        self.targets_by(|s| &s.console_level, |_| true)
    }

    fn file_targets(&self) -> Targets {
        self.targets_by(|s| &s.file_level, |s| !s.file.trim().is_empty())
    }

    fn targets_by(
        &self,
        level_of: impl Fn(&Section) -> &String,
        include: impl Fn(&Section) -> bool,
    ) -> Targets {
        self.subsystems
            .iter()
            .filter(|(_, section)| include(section))
            .filter_map(|(name, section)| {
                parse_tracing_level(level_of(section))
                    .map(|level| (name.to_string(), LevelFilter::from_level(level)))
            })
            .fold(Targets::new().with_default(LevelFilter::OFF), |t, (name, lvl)| {
                t.with_target(name, lvl)
            })
    }

    fn file_router(&self, base_dir: &Path) -> FileRouter {
        let mut router = FileRouter::default();

        if let Some(section) = self.default_section.filter(|s| !s.file.trim().is_empty()) {
            match create_rotating_writer(section, base_dir) {
                Ok(w) => router.default = Some(w),
                Err(e) => eprintln!(
                    "Failed to initialize default log file '{}': {}",
                    resolve_log_path(&section.file, base_dir).to_string_lossy(),
                    e
                ),
            }
        }

        for (name, section) in &self.subsystems {
            if section.file.trim().is_empty() {
                continue;
            }
            match create_rotating_writer(section, base_dir) {
                Ok(w) => router.by_prefix.push((name.to_string(), w)),
                Err(e) => eprintln!(
                    "Failed to init log file for subsystem '{}': {} ({})",
                    name,
                    resolve_log_path(&section.file, base_dir).to_string_lossy(),
                    e
                ),
            }
        }

        router
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Everything not claimed by an explicit subsystem, up to `max_level`.
fn default_filter(
    subsystems: Vec<String>,
    max_level: Level,
) -> FilterFn<impl Fn(&tracing::Metadata<'_>) -> bool + Send + Sync + 'static> {
    FilterFn::new(move |meta: &tracing::Metadata<'_>| {
        let t = meta.target();
        !subsystems.iter().any(|c| matches_prefix(t, c)) && meta.level() <= &max_level
    })
}

/// Human-readable console layer. Writes to stderr so it never interleaves
/// with pages rendered on stdout.
fn console_layer<F>(filter: F) -> BoxedLayer
where
    F: Filter<Registry> + Send + Sync + 'static,
{
    fmt::layer()
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .with_filter(filter)
        .boxed()
}

/// JSON file layer routed through the per-subsystem rotating files.
fn file_layer<F>(router: FileRouter, filter: F) -> BoxedLayer
where
    F: Filter<Registry> + Send + Sync + 'static,
{
    fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(router)
        .with_filter(filter)
        .boxed()
}

// -------- public init --------

/// Initialize logging from a configuration.
/// - `cfg`: LoggingConfig containing the logging sections
/// - `base_dir`: base directory used to resolve relative log file paths (usually home_dir)
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` → `tracing` *before* installing the subscriber
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    let plan = LogPlan::from_config(cfg);
    let router = plan.file_router(base_dir);
    let names = plan.subsystem_names();

    let mut layers: Vec<BoxedLayer> = vec![console_layer(plan.console_targets())];

    if !router.by_prefix.is_empty() {
        layers.push(file_layer(router.clone(), plan.file_targets()));
    }

    if let Some(section) = plan.default_section {
        if let Some(level) = parse_tracing_level(&section.console_level) {
            layers.push(console_layer(default_filter(names.clone(), level)));
        }
        if router.default.is_some() {
            if let Some(level) = parse_tracing_level(&section.file_level) {
                layers.push(file_layer(router.clone(), default_filter(names, level)));
            }
        }
    }

    let files_configured = !router.is_empty();
    let _ = Registry::default().with(layers).try_init();

    if !files_configured {
        tracing::debug!("no log files configured, console only");
    }
}

fn init_default_logging() {
    let _ = fmt()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}

// =================== tests ===================
