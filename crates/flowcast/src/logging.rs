use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log size that triggers trimming (5 MB)
const MAX_LOG_SIZE: usize = 5 * 1024 * 1024;
/// Newest bytes kept when trimming (1 MB)
const KEEP_SIZE: usize = 1024 * 1024;
const TRIMMED_HEADER: &[u8] = b"--- earlier flowcast runs trimmed ---\n";

/// Keep only the whole lines among the newest `keep` bytes once the log passes `max`.
///
/// Returns `true` when the file was rewritten.
fn trim_log(log_path: &Path, max: usize, keep: usize) -> io::Result<bool> {
    let len = match fs::metadata(log_path) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if len <= max as u64 {
        return Ok(false);
    }

    let content = fs::read(log_path)?;
    let tail = &content[content.len().saturating_sub(keep)..];
    let whole_lines = tail
        .iter()
        .position(|&b| b == b'\n')
        .map_or(&[][..], |newline| &tail[newline + 1..]);

    fs::write(log_path, [TRIMMED_HEADER, whole_lines].concat())?;
    Ok(true)
}

/// Hands out writers for the shared log file
#[derive(Clone)]
struct LogWriterFactory {
    file: Arc<Mutex<File>>,
}

struct LogWriter {
    file: Arc<Mutex<File>>,
}

impl LogWriter {
    fn with_file<T>(&self, f: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        f(&mut file)
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(|file| file.flush())
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            file: self.file.clone(),
        }
    }
}

fn env_filter(level: &str) -> EnvFilter {
    let default_filter = format!("flowcast={level},flowcast_core=warn");
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter))
}

/// Initialize logging to stderr, or to `log_file` when one is given.
///
/// A log file is appended to and trimmed to its last 1MB once it passes 5MB.
/// `RUST_LOG` overrides `level`.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> color_eyre::Result<()> {
    let Some(log_path) = log_file else {
        tracing_subscriber::registry()
            .with(env_filter(level))
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .init();
        return Ok(());
    };

    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    if let Err(e) = trim_log(log_path, MAX_LOG_SIZE, KEEP_SIZE) {
        eprintln!("Warning: Failed to trim log file: {e}");
    }

    let file = OpenOptions::new().create(true).append(true).open(log_path)?;
    let writer_factory = LogWriterFactory {
        file: Arc::new(Mutex::new(file)),
    };

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            fmt::layer()
                .with_writer(writer_factory)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .init();

    tracing::info!(log_path = %log_path.display(), "flowcast logging initialized");
    Ok(())
}
