use chrono::{DateTime, Local, Utc};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tinydns_domain::{DomainError, ResolutionEvent};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tracing::{debug, warn};

const MAX_BATCH: usize = 100;

/// Appends the lines for each resolution event to a per-run log file:
/// `REQUEST`, one `FORWARD` (and `ERROR` on failure) per upstream attempt,
/// `CACHE` when the answer was stored, then `RESPONSE`.
pub struct QueryLogWriter {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl QueryLogWriter {
    /// Opens `<dir>/tinydns_<YYYYmmdd_HHMMSS>.log`, creating `dir` if needed.
    pub async fn create(dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await.map_err(|e| {
            DomainError::IoError(format!("Failed to create log dir {}: {}", dir.display(), e))
        })?;

        let path = dir.join(format!(
            "tinydns_{}.log",
            Local::now().format("%Y%m%d_%H%M%S")
        ));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| {
                DomainError::IoError(format!("Failed to open {}: {}", path.display(), e))
            })?;

        let mut writer = BufWriter::new(file);
        let opened = format!("[{}] STARTUP: query log opened\n", stamp(Utc::now()));
        let written = match writer.write_all(opened.as_bytes()).await {
            Ok(()) => writer.flush().await,
            Err(e) => Err(e),
        };
        written.map_err(|e| {
            DomainError::IoError(format!("Failed to write {}: {}", path.display(), e))
        })?;

        Ok(Self { path, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format_entry(event: &ResolutionEvent) -> String {
        let ts = stamp(event.timestamp);
        let rtype = &event.record_type;
        let domain = &event.domain;
        let mut out = String::new();

        let _ = writeln!(
            out,
            "[{}] REQUEST: [{}] {} from {}",
            ts, rtype, domain, event.client_ip
        );

        for attempt in &event.upstream_attempts {
            let _ = writeln!(
                out,
                "[{}] FORWARD: [{}] {} to upstream {} (attempt {}/{})",
                ts, rtype, domain, attempt.server, attempt.attempt, attempt.attempts
            );
            if let Some(error) = &attempt.error {
                let _ = writeln!(
                    out,
                    "[{}] ERROR: [{}] {} upstream query failed on {} after {:?}: {}",
                    ts, rtype, domain, attempt.server, attempt.elapsed, error
                );
            }
        }

        if event.cached {
            let _ = writeln!(out, "[{}] CACHE: [{}] {} saved to cache", ts, rtype, domain);
        }

        let _ = writeln!(
            out,
            "[{}] RESPONSE: [{}] {} resolved from {} in {:?}",
            ts,
            rtype,
            domain,
            event.operation.as_str(),
            event.response_time
        );
        out
    }

    /// Consumes events until every sender is gone. The file is flushed after
    /// each drained batch.
    pub fn start(
        mut self,
        mut rx: mpsc::UnboundedReceiver<ResolutionEvent>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            debug!(path = %self.path.display(), "QueryLogWriter: Starting consumer");

            let mut total_events = 0u64;

            while let Some(event) = rx.recv().await {
                let mut batch = vec![event];
                while batch.len() < MAX_BATCH {
                    match rx.try_recv() {
                        Ok(event) => batch.push(event),
                        Err(_) => break,
                    }
                }

                total_events += batch.len() as u64;
                self.write_batch(&batch).await;
            }

            debug!(total_events, "QueryLogWriter: Consumer shutting down gracefully");
        })
    }

    async fn write_batch(&mut self, batch: &[ResolutionEvent]) {
        for event in batch {
            if let Err(e) = self.writer.write_all(Self::format_entry(event).as_bytes()).await {
                warn!(error = %e, domain = %event.domain, "QueryLogWriter: Failed to write entry");
            }
        }
        if let Err(e) = self.writer.flush().await {
            warn!(error = %e, "QueryLogWriter: Failed to flush log file");
        }
    }
}

fn stamp(timestamp: DateTime<Utc>) -> impl std::fmt::Display {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S%.3f")
}
