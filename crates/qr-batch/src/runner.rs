//! Sequential batch execution with a polled cancel flag.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use qr_render::QrRenderError;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::BatchError;
use crate::plan::BatchItem;

/// Shared stop request, checked once before each item.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Progress notifications emitted while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum BatchEvent {
    Started { total: usize },
    Generated { index: usize, file_name: String },
    Failed { index: usize, error: String },
    Skipped { index: usize },
    Cancelled { processed: usize },
    Done,
}

impl BatchEvent {
    /// Human-readable log line for the form's log view and the CLI.
    pub fn log_line(&self) -> String {
        match self {
            BatchEvent::Started { total } => format!("Generating {total} image(s)..."),
            BatchEvent::Generated { file_name, .. } => format!("✓ {file_name}"),
            BatchEvent::Failed { index, error } => format!("✗ {index}: {error}"),
            BatchEvent::Skipped { index } => format!("- {index}: blank line skipped"),
            BatchEvent::Cancelled { processed } => format!("Stopped after {processed} item(s)"),
            BatchEvent::Done => "Done!".to_string(),
        }
    }
}

/// Outcome counts of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub generated: usize,
    pub failed: usize,
    pub skipped: usize,
    pub cancelled: bool,
}

impl BatchSummary {
    pub fn processed(&self) -> usize {
        self.generated + self.failed + self.skipped
    }
}

/// Render every item into `out_dir`, in index order.
///
/// `render` receives the item's content and the target path and returns
/// the path actually written. A failing item is reported and the batch
/// continues. Fails only when `out_dir` is not an existing directory.
pub fn run_batch<R, E>(
    items: &[BatchItem],
    out_dir: &Path,
    mut render: R,
    cancel: &CancelFlag,
    mut on_event: E,
) -> Result<BatchSummary, BatchError>
where
    R: FnMut(&str, &Path) -> Result<PathBuf, QrRenderError>,
    E: FnMut(BatchEvent),
{
    if !out_dir.is_dir() {
        return Err(BatchError::OutputDirMissing(out_dir.display().to_string()));
    }

    let mut summary = BatchSummary {
        total: items.len(),
        ..BatchSummary::default()
    };
    info!(total = items.len(), out_dir = %out_dir.display(), "Batch started");
    on_event(BatchEvent::Started { total: items.len() });

    for item in items {
        if cancel.is_cancelled() {
            summary.cancelled = true;
            break;
        }

        let Some(content) = item.content.as_deref() else {
            debug!(index = item.index, "Skipping blank line");
            summary.skipped += 1;
            on_event(BatchEvent::Skipped { index: item.index });
            continue;
        };

        let target = out_dir.join(&item.file_name);
        match render(content, &target) {
            Ok(written) => {
                debug!(index = item.index, path = %written.display(), "Item generated");
                summary.generated += 1;
                on_event(BatchEvent::Generated {
                    index: item.index,
                    file_name: item.file_name.clone(),
                });
            }
            Err(e) => {
                warn!(index = item.index, error = %e, "Item failed");
                summary.failed += 1;
                on_event(BatchEvent::Failed {
                    index: item.index,
                    error: e.to_string(),
                });
            }
        }
    }

    if summary.cancelled {
        info!(processed = summary.processed(), "Batch cancelled");
        on_event(BatchEvent::Cancelled {
            processed: summary.processed(),
        });
    } else {
        info!(
            generated = summary.generated,
            failed = summary.failed,
            skipped = summary.skipped,
            "Batch finished"
        );
        on_event(BatchEvent::Done);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<BatchItem> {
        (1..=n)
            .map(|index| BatchItem {
                index,
                file_name: format!("{index}.png"),
                content: Some(format!("v{index}")),
            })
            .collect()
    }

    fn touch(_content: &str, path: &Path) -> Result<PathBuf, QrRenderError> {
        std::fs::write(path, b"x")?;
        Ok(path.to_path_buf())
    }

    #[test]
    fn missing_output_dir_fails_before_rendering() {
        let mut calls = 0;
        let err = run_batch(
            &items(3),
            Path::new("/nonexistent/output"),
            |_, p| {
                calls += 1;
                Ok(p.to_path_buf())
            },
            &CancelFlag::new(),
            |_| {},
        )
        .unwrap_err();
        assert!(matches!(err, BatchError::OutputDirMissing(_)));
        assert_eq!(calls, 0);
    }

    #[test]
    fn generates_all_items_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut events = Vec::new();
        let summary = run_batch(&items(3), dir.path(), touch, &CancelFlag::new(), |e| {
            events.push(e)
        })
        .unwrap();

        assert_eq!(summary.generated, 3);
        assert!(!summary.cancelled);
        assert!(dir.path().join("2.png").exists());
        let lines: Vec<_> = events.iter().map(BatchEvent::log_line).collect();
        assert_eq!(
            lines,
            ["Generating 3 image(s)...", "✓ 1.png", "✓ 2.png", "✓ 3.png", "Done!"]
        );
    }

    #[test]
    fn failures_are_reported_and_batch_continues() {
        let dir = tempfile::tempdir().unwrap();
        let mut events = Vec::new();
        let summary = run_batch(
            &items(3),
            dir.path(),
            |content, path| {
                if content == "v2" {
                    Err(QrRenderError::Encode("data too long".into()))
                } else {
                    touch(content, path)
                }
            },
            &CancelFlag::new(),
            |e| events.push(e),
        )
        .unwrap();

        assert_eq!(summary.generated, 2);
        assert_eq!(summary.failed, 1);
        assert!(events.contains(&BatchEvent::Failed {
            index: 2,
            error: "QR encode error: data too long".into(),
        }));
        assert_eq!(events.last(), Some(&BatchEvent::Done));
    }

    #[test]
    fn blank_items_are_skipped_without_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let mut list = items(2);
        list[0].content = None;
        let summary = run_batch(&list, dir.path(), touch, &CancelFlag::new(), |_| {}).unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.generated, 1);
        assert!(!dir.path().join("1.png").exists());
    }

    #[test]
    fn cancel_stops_before_next_item() {
        let dir = tempfile::tempdir().unwrap();
        let cancel = CancelFlag::new();
        let trigger = cancel.clone();
        let mut events = Vec::new();
        let summary = run_batch(
            &items(5),
            dir.path(),
            |content, path| {
                if content == "v2" {
                    trigger.cancel();
                }
                touch(content, path)
            },
            &cancel,
            |e| events.push(e),
        )
        .unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.generated, 2);
        assert_eq!(events.last(), Some(&BatchEvent::Cancelled { processed: 2 }));
        assert!(!events.contains(&BatchEvent::Done));
    }

    #[test]
    fn cancel_flag_can_be_reset() {
        let flag = CancelFlag::new();
        flag.cancel();
        assert!(flag.is_cancelled());
        flag.reset();
        assert!(!flag.is_cancelled());
    }
}
