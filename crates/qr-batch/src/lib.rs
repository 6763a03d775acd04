//! Batch planning and execution for labeled QR images.
//!
//! Turns a data file (one value per line) or a plain quantity into an
//! ordered list of items with derived file names, and runs them through a
//! renderer on the calling thread with a polled cancel flag.

pub mod input;
pub mod naming;
pub mod plan;
pub mod preview;
pub mod renderer;
pub mod runner;

// Re-exports for convenience
pub use input::{decode_lines, read_input_file};
pub use naming::{NamingOptions, sanitize_filename};
pub use plan::{BatchItem, BatchSource, SourceValues, item_count, plan_items};
pub use preview::{PreviewItem, preview_item};
pub use renderer::ItemRenderer;
pub use runner::{BatchEvent, BatchSummary, CancelFlag, run_batch};

/// Upper bound for the quantity of a numeric sequence.
pub const MAX_QUANTITY: u32 = 1_000_000;

/// Errors that abort a batch before or while planning it.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Output folder not found: {0}")]
    OutputDirMissing(String),

    #[error("Failed to read data file {path}: {source}")]
    ReadInput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Render error: {0}")]
    Render(#[from] qr_render::QrRenderError),
}
