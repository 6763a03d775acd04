//! One-shot batch run: `qr-magic [INPUT_FILE] OUTPUT_DIR [--format JPG|PNG|PDF]`.
//!
//! Uses the stored settings; arguments override the data file, output folder
//! and format. Ctrl+C stops after the current image.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::bail;
use clap::Parser;
use qr_batch::CancelFlag;
use qr_magic_lib::config::AppConfig;
use qr_magic_lib::services::batch::{JobError, execute_job, prepare_job};
use qr_magic_lib::services::font::FontService;
use qr_render::OutputFormat;

#[derive(Debug, clap::Parser)]
#[command(
    name = "qr-magic",
    version,
    about = "Batch-generate labeled QR code images"
)]
#[command(allow_missing_positional = true)]
struct Cli {
    /// TXT or CSV file, one value per line. Without it the stored quantity is used
    input_file: Option<PathBuf>,

    /// Folder the images are written to
    output_dir: PathBuf,

    /// Output format (JPG, JPEG, PNG or PDF)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Treat the first line of the data file as a header
    #[arg(long)]
    skip_header: bool,
}

impl Cli {
    /// Write the arguments over the stored settings.
    ///
    /// An input file named on the command line must exist; only the stored
    /// setting falls back to Quantity mode.
    fn apply(self, config: &mut AppConfig) -> anyhow::Result<()> {
        if let Some(input) = self.input_file {
            if !input.is_file() {
                bail!("Input file not found: {}", input.display());
            }
            config.input_file = Some(input);
        }
        config.output_dir = Some(self.output_dir);
        if let Some(format) = self.format {
            config.format = format;
        }
        if self.skip_header {
            config.skip_header = true;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    qr_magic_lib::init_tracing();

    let (_sm, mut config, dir) = qr_magic_lib::init_foundation()?;
    if let Err(e) = cli.apply(&mut config) {
        eprintln!("Error: {e}");
        return Ok(ExitCode::FAILURE);
    }
    let fonts = FontService::new(dir);

    let job = match prepare_job(&config, &fonts) {
        Ok(job) => job,
        Err(e @ (JobError::OutputDirNotSet | JobError::Batch(_))) => {
            eprintln!("Error: {e}");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    let cancel = CancelFlag::new();
    let flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl+C received, stopping after the current image");
            flag.cancel();
        }
    });

    let summary = tokio::task::spawn_blocking(move || {
        execute_job(&job, &cancel, |event| println!("{}", event.log_line()))
    })
    .await??;

    tracing::info!(
        generated = summary.generated,
        failed = summary.failed,
        skipped = summary.skipped,
        "Batch finished"
    );
    if summary.failed > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
