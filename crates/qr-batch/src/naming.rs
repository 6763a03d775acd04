//! Output file naming.

use std::sync::LazyLock;

use qr_render::OutputFormat;
use regex::Regex;

/// Characters that are invalid in file names on at least one major platform.
static RE_FORBIDDEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|]"#).expect("static regex"));

/// How output files are named.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingOptions {
    pub prefix: String,
    pub suffix: String,
    /// Zero-pad the index to the digit count of the item total.
    pub pad_zeros: bool,
    /// Name each file after its (sanitized) data value instead of its index.
    pub use_data_as_filename: bool,
    pub format: OutputFormat,
}

impl NamingOptions {
    /// Data-derived names are never padded.
    pub fn normalized(mut self) -> Self {
        if self.use_data_as_filename {
            self.pad_zeros = false;
        }
        self
    }
}

/// Digit count used for zero-padding, or 0 when padding is off.
pub fn pad_width(total: usize, pad: bool) -> usize {
    if pad { total.to_string().len() } else { 0 }
}

/// Format a 1-based index, zero-padded to `width`.
pub fn index_label(index: usize, width: usize) -> String {
    format!("{index:0width$}")
}

/// Replace each of `\ / : * ? " < > |` with `_`.
pub fn sanitize_filename(value: &str) -> String {
    RE_FORBIDDEN.replace_all(value, "_").into_owned()
}

/// File stem for the item at `index` (1-based) out of `total`.
///
/// `data` is the item's data value in data-file mode.
pub fn base_name(index: usize, total: usize, data: Option<&str>, opts: &NamingOptions) -> String {
    if let Some(value) = data.map(str::trim).filter(|v| !v.is_empty()) {
        if opts.use_data_as_filename {
            return sanitize_filename(value);
        }
    }
    let width = pad_width(total, opts.pad_zeros && !opts.use_data_as_filename);
    format!("{}{}{}", opts.prefix, index_label(index, width), opts.suffix)
}

/// Append the format's extension to a file stem.
pub fn file_name(base: &str, format: OutputFormat) -> String {
    format!("{base}.{}", format.extension())
}
