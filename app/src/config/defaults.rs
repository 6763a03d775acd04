//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

/// Definitions in form order.
const DEFS: &[DefTuple] = &[
    // Source
    ("INPUT_FILE", "", "Data file (TXT/CSV, one value per line); blank = use Quantity"),
    ("SKIP_HEADER", "false", "Skip the first row of the data file"),
    ("OUTPUT_DIR", "", "Folder where QR images are written (must exist)"),
    // Naming
    ("FILE_PREFIX", "", "Text placed before the index in file names"),
    ("FILE_SUFFIX", "", "Text placed after the index in file names"),
    ("QUANTITY", "1", "Number of images when no data file is used"),
    ("PAD_ZEROS", "false", "Pad the index with leading zeros"),
    ("USE_DATA_AS_FILENAME", "false", "Name files after their data value"),
    ("OUTPUT_FORMAT", "JPG", "Output format: JPG, PNG or PDF"),
    // Styling
    ("FONT_SIZE", "14", "Label font size in pixels"),
    ("QR_MARGIN", "10", "White margin around the QR code in pixels"),
    ("TEXT_MARGIN_BOTTOM", "10", "Space below the label in pixels"),
    ("QR_SIZE", "300", "QR code edge length in pixels"),
    ("QR_BORDER", "2", "Quiet zone around the QR code in modules"),
    ("FONT_PATH", "", "TTF/OTF file for labels; blank = uploaded or system font"),
    ("BACKGROUND_IMAGE", "", "Optional background image the QR is drawn onto"),
    ("QR_OFFSET_X", "", "QR position on the background (blank = margin)"),
    ("QR_OFFSET_Y", "", "QR position on the background (blank = margin)"),
    // Server
    ("SERVER_PORT", "8090", "Port of the local form server"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Setting keys in form order.
pub fn ordered_keys() -> impl Iterator<Item = &'static str> {
    DEFS.iter().map(|&(key, _, _)| key)
}

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}
