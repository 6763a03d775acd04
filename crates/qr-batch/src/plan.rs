//! Batch item planning.

use std::path::PathBuf;

use serde::Serialize;

use crate::input::read_input_file;
use crate::naming::{NamingOptions, base_name, file_name};
use crate::{BatchError, MAX_QUANTITY};

/// Where item values come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchSource {
    /// One value per line; the first line is dropped when `skip_header` is set.
    DataFile { path: PathBuf, skip_header: bool },
    /// `quantity` items numbered from 1.
    Sequence { quantity: u32 },
}

/// Values resolved from a [`BatchSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceValues {
    Data(Vec<String>),
    Sequence(u32),
}

impl BatchSource {
    /// Read the data file (if any) and drop the header row.
    pub fn resolve(&self) -> Result<SourceValues, BatchError> {
        match self {
            BatchSource::DataFile { path, skip_header } => {
                let mut lines = read_input_file(path)?;
                if *skip_header && !lines.is_empty() {
                    lines.remove(0);
                }
                Ok(SourceValues::Data(lines))
            }
            BatchSource::Sequence { quantity } => {
                Ok(SourceValues::Sequence((*quantity).clamp(1, MAX_QUANTITY)))
            }
        }
    }
}

/// One image to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchItem {
    /// 1-based position in the batch.
    pub index: usize,
    pub file_name: String,
    /// Text encoded in the QR and printed as the label; `None` for blank lines.
    ///
    /// Items from a data file always carry the data line, even when their
    /// file names are indexed (`use_data_as_filename` off). Only sequence
    /// items encode the generated name.
    pub content: Option<String>,
}

/// Number of items the values produce.
pub fn item_count(values: &SourceValues) -> usize {
    match values {
        SourceValues::Data(lines) => lines.len(),
        SourceValues::Sequence(quantity) => *quantity as usize,
    }
}

/// Expand source values into ordered batch items.
pub fn plan_items(values: &SourceValues, opts: &NamingOptions) -> Vec<BatchItem> {
    let total = item_count(values);
    match values {
        SourceValues::Data(lines) => lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let index = i + 1;
                let value = line.trim();
                let base = base_name(index, total, Some(value), opts);
                BatchItem {
                    index,
                    file_name: file_name(&base, opts.format),
                    content: (!value.is_empty()).then(|| value.to_string()),
                }
            })
            .collect(),
        SourceValues::Sequence(_) => (1..=total)
            .map(|index| {
                let base = base_name(index, total, None, opts);
                BatchItem {
                    index,
                    file_name: file_name(&base, opts.format),
                    content: Some(base),
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qr_render::OutputFormat;

    #[test]
    fn sequence_items_encode_their_names() {
        let opts = NamingOptions {
            prefix: "box".into(),
            pad_zeros: true,
            format: OutputFormat::Png,
            ..NamingOptions::default()
        };
        let items = plan_items(&SourceValues::Sequence(12), &opts);
        assert_eq!(items.len(), 12);
        assert_eq!(items[0].file_name, "box01.png");
        assert_eq!(items[0].content.as_deref(), Some("box01"));
        assert_eq!(items[11].file_name, "box12.png");
    }

    #[test]
    fn data_items_keep_values_as_content() {
        let values = SourceValues::Data(vec!["  alpha ".into(), "".into(), "b:c".into()]);
        let opts = NamingOptions {
            use_data_as_filename: true,
            ..NamingOptions::default()
        };
        let items = plan_items(&values, &opts);
        assert_eq!(items[0].file_name, "alpha.jpg");
        assert_eq!(items[0].content.as_deref(), Some("alpha"));
        assert_eq!(items[1].index, 2);
        assert_eq!(items[1].content, None);
        assert_eq!(items[2].file_name, "b_c.jpg");
        assert_eq!(items[2].content.as_deref(), Some("b:c"));
    }

    #[test]
    fn data_items_with_indexed_names() {
        let values = SourceValues::Data(vec!["x".into(), "y".into()]);
        let opts = NamingOptions {
            suffix: "-qr".into(),
            ..NamingOptions::default()
        };
        let items = plan_items(&values, &opts);
        assert_eq!(items[1].file_name, "2-qr.jpg");
        assert_eq!(items[1].content.as_deref(), Some("y"));
    }

    #[test]
    fn resolve_skips_header_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codes.csv");
        std::fs::write(&path, "code\nA1\nA2\n").unwrap();

        let source = BatchSource::DataFile {
            path: path.clone(),
            skip_header: true,
        };
        assert_eq!(
            source.resolve().unwrap(),
            SourceValues::Data(vec!["A1".into(), "A2".into()])
        );

        let source = BatchSource::DataFile {
            path,
            skip_header: false,
        };
        assert_eq!(item_count(&source.resolve().unwrap()), 3);
    }

    #[test]
    fn sequence_quantity_is_clamped() {
        let zero = BatchSource::Sequence { quantity: 0 };
        assert_eq!(zero.resolve().unwrap(), SourceValues::Sequence(1));
        let huge = BatchSource::Sequence { quantity: u32::MAX };
        assert_eq!(huge.resolve().unwrap(), SourceValues::Sequence(MAX_QUANTITY));
    }
}
