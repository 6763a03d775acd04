//! First-item preview for the form.

use serde::Serialize;

use crate::naming::{NamingOptions, base_name, file_name};
use crate::plan::{SourceValues, item_count};

/// Content rendered when there is nothing to preview.
const BLANK_PREVIEW: &str = " ";

/// What the first generated file would be called and contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewItem {
    pub file_name: String,
    pub content: String,
    /// Items the batch would produce (the form's Quantity field).
    pub total: usize,
}

/// Preview the item at index 1, named exactly as the batch would name it.
///
/// A missing or blank first value previews as a single space so an image
/// can always be drawn.
pub fn preview_item(values: &SourceValues, opts: &NamingOptions) -> PreviewItem {
    let total = item_count(values);
    let (stem, content) = match values {
        SourceValues::Data(lines) => {
            let value = lines.first().map(|l| l.trim()).filter(|v| !v.is_empty());
            (
                base_name(1, total, value, opts),
                value.unwrap_or(BLANK_PREVIEW).to_string(),
            )
        }
        SourceValues::Sequence(_) => {
            let base = base_name(1, total, None, opts);
            (base.clone(), base)
        }
    };

    PreviewItem {
        file_name: file_name(&stem, opts.format),
        content,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::plan_items;
    use qr_render::OutputFormat;

    #[test]
    fn sequence_preview_pads_to_total() {
        let opts = NamingOptions {
            prefix: "P".into(),
            suffix: "S".into(),
            pad_zeros: true,
            format: OutputFormat::Pdf,
            ..NamingOptions::default()
        };
        let p = preview_item(&SourceValues::Sequence(250), &opts);
        assert_eq!(p.file_name, "P001S.pdf");
        assert_eq!(p.content, "P001S");
        assert_eq!(p.total, 250);
    }

    #[test]
    fn data_preview_matches_first_planned_item() {
        let values = SourceValues::Data(vec![" 12/34 ".into(), "x".into()]);
        for use_data in [false, true] {
            let opts = NamingOptions {
                use_data_as_filename: use_data,
                ..NamingOptions::default()
            };
            let p = preview_item(&values, &opts);
            let first = plan_items(&values, &opts).remove(0);
            assert_eq!(p.file_name, first.file_name);
            assert_eq!(Some(p.content), first.content);
        }
    }

    #[test]
    fn empty_data_file_previews_blank() {
        let p = preview_item(&SourceValues::Data(Vec::new()), &NamingOptions::default());
        assert_eq!(p.content, " ");
        assert_eq!(p.file_name, "1.jpg");
        assert_eq!(p.total, 0);
    }
}
