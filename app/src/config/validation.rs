//! Setting value validation.

use qr_batch::MAX_QUANTITY;
use qr_render::OutputFormat;

use super::defaults::DEFAULT_SETTINGS;

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    if !DEFAULT_SETTINGS.contains_key(key) {
        return Err(format!("unknown setting key: {key}"));
    }
    match key {
        "QUANTITY" => validate_int_range(value, 1, i64::from(MAX_QUANTITY))?,
        "OUTPUT_FORMAT" => {
            value
                .parse::<OutputFormat>()
                .map_err(|_| "must be 'JPG', 'PNG' or 'PDF'")?;
        }
        "FONT_SIZE" => validate_int_range(value, 1, 100)?,
        "QR_MARGIN" | "TEXT_MARGIN_BOTTOM" => validate_int_range(value, 0, 100)?,
        "QR_SIZE" => validate_int_range(value, 32, 4096)?,
        "QR_BORDER" => validate_int_range(value, 0, 20)?,
        "QR_OFFSET_X" | "QR_OFFSET_Y" => {
            if !value.is_empty() {
                validate_int_range(value, 0, 10_000)?;
            }
        }
        "SERVER_PORT" => validate_int_range(value, 1, 65_535)?,
        "FILE_PREFIX" | "FILE_SUFFIX" => {
            if value.chars().any(is_forbidden_in_name) {
                return Err("must not contain \\ / : * ? \" < > |".into());
            }
        }
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.trim().parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_forbidden_in_name(c: char) -> bool {
    matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(key, "SKIP_HEADER" | "PAD_ZEROS" | "USE_DATA_AS_FILENAME")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_boolean() {
        assert!(validate_setting("PAD_ZEROS", "true").is_ok());
        assert!(validate_setting("SKIP_HEADER", "false").is_ok());
        assert!(validate_setting("USE_DATA_AS_FILENAME", "yes").is_err());
    }

    #[test]
    fn test_quantity_range() {
        assert!(validate_setting("QUANTITY", "1").is_ok());
        assert!(validate_setting("QUANTITY", "1000000").is_ok());
        assert!(validate_setting("QUANTITY", "0").is_err());
        assert!(validate_setting("QUANTITY", "1000001").is_err());
        assert!(validate_setting("QUANTITY", "ten").is_err());
    }

    #[test]
    fn test_output_format() {
        assert!(validate_setting("OUTPUT_FORMAT", "png").is_ok());
        assert!(validate_setting("OUTPUT_FORMAT", "JPEG").is_ok());
        assert!(validate_setting("OUTPUT_FORMAT", "BMP").is_err());
    }

    #[test]
    fn test_styling_ranges() {
        assert!(validate_setting("FONT_SIZE", "0").is_err());
        assert!(validate_setting("FONT_SIZE", "100").is_ok());
        assert!(validate_setting("QR_MARGIN", "0").is_ok());
        assert!(validate_setting("TEXT_MARGIN_BOTTOM", "101").is_err());
        assert!(validate_setting("QR_SIZE", "16").is_err());
    }

    #[test]
    fn test_offsets_may_be_blank() {
        assert!(validate_setting("QR_OFFSET_X", "").is_ok());
        assert!(validate_setting("QR_OFFSET_Y", "25").is_ok());
        assert!(validate_setting("QR_OFFSET_Y", "-1").is_err());
    }

    #[test]
    fn test_prefix_rejects_path_separators() {
        assert!(validate_setting("FILE_PREFIX", "batch-").is_ok());
        assert!(validate_setting("FILE_PREFIX", "../").is_err());
    }

    #[test]
    fn test_unknown_key() {
        assert!(validate_setting("UNKNOWN_KEY", "x").is_err());
    }
}
