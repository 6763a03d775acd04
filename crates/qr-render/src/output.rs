//! Output encoding for generated images (JPG, PNG, single-page PDF).

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::{QrRenderError, Result};

/// JPEG quality used for `.jpg` output and PDF image streams.
pub const JPEG_QUALITY: u8 = 75;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jpg,
    Png,
    Pdf,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Jpg, OutputFormat::Png, OutputFormat::Pdf];

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// Upper-case name as shown in the format selector.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Jpg => "JPG",
            OutputFormat::Png => "PNG",
            OutputFormat::Pdf => "PDF",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = QrRenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "JPG" | "JPEG" => Ok(OutputFormat::Jpg),
            "PNG" => Ok(OutputFormat::Png),
            "PDF" => Ok(OutputFormat::Pdf),
            other => Err(QrRenderError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Encode an image into the bytes of the given format.
pub fn encode(img: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Jpg => encode_jpeg(img),
        OutputFormat::Png => {
            let mut cursor = Cursor::new(Vec::new());
            img.write_to(&mut cursor, ImageFormat::Png)?;
            Ok(cursor.into_inner())
        }
        OutputFormat::Pdf => {
            let jpeg = encode_jpeg(img)?;
            Ok(pdf_with_jpeg(&jpeg, img.width(), img.height()))
        }
    }
}

/// Write `img` to `path`, forcing the extension to match `format`.
///
/// Returns the path actually written.
pub fn save(img: &DynamicImage, path: &Path, format: OutputFormat) -> Result<PathBuf> {
    let path = path.with_extension(format.extension());
    let bytes = encode(img, format)?;
    std::fs::write(&path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), %format, "Wrote image");
    Ok(path)
}

fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    encoder.encode_image(&rgb)?;
    Ok(buf)
}

/// Build a single-page PDF whose page is exactly the image at 72 dpi.
fn pdf_with_jpeg(jpeg: &[u8], width: u32, height: u32) -> Vec<u8> {
    let mut pdf = PdfBuilder::new();

    pdf.object(b"<< /Type /Catalog /Pages 2 0 R >>");
    pdf.object(b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
    pdf.object(
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {width} {height}] \
             /Resources << /XObject << /Im0 4 0 R >> >> /Contents 5 0 R >>"
        )
        .as_bytes(),
    );
    pdf.stream(
        &format!(
            "/Type /XObject /Subtype /Image /Width {width} /Height {height} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /DCTDecode"
        ),
        jpeg,
    );
    pdf.stream("", format!("q {width} 0 0 {height} 0 0 cm /Im0 Do Q").as_bytes());
    let created = chrono::Local::now().format("D:%Y%m%d%H%M%S").to_string();
    pdf.object(format!("<< /Producer (qr-render) /CreationDate ({created}) >>").as_bytes());

    pdf.finish(1, 6)
}

struct PdfBuilder {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfBuilder {
    fn new() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    fn begin(&mut self) {
        self.offsets.push(self.buf.len());
        let id = self.offsets.len();
        self.buf.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
    }

    fn object(&mut self, body: &[u8]) {
        self.begin();
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, dict: &str, data: &[u8]) {
        self.begin();
        let sep = if dict.is_empty() { "" } else { " " };
        self.buf
            .extend_from_slice(format!("<< {dict}{sep}/Length {} >>\nstream\n", data.len()).as_bytes());
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn finish(mut self, root: usize, info: usize) -> Vec<u8> {
        let xref_at = self.buf.len();
        let size = self.offsets.len() + 1;
        self.buf
            .extend_from_slice(format!("xref\n0 {size}\n0000000000 65535 f \n").as_bytes());
        for offset in &self.offsets {
            self.buf
                .extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        self.buf.extend_from_slice(
            format!(
                "trailer\n<< /Size {size} /Root {root} 0 R /Info {info} 0 R >>\nstartxref\n{xref_at}\n%%EOF\n"
            )
            .as_bytes(),
        );
        self.buf
    }
}
