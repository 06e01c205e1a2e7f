//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.
//!
//! ```text
//! photo.png → photo.jpg
//!     Format: jpg
//!     Size: 800x600
//!     Bytes: 482113 → 91220
//! ```

use crate::types::{ConversionReport, ImageInfo};

/// Lines for a finished conversion.
pub fn format_conversion(report: &ConversionReport) -> Vec<String> {
    let mut lines = vec![format!("{} → {}", report.input, report.output)];
    lines.push(format!("    Format: {}", report.format));
    if let Some(size) = report.size {
        lines.push(format!("    Size: {size}"));
    }
    lines.push(format!(
        "    Bytes: {} → {}",
        report.input_bytes, report.output_bytes
    ));
    lines
}

/// Lines describing an image.
pub fn format_info(name: &str, info: &ImageInfo) -> Vec<String> {
    let format = info
        .format
        .map(|f| f.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    vec![
        name.to_string(),
        format!("    Format: {format}"),
        format!("    Size: {}", info.size),
        format!(
            "    Color: {}{}",
            info.color,
            if info.has_alpha { " (alpha)" } else { "" }
        ),
        format!("    Bytes: {}", info.bytes),
    ]
}

pub fn print_conversion(report: &ConversionReport) {
    for line in format_conversion(report) {
        println!("{line}");
    }
}

pub fn print_info(name: &str, info: &ImageInfo) {
    for line in format_info(name, info) {
        println!("{line}");
    }
}
