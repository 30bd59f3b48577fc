//! Page map report writer
//!
//! Format, one block per visited page in key order:
//!
//! ```text
//! example.com
//! 	http://example.com/about
//! 	http://example.com/contact
//!
//! example.com/about
//!
//! ```

use crate::{Result, SiteMapError};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Serializes the page map into any writer
pub fn render_report<W: Write>(
    pages: &BTreeMap<String, Vec<String>>,
    out: &mut W,
) -> io::Result<()> {
    for (page, references) in pages {
        writeln!(out, "{}", page)?;
        for reference in references {
            writeln!(out, "\t{}", reference)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Writes the page map to `path`, replacing any existing file
pub fn write_report(pages: &BTreeMap<String, Vec<String>>, path: &Path) -> Result<()> {
    let report_error = |source| SiteMapError::Report {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(report_error)?;
    let mut writer = BufWriter::new(file);
    render_report(pages, &mut writer).map_err(report_error)?;
    writer.flush().map_err(report_error)?;

    tracing::info!("Wrote {} pages to {}", pages.len(), path.display());
    Ok(())
}
