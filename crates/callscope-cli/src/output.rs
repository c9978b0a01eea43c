//! Writes expanded call trees to stdout.

use std::io::Write;

use callscope_tree::{TreeRow, render_text};

use crate::cli::ResolvedOutputFormat;
use crate::errors::AppError;

/// Writes `rows` in the requested format, ending with a newline.
pub(crate) fn write_rows<W: Write>(
    stdout: &mut W,
    rows: &[TreeRow],
    format: ResolvedOutputFormat,
) -> Result<(), AppError> {
    match format {
        ResolvedOutputFormat::Human => stdout
            .write_all(render_text(rows).as_bytes())
            .map_err(AppError::WriteOutput),
        ResolvedOutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *stdout, rows).map_err(AppError::SerialiseRows)?;
            writeln!(stdout).map_err(AppError::WriteOutput)
        }
    }
}
