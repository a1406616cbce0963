//! External page rasterization.
//!
//! The default rasterizer pipes the document through poppler and
//! ImageMagick:
//!
//! ```text
//! pdftoppm -f <page> -l <page> - | convert -resize <width> - <format>:-
//! ```
//!
//! The document is written to the pipeline's stdin and the image is read
//! back from its stdout.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::error::{Result, ThumbnailError};

/// Renders one page of a document to image bytes.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, document: &[u8], page: u32, width: u32, format: &str) -> Result<Vec<u8>>;
}

/// Program names used by [`ShellRasterizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterizerPrograms {
    pub shell: String,
    pub pdftoppm: String,
    pub convert: String,
}

impl Default for RasterizerPrograms {
    fn default() -> Self {
        Self {
            shell: "/bin/sh".to_string(),
            pdftoppm: "pdftoppm".to_string(),
            convert: "convert".to_string(),
        }
    }
}

/// Runs the `pdftoppm | convert` pipeline through a shell.
#[derive(Debug, Clone, Default)]
pub struct ShellRasterizer {
    programs: RasterizerPrograms,
}

impl ShellRasterizer {
    pub fn new(programs: RasterizerPrograms) -> Self {
        Self { programs }
    }

    /// Shell command line for one page.
    pub fn command_line(&self, page: u32, width: u32, format: &str) -> String {
        format!(
            "{pdftoppm} -f {page} -l {page} - | {convert} -resize {width} - {format}:-",
            pdftoppm = self.programs.pdftoppm,
            convert = self.programs.convert,
        )
    }
}

impl Rasterizer for ShellRasterizer {
    fn rasterize(&self, document: &[u8], page: u32, width: u32, format: &str) -> Result<Vec<u8>> {
        let command_line = self.command_line(page, width, format);
        debug!(command = %command_line, "running rasterizer");
        let mut child = Command::new(&self.programs.shell)
            .arg("-c")
            .arg(&command_line)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|error| ThumbnailError::Rasterize {
                message: format!("failed to start {}: {error}", self.programs.shell),
            })?;
        let mut stdin = child.stdin.take().ok_or_else(|| ThumbnailError::Rasterize {
            message: "rasterizer stdin unavailable".to_string(),
        })?;

        // Feed stdin from a second thread so a full stdout pipe cannot deadlock us.
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(document));
            let output = child.wait_with_output();
            (output, writer.join())
        });
        let output = output.map_err(|error| ThumbnailError::Rasterize {
            message: error.to_string(),
        })?;
        match written {
            Ok(Ok(())) => {}
            Ok(Err(error)) => debug!(%error, "rasterizer closed stdin early"),
            Err(_) => warn!("rasterizer stdin writer panicked"),
        }

        for line in String::from_utf8_lossy(&output.stderr).lines() {
            if !line.trim().is_empty() {
                warn!(target: "entities_thumbs::rasterizer", "{line}");
            }
        }
        if !output.status.success() {
            return Err(ThumbnailError::Rasterize {
                message: format!("`{command_line}` exited with {}", output.status),
            });
        }
        if output.stdout.is_empty() {
            return Err(ThumbnailError::EmptyOutput);
        }
        Ok(output.stdout)
    }
}
