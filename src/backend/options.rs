//! Compilation options consumed by the back-end
//!
//! Options are handed to the orchestrator when it is constructed; nothing in the back-end reads process-wide state.

use chrono::{Local, NaiveDateTime};
use zfx_core::conventions;

use super::code_builder::DEFAULT_INDENT_WIDTH;

/// `ctime(3)` layout used in generated banners.
const BANNER_TIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Back-end configuration
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Tool name written into the generated banner
    pub exe_name: String,
    /// Source file the artifacts are generated from
    pub source_file: String,
    /// License footer text (omitted when `None`)
    pub license: Option<String>,
    /// Number of spaces per indentation level in the generated C
    pub indent_width: usize,
    /// Fixed banner timestamp; the wall clock is used when `None`
    pub timestamp: Option<NaiveDateTime>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            exe_name: conventions::TOOL_NAME.to_string(),
            source_file: String::from("<stdin>"),
            license: None,
            indent_width: DEFAULT_INDENT_WIDTH,
            timestamp: None,
        }
    }
}

impl CompileOptions {
    /// Create options for the given source file
    pub fn new(source_file: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            ..Self::default()
        }
    }

    /// Set the tool name
    pub fn with_exe_name(mut self, name: impl Into<String>) -> Self {
        self.exe_name = name.into();
        self
    }

    /// Set the license footer
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Pin the banner timestamp (reproducible output)
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Banner timestamp, formatted like `ctime(3)` without the trailing newline.
    pub fn banner_timestamp(&self) -> String {
        let ts = self.timestamp.unwrap_or_else(|| Local::now().naive_local());
        ts.format(BANNER_TIME_FORMAT).to_string()
    }
}
