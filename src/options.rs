//! Probe options

/// How a path is turned into a byte source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// Positioned reads through a locked file handle
    #[default]
    File,
    /// Memory-mapped view of the whole file
    Mmap,
}

/// How results are reported by the command-line front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// `path: FORMAT WxH`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Options for probing files on disk
#[derive(Debug, Clone, Default)]
pub struct ProbeOptions {
    /// Byte source used for each path
    pub source: SourceKind,
    /// Report format
    pub output: OutputMode,
}

impl ProbeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads through a memory map instead of file reads
    pub fn with_mmap(mut self) -> Self {
        self.source = SourceKind::Mmap;
        self
    }

    /// Sets the output mode
    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }
}
