//! Progress of a conversion run, recorded as typed steps.

use std::fmt;
use std::path::PathBuf;

/// One completed stage of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Configuration file read and validated.
    ConfigLoaded {
        /// Path of the configuration file.
        path: PathBuf,
    },
    /// Specification fetched and parsed.
    SpecLoaded {
        /// Where the spec came from.
        source: String,
        /// `info.title`.
        title: String,
        /// `info.version`.
        version: String,
    },
    /// Collection assembled.
    Converted {
        /// Number of request items.
        endpoints: usize,
        /// Number of folders.
        groups: usize,
    },
    /// Environments generated.
    EnvironmentsGenerated {
        /// Environment names.
        names: Vec<String>,
    },
    /// An output file was written.
    FileWritten {
        /// Path of the file.
        path: PathBuf,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigLoaded { path } => {
                write!(f, "loaded configuration from {}", path.display())
            }
            Self::SpecLoaded {
                source,
                title,
                version,
            } => write!(f, "loaded '{title}' version {version} from {source}"),
            Self::Converted { endpoints, groups } => {
                write!(f, "converted {endpoints} endpoints in {groups} folders")
            }
            Self::EnvironmentsGenerated { names } => {
                write!(f, "generated {} environments: {}", names.len(), names.join(", "))
            }
            Self::FileWritten { path } => write!(f, "wrote {}", path.display()),
        }
    }
}

/// Steps of one run, in completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    steps: Vec<Step>,
}

impl Report {
    /// An empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed step.
    pub fn record(&mut self, step: Step) {
        tracing::info!("{step}");
        self.steps.push(step);
    }

    /// Recorded steps, oldest first.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Paths of every written file.
    pub fn written_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.steps.iter().filter_map(|step| match step {
            Step::FileWritten { path } => Some(path),
            _ => None,
        })
    }
}
