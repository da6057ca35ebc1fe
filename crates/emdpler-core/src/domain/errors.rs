use std::path::PathBuf;

pub type EmdplerResult<T> = Result<T, EmdplerError>;

/// Stable failure classes with the exit codes the CLI reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Input,
    Io,
    Computation,
    Internal,
}

impl ErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Input => 2,
            Self::Io => 3,
            Self::Computation => 4,
            Self::Internal => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "INPUT",
            Self::Io => "IO",
            Self::Computation => "RUN",
            Self::Internal => "SYS",
        }
    }
}

/// One variant per distinguishable failure; callers never receive a partial
/// result alongside any of these.
#[derive(Debug, thiserror::Error)]
pub enum EmdplerError {
    #[error("value {value} does not fit a {width}.{decimals} fixed field")]
    FieldOverflow {
        value: f64,
        width: usize,
        decimals: usize,
    },
    #[error("required input field '{name}' is missing or incomplete")]
    MissingField { name: String },
    #[error("malformed row in '{path}' at line {line}: {detail}")]
    MalformedRow {
        path: PathBuf,
        line: usize,
        detail: String,
    },
    #[error("result tables are inconsistent: {detail}")]
    TableMismatch { detail: String },
    #[error("external solver failure: {detail}")]
    ExternalProcess { detail: String },
    #[error("i/o failure at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EmdplerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn external(detail: impl Into<String>) -> Self {
        Self::ExternalProcess {
            detail: detail.into(),
        }
    }

    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::FieldOverflow { .. } | Self::MissingField { .. } => ErrorCategory::Input,
            Self::MalformedRow { .. } | Self::TableMismatch { .. } | Self::ExternalProcess { .. } => {
                ErrorCategory::Computation
            }
            Self::Io { .. } => ErrorCategory::Io,
        }
    }

    pub const fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.category().as_str(), self)
    }
}
