//! Errors raised by the settings and high-score files

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum PersistError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Parse {
        path: PathBuf,
        /// 1-based
        line: usize,
        reason: String,
    },
}

impl PersistError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Parse { path, line, reason } => {
                write!(f, "{}:{line}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_names_file_and_line() {
        let err = PersistError::parse("/tmp/scores", 4, "score is not a number");
        assert_eq!(err.to_string(), "/tmp/scores:4: score is not a number");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = PersistError::io("/tmp/config", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(err.source().is_some());
        assert_eq!(err.path(), &PathBuf::from("/tmp/config"));
    }
}
