//! Errors produced by the OBJ loader.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Which list a face index refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IndexKind {
    Vertex,
    Normal,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IndexKind::Vertex => "vertex",
            IndexKind::Normal => "normal",
        })
    }
}

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("OBJ file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("I/O error reading OBJ{}{}: {source}", display_path(.path), display_line(.line))]
    Io {
        path: Option<PathBuf>,
        line: Option<usize>,
        #[source]
        source: io::Error,
    },

    #[error("Malformed '{keyword}' record on line {line}: {reason}")]
    MalformedRecord {
        line: usize,
        keyword: String,
        reason: String,
    },

    #[error("Face {kind} index {index} on line {line} is out of range ({available} declared so far)")]
    IndexOutOfRange {
        line: usize,
        kind: IndexKind,
        index: i64,
        available: usize,
    },

    #[error("Too many vertices in OBJ ({count} > {})", u32::MAX)]
    TooManyVertices { count: usize },

    #[error("OBJ contained no drawable geometry ({vertices} vertices, {triangles} triangles)")]
    NoGeometry { vertices: usize, triangles: usize },
}

impl ObjError {
    /// 1-based line number of the offending record, when the error has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ObjError::Io { line, .. } => *line,
            ObjError::MalformedRecord { line, .. } | ObjError::IndexOutOfRange { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }

    pub(crate) fn malformed(line: usize, keyword: &str, reason: impl Into<String>) -> Self {
        ObjError::MalformedRecord {
            line,
            keyword: keyword.to_owned(),
            reason: reason.into(),
        }
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

fn display_line(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_line_and_kind() {
        let err = ObjError::IndexOutOfRange {
            line: 7,
            kind: IndexKind::Normal,
            index: 12,
            available: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("normal index 12"));
        assert!(msg.contains("line 7"));
        assert_eq!(err.line(), Some(7));
    }

    #[test]
    fn io_message_without_location() {
        let err = ObjError::Io {
            path: None,
            line: None,
            source: io::Error::other("boom"),
        };
        assert_eq!(err.to_string(), "I/O error reading OBJ: boom");
        assert_eq!(err.line(), None);
    }
}
