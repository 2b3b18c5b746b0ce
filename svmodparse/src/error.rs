//! Parse errors.

use compact_str::CompactString;
use std::path::PathBuf;

/// Errors raised while extracting and parsing modules.
///
/// Any of these aborts the parse of the enclosing module. The
/// `module` field names the module being parsed, or is empty when
/// the failure happened before the header was read.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A declaration, instance, header or assign statement is
    /// missing an expected delimiter or keyword.
    #[error("malformed statement `{statement}` in module `{module}`: {reason}")]
    MalformedDeclaration {
        module: CompactString,
        statement: String,
        reason: &'static str,
    },

    /// A sized bit literal like `4'b1010` could not be decoded.
    #[error("malformed literal `{literal}` in module `{module}`: {reason}")]
    MalformedLiteral {
        module: CompactString,
        literal: String,
        reason: &'static str,
    },

    /// Two distinct module bodies declare the same name.
    #[error("module `{name}` is declared more than once")]
    DuplicateModuleName {
        name: CompactString,
    },

    /// A module header without a matching `endmodule`.
    #[error("module starting with `{header}` has no endmodule")]
    UnterminatedModule {
        header: String,
    },

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ParseError {
    /// Fills in the module name on errors raised by helpers that
    /// only see a single statement.
    pub(crate) fn in_module(mut self, name: &str) -> Self {
        use ParseError::*;
        match &mut self {
            MalformedDeclaration { module, .. } |
            MalformedLiteral { module, .. } if module.is_empty() => {
                *module = name.into();
            }
            _ => {}
        }
        self
    }
}
