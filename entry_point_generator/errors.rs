////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2019 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("xml: {0}")]
    Xml(#[from] xml::reader::Error),
    #[error("serde_json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed description `{source_name}`: {reason}")]
    MalformedDescription { source_name: String, reason: String },
    #[error("`{ty}` is not a known type in the format table (parameter `{param}` of `{command}`)")]
    UnknownFormatType {
        command: String,
        param: String,
        ty: String,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedDescription {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

/// A command requested by a scope after an earlier scope already claimed it.
///
/// Not fatal: the later scope renders a "previously defined" comment instead of a second
/// definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCommandWarning {
    pub command: String,
    pub scope: String,
    pub claimed_by: String,
}

impl fmt::Display for DuplicateCommandWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} requested by {} was already defined by {}",
            self.command, self.scope, self.claimed_by
        )
    }
}
