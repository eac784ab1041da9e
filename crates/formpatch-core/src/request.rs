//! What the network collaborator receives.

use crate::patch::FormPatch;

pub const SPARQL_UPDATE_CONTENT_TYPE: &str = "application/sparql-update";

/// Optional conditional-request guard chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    IfUnmodifiedSince(String),
    IfMatch(String),
}

impl Precondition {
    pub fn header_name(&self) -> &'static str {
        match self {
            Self::IfUnmodifiedSince(_) => "If-Unmodified-Since",
            Self::IfMatch(_) => "If-Match",
        }
    }

    pub fn header_value(&self) -> &str {
        match self {
            Self::IfUnmodifiedSince(value) | Self::IfMatch(value) => value,
        }
    }
}

/// A PATCH/POST body ready to send to the resource URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub body: String,
    pub precondition: Option<Precondition>,
    /// True when the body is the no-op update; senders may skip it.
    pub is_noop: bool,
}

impl UpdateRequest {
    pub fn from_patch(patch: &FormPatch, precondition: Option<Precondition>) -> Self {
        Self {
            body: patch.to_sparql_update(),
            precondition,
            is_noop: patch.is_noop(),
        }
    }

    pub fn content_type(&self) -> &'static str {
        SPARQL_UPDATE_CONTENT_TYPE
    }

    /// Headers besides `Content-Type` the request must carry.
    pub fn headers(&self) -> Vec<(&'static str, &str)> {
        self.precondition
            .iter()
            .map(|p| (p.header_name(), p.header_value()))
            .collect()
    }
}
