use thiserror::Error;

use crate::types::Service;

/// Upper bound on how much of an upstream error body is kept.
const MAX_BODY_CHARS: usize = 512;

/// Outcome of a failed upstream call.
///
/// Keeps transport failures apart from requests the upstream answered but
/// refused, so callers can log the right thing without guessing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("{service} transport error: {message}")]
    Transport { service: Service, message: String },

    #[error("{service} rejected the request with status {status}: {body}")]
    Rejected {
        service: Service,
        status: u16,
        body: String,
    },

    #[error("{service} response could not be decoded: {message}")]
    Decode { service: Service, message: String },

    #[error("{service} returned an empty result")]
    Empty { service: Service },
}

impl UpstreamError {
    pub fn transport(service: Service, err: impl std::fmt::Display) -> Self {
        Self::Transport {
            service,
            message: err.to_string(),
        }
    }

    pub fn rejected(service: Service, status: u16, body: &str) -> Self {
        Self::Rejected {
            service,
            status,
            body: truncate(body),
        }
    }

    pub fn decode(service: Service, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            service,
            message: err.to_string(),
        }
    }

    pub fn service(&self) -> Service {
        match self {
            Self::Transport { service, .. }
            | Self::Rejected { service, .. }
            | Self::Decode { service, .. }
            | Self::Empty { service } => *service,
        }
    }
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_BODY_CHARS {
        return body.to_string();
    }
    let mut out: String = body.chars().take(MAX_BODY_CHARS).collect();
    out.push('…');
    out
}
