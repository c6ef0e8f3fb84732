//! Classification of raw transport outcomes.
//!
//! Binance rejects requests with a non-2xx status and a `{"code", "msg"}`
//! body. Those become [`Error::Vendor`]. Anything else that went wrong
//! (no response, an unstructured body, a 2xx body that failed to decode) is
//! a transport failure.

use serde::Deserialize;

use super::transport::RawFailure;
use crate::error::{Error, Result};

/// Outcome of a single vendor call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Ok,
    Vendor { code: i64, message: String },
    Transport(RawFailure),
}

#[derive(Deserialize)]
struct VendorErrorBody {
    code: i64,
    msg: String,
}

/// Classify a transport outcome. `None` means the call succeeded.
#[must_use]
pub fn classify(failure: Option<&RawFailure>) -> Classification {
    let Some(failure) = failure else {
        return Classification::Ok;
    };

    let structured = match (failure.status, failure.body.as_deref()) {
        (Some(status), Some(body)) if !(200..300).contains(&status) => {
            serde_json::from_str::<VendorErrorBody>(body).ok()
        }
        _ => None,
    };

    match structured {
        Some(body) => Classification::Vendor {
            code: body.code,
            message: body.msg,
        },
        None => Classification::Transport(failure.clone()),
    }
}

impl Classification {
    /// Convert to a crate result tagged with the failing operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Vendor`] or [`Error::Transport`] for the matching
    /// classification.
    pub fn into_result(self, operation: &'static str) -> Result<()> {
        match self {
            Self::Ok => Ok(()),
            Self::Vendor { code, message } => Err(Error::Vendor {
                operation,
                code,
                message,
            }),
            Self::Transport(failure) => Err(Error::Transport {
                operation,
                status: failure.status,
                message: failure.message,
            }),
        }
    }
}

/// Attach classification to raw transport results.
pub trait Classified<T> {
    /// # Errors
    ///
    /// Returns the classified error when the transport call failed.
    fn classified(self, operation: &'static str) -> Result<T>;
}

impl<T> Classified<T> for std::result::Result<T, RawFailure> {
    fn classified(self, operation: &'static str) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(failure) => {
                let classification = classify(Some(&failure));
                tracing::debug!(operation, %failure, ?classification, "Vendor call failed");
                match classification.into_result(operation) {
                    Err(err) => Err(err),
                    // A present failure never classifies as success.
                    Ok(()) => Err(Error::Transport {
                        operation,
                        status: failure.status,
                        message: failure.message,
                    }),
                }
            }
        }
    }
}
