use thiserror::Error;

use crate::domain::BookError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Expected, named non-success outcomes.
///
/// These are not vendor failures: the exchange answered correctly, but the
/// requested operation has nothing to act on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusinessCondition {
    #[error("no open orders to cancel for {product}")]
    NoOpenOrders { product: String },
}

#[derive(Error, Debug)]
pub enum Error {
    /// A signed call was requested but no API credentials are available.
    #[error("{operation}: no API credentials configured")]
    Authentication { operation: &'static str },

    /// The exchange rejected the request with a structured error body.
    #[error("{operation}: exchange error {code}: {message}")]
    Vendor {
        operation: &'static str,
        code: i64,
        message: String,
    },

    /// Network failure, timeout or an unreadable response.
    #[error("{operation}: transport error: {message}")]
    Transport {
        operation: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("{operation}: {condition}")]
    Business {
        operation: &'static str,
        condition: BusinessCondition,
    },

    /// Some cancellations of a fan-out completed before one failed.
    #[error("{operation}: {failed} cancellation(s) failed, {} completed: {source}", cancelled.len())]
    PartialCancellation {
        operation: &'static str,
        cancelled: Vec<String>,
        failed: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("{operation}: cannot parse {field} from {value:?}")]
    Parse {
        operation: &'static str,
        field: &'static str,
        value: String,
    },

    /// A vendor snapshot could not be assembled into a consistent book.
    #[error("{operation}: inconsistent order book: {source}")]
    Book {
        operation: &'static str,
        #[source]
        source: BookError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Name of the adapter operation that produced this error, if any.
    #[must_use]
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Authentication { operation }
            | Self::Vendor { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Business { operation, .. }
            | Self::PartialCancellation { operation, .. }
            | Self::Parse { operation, .. }
            | Self::Book { operation, .. } => Some(operation),
            Self::Config(_) | Self::Json(_) => None,
        }
    }

    /// Whether a caller may reasonably retry the failed call.
    ///
    /// Only transport failures qualify; vendor rejections and business
    /// conditions repeat deterministically.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub(crate) fn parse(operation: &'static str, field: &'static str, value: &str) -> Self {
        Self::Parse {
            operation,
            field,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_is_reported_for_adapter_errors() {
        let err = Error::Vendor {
            operation: "load_ticker",
            code: -1121,
            message: "Invalid symbol.".into(),
        };
        assert_eq!(err.operation(), Some("load_ticker"));
        assert_eq!(
            err.to_string(),
            "load_ticker: exchange error -1121: Invalid symbol."
        );
    }

    #[test]
    fn only_transport_errors_are_retryable() {
        let transport = Error::Transport {
            operation: "load_balances",
            status: None,
            message: "connection reset".into(),
        };
        let auth = Error::Authentication {
            operation: "place_order",
        };
        assert!(transport.is_retryable());
        assert!(!auth.is_retryable());
    }

    #[test]
    fn partial_cancellation_reports_counts_and_cause() {
        let err = Error::PartialCancellation {
            operation: "cancel_all_orders",
            cancelled: vec!["1".into(), "2".into()],
            failed: 1,
            source: Box::new(Error::Vendor {
                operation: "cancel_order",
                code: -2011,
                message: "Unknown order sent.".into(),
            }),
        };
        let text = err.to_string();
        assert!(text.contains("1 cancellation(s) failed, 2 completed"));
        assert!(text.contains("-2011"));
    }

    #[test]
    fn business_condition_names_the_product() {
        let err = Error::Business {
            operation: "cancel_all_orders",
            condition: BusinessCondition::NoOpenOrders {
                product: "BNB-BTC".into(),
            },
        };
        assert_eq!(
            err.to_string(),
            "cancel_all_orders: no open orders to cancel for BNB-BTC"
        );
    }

    #[test]
    fn book_errors_name_the_operation_and_are_final() {
        let err = Error::Book {
            operation: "load_orderbook",
            source: BookError::EmptyLevel,
        };
        assert_eq!(err.operation(), Some("load_orderbook"));
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "load_orderbook: inconsistent order book: level must hold at least one order"
        );
    }

    #[test]
    fn config_errors_have_no_operation() {
        let err = Error::from(ConfigError::MissingField { field: "api_url" });
        assert_eq!(err.operation(), None);
        assert_eq!(err.to_string(), "missing required field: api_url");
    }
}
