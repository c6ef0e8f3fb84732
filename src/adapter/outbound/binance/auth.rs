//! Credential gate for signed calls.

use super::settings::AuthConfig;
use super::transport::VendorTransport;
use crate::error::{Error, Result};

/// Resolve credentials for a signed call.
///
/// Configured credentials win; otherwise the transport's own are used.
/// Incomplete key pairs count as absent. This never touches the network.
///
/// # Errors
///
/// Returns [`Error::Authentication`] when neither source has a complete key
/// pair.
pub fn ensure_authenticated<V: VendorTransport + ?Sized>(
    configured: Option<&AuthConfig>,
    transport: &V,
    operation: &'static str,
) -> Result<AuthConfig> {
    configured
        .filter(|auth| auth.is_complete())
        .cloned()
        .or_else(|| transport.credentials().filter(AuthConfig::is_complete))
        .ok_or_else(|| {
            tracing::warn!(operation, "Signed call attempted without credentials");
            Error::Authentication { operation }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::ScriptedTransport;

    #[test]
    fn configured_credentials_are_used() {
        let transport = ScriptedTransport::new();
        let auth = AuthConfig::new("key", "secret");
        let resolved = ensure_authenticated(Some(&auth), &transport, "load_balances").unwrap();
        assert_eq!(resolved, auth);
    }

    #[test]
    fn transport_credentials_are_the_fallback() {
        let transport = ScriptedTransport::new().with_credentials(AuthConfig::new("k", "s"));
        let resolved = ensure_authenticated(None, &transport, "load_balances").unwrap();
        assert_eq!(resolved.key, "k");
    }

    #[test]
    fn missing_credentials_fail_without_calls() {
        let transport = ScriptedTransport::new();
        let err = ensure_authenticated(None, &transport, "place_order").unwrap_err();
        assert!(matches!(err, Error::Authentication { operation: "place_order" }));
        assert_eq!(transport.total_calls(), 0);
    }

    #[test]
    fn blank_credentials_count_as_missing() {
        let transport = ScriptedTransport::new().with_credentials(AuthConfig::new("", ""));
        let auth = AuthConfig::new("key", " ");
        let err = ensure_authenticated(Some(&auth), &transport, "cancel_order").unwrap_err();
        assert!(matches!(err, Error::Authentication { .. }));
    }
}
