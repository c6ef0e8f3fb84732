//! Server clock synchronization ahead of signed calls.
//!
//! Binance rejects signed requests whose timestamp falls outside
//! `recvWindow` of its own clock. Depending on configuration the adapter
//! either trusts the local clock, synchronizes once before the first signed
//! call, or synchronizes before every signed call.

use std::future::Future;

use tokio::sync::OnceCell;
use tracing::debug;

use super::classify::Classified;
use super::settings::BinanceOptions;
use super::transport::VendorTransport;
use crate::error::Result;

/// When the server-time handshake runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerTimeMode {
    /// Never; sign with the local clock.
    Local,
    /// Before the first signed call only.
    Once,
    /// Before every signed call.
    Always,
}

impl ServerTimeMode {
    /// `always_use_server_time` takes precedence over `use_server_time`.
    #[must_use]
    pub const fn from_options(options: &BinanceOptions) -> Self {
        if options.always_use_server_time {
            Self::Always
        } else if options.use_server_time {
            Self::Once
        } else {
            Self::Local
        }
    }
}

/// Runs the handshake required by its mode before a signed call.
#[derive(Debug)]
pub struct ServerTime {
    mode: ServerTimeMode,
    synced: OnceCell<i64>,
}

impl ServerTime {
    #[must_use]
    pub fn new(mode: ServerTimeMode) -> Self {
        Self {
            mode,
            synced: OnceCell::new(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ServerTimeMode {
        self.mode
    }

    /// Run `call` after the handshake its mode requires.
    ///
    /// A failed handshake aborts the call; `call` is never started. In
    /// `Once` mode a failed handshake is retried on the next call.
    ///
    /// # Errors
    ///
    /// Returns the classified handshake failure, or whatever `call` returns.
    pub async fn run<V, F, Fut, T>(
        &self,
        transport: &V,
        operation: &'static str,
        call: F,
    ) -> Result<T>
    where
        V: VendorTransport + ?Sized,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        match self.mode {
            ServerTimeMode::Local => {}
            ServerTimeMode::Once => {
                self.synced
                    .get_or_try_init(|| Self::handshake(transport, operation))
                    .await?;
            }
            ServerTimeMode::Always => {
                Self::handshake(transport, operation).await?;
            }
        }
        call().await
    }

    async fn handshake<V: VendorTransport + ?Sized>(
        transport: &V,
        operation: &'static str,
    ) -> Result<i64> {
        let offset = transport.sync_server_time().await.classified(operation)?;
        debug!(operation, offset_ms = offset, "Synchronized with server time");
        Ok(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::binance::transport::RawFailure;
    use crate::error::Error;
    use crate::testkit::{ScriptedTransport, TransportMethod};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    async fn signed_call(
        time: &ServerTime,
        transport: &ScriptedTransport,
        calls: &Arc<AtomicU32>,
    ) -> Result<u32> {
        let calls = Arc::clone(calls);
        time.run(transport, "load_balances", move || async move {
            Ok(calls.fetch_add(1, Ordering::SeqCst) + 1)
        })
        .await
    }

    #[test]
    fn mode_follows_options() {
        let mut options = BinanceOptions::default();
        assert_eq!(ServerTimeMode::from_options(&options), ServerTimeMode::Local);
        options.use_server_time = true;
        assert_eq!(ServerTimeMode::from_options(&options), ServerTimeMode::Once);
        options.always_use_server_time = true;
        assert_eq!(ServerTimeMode::from_options(&options), ServerTimeMode::Always);
    }

    #[tokio::test]
    async fn local_mode_never_syncs() {
        let transport = ScriptedTransport::new();
        let time = ServerTime::new(ServerTimeMode::Local);
        let calls = Arc::new(AtomicU32::new(0));

        signed_call(&time, &transport, &calls).await.unwrap();
        signed_call(&time, &transport, &calls).await.unwrap();

        assert_eq!(transport.calls_to(TransportMethod::ServerTime), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn once_mode_syncs_before_first_call_only() {
        let transport = ScriptedTransport::new();
        let time = ServerTime::new(ServerTimeMode::Once);
        let calls = Arc::new(AtomicU32::new(0));

        for _ in 0..3 {
            signed_call(&time, &transport, &calls).await.unwrap();
        }

        assert_eq!(transport.calls_to(TransportMethod::ServerTime), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn always_mode_syncs_before_every_call() {
        let transport = ScriptedTransport::new();
        let time = ServerTime::new(ServerTimeMode::Always);
        let calls = Arc::new(AtomicU32::new(0));

        for _ in 0..3 {
            signed_call(&time, &transport, &calls).await.unwrap();
        }

        assert_eq!(transport.calls_to(TransportMethod::ServerTime), 3);
    }

    #[tokio::test]
    async fn failed_handshake_skips_the_call() {
        let transport = ScriptedTransport::new();
        transport.fail_next(TransportMethod::ServerTime, RawFailure::network("timed out"));
        let time = ServerTime::new(ServerTimeMode::Once);
        let calls = Arc::new(AtomicU32::new(0));

        let err = signed_call(&time, &transport, &calls).await.unwrap_err();
        assert!(matches!(err, Error::Transport { operation: "load_balances", .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // Once mode retries the handshake after a failure.
        signed_call(&time, &transport, &calls).await.unwrap();
        assert_eq!(transport.calls_to(TransportMethod::ServerTime), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
