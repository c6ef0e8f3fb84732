#![cfg(feature = "integration-tests")]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use coinbridge::adapter::outbound::binance::{BinanceExchange, BinanceOptions, RestTransport};
use coinbridge::port::outbound::exchange::PublicExchange;
use tokio::time::timeout;

fn smoke_enabled() -> bool {
    matches!(env::var("COINBRIDGE_SMOKE").ok().as_deref(), Some("1"))
}

fn exchange() -> (String, BinanceExchange<RestTransport>) {
    let base_url =
        env::var("BINANCE_API_URL").unwrap_or_else(|_| "https://api.binance.com".to_string());
    let transport = RestTransport::new(base_url.clone());
    let exchange = BinanceExchange::new(Arc::new(transport), None, &BinanceOptions::default());
    (base_url, exchange)
}

#[tokio::test]
#[ignore = "requires COINBRIDGE_SMOKE=1 and network access"]
async fn smoke_binance_ticker_readonly() {
    if !smoke_enabled() {
        eprintln!("Skipping smoke test (set COINBRIDGE_SMOKE=1 to enable)");
        return;
    }

    let (base_url, exchange) = exchange();
    let ticker = timeout(Duration::from_secs(20), exchange.load_ticker("ETH-BTC"))
        .await
        .expect("Timed out querying the ticker endpoint")
        .expect("Failed to fetch ticker");

    assert_eq!(ticker.product_id, "ETH-BTC");
    assert!(
        ticker.bid <= ticker.ask,
        "Expected bid <= ask from {base_url}, got {} / {}",
        ticker.bid,
        ticker.ask
    );
}

#[tokio::test]
#[ignore = "requires COINBRIDGE_SMOKE=1 and network access"]
async fn smoke_binance_orderbook_readonly() {
    if !smoke_enabled() {
        eprintln!("Skipping smoke test (set COINBRIDGE_SMOKE=1 to enable)");
        return;
    }

    let (base_url, exchange) = exchange();
    let book = timeout(Duration::from_secs(20), exchange.load_orderbook("ETH-BTC"))
        .await
        .expect("Timed out querying the depth endpoint")
        .expect("Failed to fetch order book");

    assert!(!book.is_empty(), "Expected a non-empty book from {base_url}");
    let (bid, ask) = (book.best_bid().unwrap(), book.best_ask().unwrap());
    assert!(bid.price() < ask.price());
}
