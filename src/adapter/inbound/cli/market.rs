//! Market data commands.

use serde_json::json;
use tabled::Tabled;

use super::command::{BookArgs, CandleArgs};
use super::output;
use crate::domain::{AggregatedBook, CandleRequest, PriceLevel, Product};
use crate::error::Result;
use crate::port::outbound::exchange::PublicExchange;

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "Product")]
    id: String,
    #[tabled(rename = "Symbol")]
    source_id: String,
    #[tabled(rename = "Min Price")]
    min: String,
    #[tabled(rename = "Max Price")]
    max: String,
    #[tabled(rename = "Tick")]
    tick: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        let show = |value: Option<rust_decimal::Decimal>| {
            value.map_or_else(|| "-".to_string(), |v| v.normalize().to_string())
        };
        Self {
            id: product.id.clone(),
            source_id: product.source_id.clone(),
            min: show(product.base_min_size),
            max: show(product.base_max_size),
            tick: show(product.quote_increment),
        }
    }
}

#[derive(Tabled)]
struct CandleRow {
    #[tabled(rename = "Open Time")]
    time: String,
    #[tabled(rename = "Open")]
    open: String,
    #[tabled(rename = "High")]
    high: String,
    #[tabled(rename = "Low")]
    low: String,
    #[tabled(rename = "Close")]
    close: String,
    #[tabled(rename = "Volume")]
    volume: String,
}

#[derive(Tabled)]
struct LevelRow {
    #[tabled(rename = "Side")]
    side: &'static str,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Size")]
    size: String,
}

impl LevelRow {
    fn new(side: &'static str, level: &PriceLevel) -> Self {
        Self {
            side,
            price: level.price().to_string(),
            size: level.total_size().to_string(),
        }
    }
}

/// Print the 24h ticker.
pub async fn ticker<E: PublicExchange>(exchange: &E, product_id: &str) -> Result<()> {
    let ticker = exchange.load_ticker(product_id).await?;
    if output::is_json() {
        return output::json_output(&ticker);
    }

    output::section(&ticker.product_id);
    output::field("Last", ticker.price);
    output::field("Bid", ticker.bid);
    output::field("Ask", ticker.ask);
    output::field("Volume", ticker.volume);
    output::field("Time", ticker.time.to_rfc3339());
    if let Some(trade_id) = ticker.trade_id {
        output::field("Trade", trade_id);
    }
    Ok(())
}

/// Print the top of the aggregated book.
pub async fn book<E: PublicExchange>(exchange: &E, args: &BookArgs) -> Result<()> {
    let book = exchange.load_orderbook(&args.product).await?;
    if output::is_json() {
        return output::json_output(&book_json(&book, args.levels));
    }

    output::section(&format!("{} order book", book.product_id()));
    let asks: Vec<_> = book.asks().take(args.levels).collect();
    let rows = asks
        .into_iter()
        .rev()
        .map(|level| LevelRow::new("ask", level))
        .chain(book.bids().take(args.levels).map(|level| LevelRow::new("bid", level)));
    output::table(rows);
    Ok(())
}

fn book_json(book: &AggregatedBook, levels: usize) -> serde_json::Value {
    json!({
        "product_id": book.product_id(),
        "sequence": book.sequence(),
        "bids": levels_json(book.bids(), levels),
        "asks": levels_json(book.asks(), levels),
    })
}

fn levels_json<'a>(
    levels: impl Iterator<Item = &'a PriceLevel>,
    count: usize,
) -> Vec<serde_json::Value> {
    levels
        .take(count)
        .map(|level| json!({ "price": level.price(), "size": level.total_size() }))
        .collect()
}

/// Print historical candles.
pub async fn candles<E: PublicExchange>(exchange: &E, args: &CandleArgs) -> Result<()> {
    let mut request = CandleRequest::new(&args.product, &args.interval);
    if let Some(limit) = args.limit {
        request = request.with_limit(limit);
    }
    if let Some(from) = args.from {
        request = request.with_from(from);
    }

    let candles = exchange.load_candles(&request).await?;
    if output::is_json() {
        return output::json_output(&candles);
    }

    output::section(&format!("{} {} candles", request.product_id, request.interval));
    output::table(candles.iter().map(|c| CandleRow {
        time: c.timestamp.to_rfc3339(),
        open: c.open.to_string(),
        high: c.high.to_string(),
        low: c.low.to_string(),
        close: c.close.to_string(),
        volume: c.volume.to_string(),
    }));
    Ok(())
}

/// Print every listed product.
pub async fn products<E: PublicExchange>(exchange: &E) -> Result<()> {
    let products = exchange.load_products().await?;
    if output::is_json() {
        return output::json_output(&products);
    }

    output::section(&format!("{} products", exchange.owner()));
    output::table(products.iter().map(ProductRow::from));
    output::note(&format!("{} listed", products.len()));
    Ok(())
}

/// Print the mid-market price.
pub async fn mid<E: PublicExchange>(exchange: &E, product_id: &str) -> Result<()> {
    let price = exchange.load_mid_market_price(product_id).await?;
    if output::is_json() {
        return output::json_output(&json!({ "product_id": product_id, "mid": price }));
    }

    output::field(product_id, price);
    Ok(())
}
