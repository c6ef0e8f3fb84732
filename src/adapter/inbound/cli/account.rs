//! Account and order commands. All of them need credentials.

use serde_json::json;
use tabled::Tabled;

use super::command::{OrderRefArgs, OrdersArgs, PlaceArgs};
use super::output;
use crate::domain::{Balances, LiveOrder, PlaceOrder};
use crate::error::Result;
use crate::port::outbound::exchange::AuthenticatedExchange;

#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "Scope")]
    scope: String,
    #[tabled(rename = "Currency")]
    currency: String,
    #[tabled(rename = "Available")]
    available: String,
    #[tabled(rename = "Locked")]
    locked: String,
}

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Side")]
    side: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Time")]
    time: String,
}

impl From<&LiveOrder> for OrderRow {
    fn from(order: &LiveOrder) -> Self {
        Self {
            id: order.id.clone().unwrap_or_else(|| "-".to_string()),
            product: order.product_id.clone(),
            side: order.side.to_string(),
            price: order.price.to_string(),
            size: order.size.to_string(),
            status: order.status.clone(),
            time: order.time.to_rfc3339(),
        }
    }
}

/// Flatten balances into rows sorted by scope and currency, skipping empty
/// currencies.
fn balance_rows(balances: &Balances) -> Vec<BalanceRow> {
    let mut rows: Vec<BalanceRow> = balances
        .iter()
        .flat_map(|(scope, currencies)| {
            currencies
                .iter()
                .filter(|(_, b)| !b.available.is_zero() || !b.balance.is_zero())
                .map(move |(currency, b)| BalanceRow {
                    scope: scope.clone(),
                    currency: currency.clone(),
                    available: b.available.to_string(),
                    locked: b.balance.to_string(),
                })
        })
        .collect();
    rows.sort_by(|a, b| (&a.scope, &a.currency).cmp(&(&b.scope, &b.currency)));
    rows
}

/// Print account balances.
pub async fn balances<E: AuthenticatedExchange>(exchange: &E) -> Result<()> {
    let balances = exchange.load_balances().await?;
    if output::is_json() {
        return output::json_output(&balances);
    }

    output::section("Balances");
    let rows = balance_rows(&balances);
    if rows.is_empty() {
        output::note("no funds");
        return Ok(());
    }
    output::table(rows);
    Ok(())
}

/// Print order history for a product, or every open order.
pub async fn orders<E: AuthenticatedExchange>(exchange: &E, args: &OrdersArgs) -> Result<()> {
    let orders = exchange.load_all_orders(args.product.as_deref()).await?;
    if output::is_json() {
        return output::json_output(&orders);
    }

    match &args.product {
        Some(product) => output::section(&format!("{product} orders")),
        None => output::section("Open orders"),
    }
    output::table(orders.iter().map(OrderRow::from));
    Ok(())
}

/// Print one order.
pub async fn order<E: AuthenticatedExchange>(exchange: &E, args: &OrderRefArgs) -> Result<()> {
    let order = exchange.load_order(&args.id, &args.product).await?;
    print_order(&order)
}

/// Submit an order and print the acknowledgement.
pub async fn place<E: AuthenticatedExchange>(exchange: &E, args: &PlaceArgs) -> Result<()> {
    let mut request = match (args.market, args.price) {
        (false, Some(price)) => PlaceOrder::limit(&args.product, args.side.into(), args.size, price),
        _ => PlaceOrder::market(&args.product, args.side.into(), args.size),
    };
    if let Some(client_id) = &args.client_id {
        request = request.with_client_order_id(client_id);
    }

    let order = exchange.place_order(&request).await?;
    output::success("order accepted");
    print_order(&order)
}

/// Cancel one order.
pub async fn cancel<E: AuthenticatedExchange>(exchange: &E, args: &OrderRefArgs) -> Result<()> {
    let id = exchange.cancel_order(&args.id, &args.product).await?;
    if output::is_json() {
        return output::json_output(&json!({ "cancelled": [id] }));
    }

    output::success(&format!("cancelled {id}"));
    Ok(())
}

/// Cancel every open order.
pub async fn cancel_all<E: AuthenticatedExchange>(exchange: &E, args: &OrdersArgs) -> Result<()> {
    let ids = exchange.cancel_all_orders(args.product.as_deref()).await?;
    if output::is_json() {
        return output::json_output(&json!({ "cancelled": ids }));
    }

    for id in &ids {
        output::field("cancelled", id);
    }
    output::success(&format!("{} order(s) cancelled", ids.len()));
    Ok(())
}

fn print_order(order: &LiveOrder) -> Result<()> {
    if output::is_json() {
        return output::json_output(order);
    }
    output::table([OrderRow::from(order)]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Balance;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    #[test]
    fn balance_rows_skip_empty_currencies_and_sort() {
        let mut currencies = HashMap::new();
        currencies.insert(
            "LTC".to_string(),
            Balance {
                available: dec!(4.5),
                balance: dec!(0),
            },
        );
        currencies.insert(
            "BTC".to_string(),
            Balance {
                available: dec!(0.1),
                balance: dec!(0.2),
            },
        );
        currencies.insert(
            "XRP".to_string(),
            Balance {
                available: dec!(0),
                balance: dec!(0),
            },
        );
        let balances = HashMap::from([("USER".to_string(), currencies)]);

        let rows = balance_rows(&balances);
        let names: Vec<_> = rows.iter().map(|r| r.currency.as_str()).collect();
        assert_eq!(names, ["BTC", "LTC"]);
        assert_eq!(rows[0].locked, "0.2");
    }

    #[test]
    fn order_row_marks_missing_id() {
        let order = LiveOrder {
            product_id: "BTC-USDT".into(),
            id: None,
            price: dec!(0),
            side: crate::domain::Side::Buy,
            size: dec!(1),
            status: "NEW".into(),
            time: chrono::DateTime::from_timestamp_millis(0).unwrap(),
            extra: Default::default(),
        };
        let row = OrderRow::from(&order);
        assert_eq!(row.id, "-");
        assert_eq!(row.side, "buy");
    }
}
