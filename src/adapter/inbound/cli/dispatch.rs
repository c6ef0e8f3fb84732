//! Routes a parsed command to its handler.

use super::command::{Cli, Commands};
use super::{account, market};
use crate::error::Result;
use crate::port::outbound::exchange::AuthenticatedExchange;

/// Run one parsed command against `exchange`.
///
/// # Errors
///
/// Returns whatever error the underlying exchange operation produced.
pub async fn execute<E: AuthenticatedExchange>(cli: &Cli, exchange: &E) -> Result<()> {
    match &cli.command {
        Commands::Ticker(args) => market::ticker(exchange, &args.product).await,
        Commands::Book(args) => market::book(exchange, args).await,
        Commands::Candles(args) => market::candles(exchange, args).await,
        Commands::Products => market::products(exchange).await,
        Commands::Mid(args) => market::mid(exchange, &args.product).await,
        Commands::Balances => account::balances(exchange).await,
        Commands::Orders(args) => account::orders(exchange, args).await,
        Commands::Order(args) => account::order(exchange, args).await,
        Commands::Place(args) => account::place(exchange, args).await,
        Commands::Cancel(args) => account::cancel(exchange, args).await,
        Commands::CancelAll(args) => account::cancel_all(exchange, args).await,
    }
}
