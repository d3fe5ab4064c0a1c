use clap::{Args, Subcommand};

mod get;
mod reserve;

#[derive(Debug, Args)]
pub(crate) struct InventoryCommand {
    #[command(subcommand)]
    command: InventorySubcommand,
}

#[derive(Debug, Subcommand)]
enum InventorySubcommand {
    /// Show the current stock of a product
    Get(get::GetInventoryArgs),

    /// Take units of a product out of stock
    Reserve(reserve::ReserveInventoryArgs),
}

pub(crate) async fn run(command: InventoryCommand) -> Result<(), String> {
    match command.command {
        InventorySubcommand::Get(args) => get::run(args).await,
        InventorySubcommand::Reserve(args) => reserve::run(args).await,
    }
}
