use clap::Args;
use stockroom_app::{
    config::AppConfig,
    context::AppContext,
    domain::{inventory::models::Reservation, products::models::ProductId},
};

#[derive(Debug, Args)]
pub(crate) struct ReserveInventoryArgs {
    #[arg(long)]
    product_id: ProductId,

    #[arg(long, allow_negative_numbers = true)]
    quantity: i64,

    #[command(flatten)]
    app: AppConfig,
}

pub(crate) async fn run(args: ReserveInventoryArgs) -> Result<(), String> {
    let ctx = AppContext::from_config_for_writer(&args.app)
        .await
        .map_err(|error| format!("failed to initialise: {error}"))?;

    let outcome = ctx
        .inventory
        .reserve_inventory(args.product_id, args.quantity)
        .await
        .map_err(|error| format!("failed to reserve inventory: {error}"))?;

    match outcome {
        Reservation::Reserved {
            product_id,
            reserved,
            remaining,
        } => {
            println!("product_id: {product_id}");
            println!("reserved: {reserved}");
            println!("remaining: {remaining}");

            Ok(())
        }
        Reservation::InsufficientStock {
            requested,
            available,
            ..
        } => Err(format!(
            "insufficient stock: requested {requested}, available {available}"
        )),
    }
}
