use clap::Args;
use stockroom_app::{config::AppConfig, context::AppContext, domain::products::models::ProductId};

#[derive(Debug, Args)]
pub(crate) struct GetInventoryArgs {
    #[arg(long)]
    product_id: ProductId,

    #[command(flatten)]
    app: AppConfig,
}

pub(crate) async fn run(args: GetInventoryArgs) -> Result<(), String> {
    let ctx = AppContext::from_config(&args.app)
        .await
        .map_err(|error| format!("failed to initialise: {error}"))?;

    let view = ctx
        .inventory
        .get_inventory(args.product_id)
        .await
        .map_err(|error| format!("failed to read inventory: {error}"))?;

    println!("product_id: {}", view.product_id);
    println!("quantity: {}", view.quantity);
    println!("updated_at: {}", view.updated_at);

    Ok(())
}
