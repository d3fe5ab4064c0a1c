use clap::Args;
use stockroom_app::{config::AppConfig, context::AppContext, domain::products::models::NewProduct};

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    /// Product display name
    #[arg(long)]
    name: String,

    /// Optional description
    #[arg(long, default_value = "")]
    description: String,

    /// Price in minor currency units
    #[arg(long)]
    price: u64,

    /// Units in stock
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    quantity: i64,

    #[command(flatten)]
    app: AppConfig,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    let ctx = AppContext::from_config_for_writer(&args.app)
        .await
        .map_err(|error| format!("failed to initialise: {error}"))?;

    let product = ctx
        .products
        .create_product(NewProduct {
            name: args.name,
            description: args.description,
            price: args.price,
            initial_quantity: args.quantity,
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_id: {}", product.id);
    println!("name: {}", product.name);
    println!("quantity: {}", args.quantity);

    Ok(())
}
