use clap::{Parser, Subcommand};

mod db;
mod inventory;
mod product;

#[derive(Debug, Parser)]
#[command(name = "stockroom-app", about = "Stockroom CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Product(product::ProductCommand),
    Inventory(inventory::InventoryCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Product(command) => product::run(command).await,
            Commands::Inventory(command) => inventory::run(command).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn reserve_parses_product_and_quantity() {
        let cli = Cli::try_parse_from([
            "stockroom-app",
            "inventory",
            "reserve",
            "--database-url",
            "postgres://localhost/stockroom",
            "--product-id",
            "7",
            "--quantity",
            "2",
        ]);

        assert!(cli.is_ok(), "failed to parse: {cli:?}");
    }

    #[test]
    fn non_positive_product_id_is_rejected_by_the_parser() {
        let cli = Cli::try_parse_from([
            "stockroom-app",
            "inventory",
            "get",
            "--database-url",
            "postgres://localhost/stockroom",
            "--product-id",
            "0",
        ]);

        assert!(cli.is_err());
    }

    #[tokio::test]
    async fn stock_changes_refuse_the_memory_cache() -> TestResult {
        for command in [
            vec!["inventory", "reserve", "--product-id", "7", "--quantity", "2"],
            vec!["product", "create", "--name", "Widget", "--price", "100"],
        ] {
            let args = ["stockroom-app"]
                .into_iter()
                .chain(command)
                .chain([
                    "--database-url",
                    "postgres://127.0.0.1:1/unreachable",
                    "--cache-backend",
                    "memory",
                ]);

            let error = Cli::try_parse_from(args)?
                .run()
                .await
                .err()
                .ok_or("expected the memory backend to be refused")?;

            assert!(error.contains("memory cache backend"), "unexpected error: {error}");
        }

        Ok(())
    }
}
