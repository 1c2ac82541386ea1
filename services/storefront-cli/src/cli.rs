//! Command-line surface.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "voltmarket", version, about = "VoltMarket storefront from the terminal")]
pub struct Cli {
    /// Backend base URL; overrides VOLTMARKET_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Where the session token is kept; overrides VOLTMARKET_TOKEN_FILE.
    #[arg(long, global = true)]
    pub token_file: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Browse the catalog.
    Catalog {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Vec<u64>,
        #[arg(long)]
        brand: Vec<u64>,
        #[arg(long)]
        min_price: Option<String>,
        #[arg(long)]
        max_price: Option<String>,
        #[arg(long)]
        in_stock: bool,
        /// Sort value such as `price_asc` or `created_at_desc`.
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Top rated items and categories.
    Home,
    /// Product details.
    Item { id: u64 },
    /// Reviews of a product.
    Reviews { id: u64 },
    /// Other items from the same category.
    Related { id: u64 },
    /// Write a review.
    Review {
        id: u64,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        text: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    Logout,
    /// Signed-in user.
    Whoami,
    /// Show the cart.
    Cart,
    /// Add an item to the cart.
    Add {
        id: u64,
        #[arg(long, default_value_t = 1)]
        qty: u32,
    },
    /// Change a cart line by a signed amount; reaching zero removes it.
    Qty {
        id: u64,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    Remove { id: u64 },
    /// Empty the cart.
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Add an item to the comparison list.
    Compare { id: u64 },
    /// Show a comparison; the first one when no id is given.
    Comparison { id: Option<u64> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_filters() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "voltmarket", "catalog", "--search", "galaxy", "--category", "2", "--category", "3",
            "--sort", "price_asc", "--in-stock",
        ])?;
        let Command::Catalog { search, category, sort, in_stock, page, .. } = cli.command else {
            panic!("expected catalog");
        };
        assert_eq!(search.as_deref(), Some("galaxy"));
        assert_eq!(category, vec![2, 3]);
        assert_eq!(sort.as_deref(), Some("price_asc"));
        assert!(in_stock);
        assert_eq!(page, 1);
        Ok(())
    }

    #[test]
    fn parses_negative_quantity_delta() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["voltmarket", "qty", "7", "-1"])?;
        assert_eq!(cli.command, Command::Qty { id: 7, delta: -1 });
        Ok(())
    }

    #[test]
    fn global_options_follow_the_subcommand() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["voltmarket", "cart", "--api-url", "http://shop.test"])?;
        assert_eq!(cli.api_url.as_deref(), Some("http://shop.test"));
        assert_eq!(cli.command, Command::Cart);
        Ok(())
    }

    #[test]
    fn add_defaults_to_one() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["voltmarket", "add", "42"])?;
        assert_eq!(cli.command, Command::Add { id: 42, qty: 1 });
        Ok(())
    }
}
