//! 产品目录终端看板
//! 通过 HTTP 调用目录服务，列表、查询、创建、更新、删除产品

use clap::{Parser, Subcommand};
use product_catalog::app::product::model::{ListQuery, NewProduct, ProductPatch, SortOrder};
use product_catalog::client::{render_products, CatalogClient, ClientError, DEFAULT_API_BASE};

#[derive(Parser, Debug)]
#[command(name = "dashboard")]
#[command(about = "Terminal dashboard for the product catalog API")]
struct Cli {
    /// API base URL
    #[arg(long, env = "CATALOG_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List products with optional filtering, sorting and paging
    List {
        /// Case-insensitive name substring
        #[arg(long)]
        name: Option<String>,

        /// Sort by price
        #[arg(long)]
        sort_by_price: bool,

        /// Sort order (asc, desc)
        #[arg(long, default_value = "asc")]
        order: SortOrder,

        #[arg(long, default_value_t = 20)]
        limit: usize,

        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// Show a single product
    Get { id: String },

    /// Create a product
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        price: f64,

        #[arg(long)]
        category: Option<String>,

        /// Mark the product as out of stock
        #[arg(long)]
        out_of_stock: bool,
    },

    /// Update any subset of a product's fields
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<f64>,

        #[arg(long, conflicts_with = "clear_category")]
        category: Option<String>,

        /// Remove the product's category
        #[arg(long)]
        clear_category: bool,

        #[arg(long)]
        in_stock: Option<bool>,
    },

    /// Delete a product
    Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = CatalogClient::new(&cli.api_base)?;

    match run(&client, cli.command).await {
        Ok(()) => Ok(()),
        Err(ClientError::Http(e)) => {
            eprintln!("❌ API 不可达 ({}): {}", cli.api_base, e);
            std::process::exit(2);
        }
        Err(ClientError::Api { status, message }) => {
            eprintln!("❌ 请求失败 ({}): {}", status, message);
            std::process::exit(1);
        }
    }
}

async fn run(client: &CatalogClient, command: Command) -> Result<(), ClientError> {
    match command {
        Command::List {
            name,
            sort_by_price,
            order,
            limit,
            offset,
        } => {
            let query = ListQuery {
                name: name.filter(|n| !n.trim().is_empty()),
                sort_by_price,
                order,
                limit,
                offset,
            };
            let page = client.list_products(&query).await?;

            println!("Total: {} | Showing: {}", page.total, page.items.len());
            if page.items.is_empty() {
                println!("No products found.");
            } else {
                println!("{}", render_products(&page.items));
            }
        }
        Command::Get { id } => {
            let product = client.get_product(id.trim()).await?;
            println!("{}", render_products(&[product]));
        }
        Command::Create {
            name,
            price,
            category,
            out_of_stock,
        } => {
            let new_product = NewProduct {
                name,
                price,
                category,
                in_stock: !out_of_stock,
            };
            let product = client.create_product(&new_product).await?;
            println!("✅ Product created successfully!");
            println!("{}", render_products(&[product]));
        }
        Command::Update {
            id,
            name,
            price,
            category,
            clear_category,
            in_stock,
        } => {
            let patch = ProductPatch {
                name: name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
                price,
                category: if clear_category { Some(None) } else { category.map(Some) },
                in_stock,
            };
            if patch.is_empty() {
                println!("⚠️ Enter at least one field to update.");
                return Ok(());
            }

            let product = client.update_product(id.trim(), &patch).await?;
            println!("✅ Updated successfully!");
            println!("{}", render_products(&[product]));
        }
        Command::Delete { id } => {
            let confirmation = client.delete_product(id.trim()).await?;
            println!("✅ {} ({})", confirmation.message, confirmation.id);
        }
    }

    Ok(())
}
