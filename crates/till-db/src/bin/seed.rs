//! # Seed Data Generator
//!
//! Populates the database with catalog items for development.
//!
//! ## Usage
//! ```bash
//! # Generate 50 items (default)
//! cargo run -p till-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p till-db --bin seed -- --count 200
//!
//! # Specify database path
//! cargo run -p till-db --bin seed -- --db ./data/till.db
//! ```
//!
//! Names are `{product} {size}`; prices are deterministic, between 1.99
//! and 13.49. Running twice against the same file is a no-op.

use std::env;
use till_core::{validation::validate_item, Item, Money};
use till_db::{Database, DbConfig, Store, UnitOfWork};

const PRODUCTS: &[&str] = &[
    "Burger",
    "Cheeseburger",
    "Veggie Burger",
    "Chicken Wrap",
    "Fish Sandwich",
    "Fries",
    "Onion Rings",
    "Side Salad",
    "Cola",
    "Lemonade",
    "Iced Tea",
    "Coffee",
    "Milkshake",
    "Apple Pie",
    "Brownie",
];

/// Size variants and their price add-on in cents
const SIZES: &[(&str, i64)] = &[("Small", 0), ("Medium", 100), ("Large", 200), ("XL", 350)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 50;
    let mut db_path = String::from("./till_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Till Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of items to generate (default: 50)");
                println!("  -d, --db <PATH>    Database file path (default: ./till_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Till Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("Items:    {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let mut uow = db.begin().await?;

    let existing = uow.items().find_all().await?.len();
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        uow.rollback().await?;
        return Ok(());
    }

    println!();
    println!("Generating items...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    let variants = PRODUCTS
        .iter()
        .flat_map(|product| SIZES.iter().map(move |size| (*product, *size)));

    for (seed, (product, (size, price_addon))) in variants.enumerate().take(count) {
        let item = generate_item(product, size, price_addon, seed);
        validate_item(Some(&item))?;
        uow.items().save(item).await?;
        generated += 1;
    }

    uow.commit().await?;

    println!();
    println!("✓ Generated {} items in {:?}", generated, start.elapsed());
    if generated < count {
        println!("  (catalog exhausted: {} distinct variants)", generated);
    }

    db.close().await;
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one catalog item with a deterministic price.
fn generate_item(product: &str, size: &str, price_addon: i64, seed: usize) -> Item {
    // base $1.99 - $9.99 + size addon
    let base_cents = 199 + ((seed * 17) % 800) as i64;
    Item::new(
        format!("{} {}", product, size),
        Money::from_cents(base_cents + price_addon),
    )
}
