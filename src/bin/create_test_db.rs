use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use tz_scraps::{
    NewTransaction, SerialNumber, Unit, ValidatedCustomer, ValidatedProduct, initialize_db,
    stores::{
        CustomerStore, ProductStore, TransactionStore,
        sqlite::{SQLiteCustomerStore, SQLiteProductStore, SQLiteTransactionStore},
    },
};

/// A utility for creating a test database for the TZ Scraps server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many days of transactions to generate, counting back from today.
    #[arg(long, default_value_t = 60)]
    days: i64,
}

const CUSTOMERS: [(&str, &str); 6] = [
    ("Adaeze Okafor", "+234 803 555 0101"),
    ("Bola Adeyemi", "0805 555 0102"),
    ("Chinedu Eze", ""),
    ("Fatima Bello", "+234 706 555 0104"),
    ("Kola Recycling Ltd", "(01) 555 0105"),
    ("Ngozi Umeh", ""),
];

const PRODUCTS: [(&str, &str, Unit, f64); 6] = [
    ("Copper Wire", "Stripped, bright", Unit::Kilogram, 4500.0),
    ("Aluminium Cans", "Crushed", Unit::Kilogram, 850.0),
    ("Brass Fittings", "", Unit::Kilogram, 3200.0),
    ("Car Batteries", "Lead acid", Unit::Piece, 6000.0),
    ("PET Bottles", "Sorted, clear", Unit::Bag, 1500.0),
    ("Scrap Iron", "Mixed", Unit::Kilogram, 250.0),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let conn = Arc::new(Mutex::new(conn));
    let customer_store = SQLiteCustomerStore::new(conn.clone());
    let product_store = SQLiteProductStore::new(conn.clone());
    let transaction_store = SQLiteTransactionStore::new(conn);

    let mut rng = StdRng::seed_from_u64(42);
    let today = OffsetDateTime::now_utc();
    let start = today - Duration::days(args.days.max(1));

    println!("Creating customers...");
    let mut customers = Vec::with_capacity(CUSTOMERS.len());
    for (index, (name, phone)) in CUSTOMERS.into_iter().enumerate() {
        let created_at = start + Duration::hours(index as i64);
        customers.push(customer_store.insert(&ValidatedCustomer::new(name, phone)?, created_at)?);
    }

    println!("Creating products...");
    let mut products = Vec::with_capacity(PRODUCTS.len());
    for (index, (name, description, unit, base_price)) in PRODUCTS.into_iter().enumerate() {
        let created_at = start + Duration::minutes(index as i64);
        let product = product_store.insert(
            &SerialNumber::generate(created_at, &mut rng),
            &ValidatedProduct::new(name, description)?,
            created_at,
        )?;
        products.push((product, unit, base_price));
    }

    println!("Creating transactions...");
    let mut transaction_count = 0;
    for day in 0..args.days.max(1) {
        let date = start + Duration::days(day) + Duration::hours(9);

        for _ in 0..rng.gen_range(0..4) {
            let customer = &customers[rng.gen_range(0..customers.len())];
            let (product, unit, base_price) = &products[rng.gen_range(0..products.len())];
            let quantity = match unit {
                Unit::Kilogram => (rng.gen_range(1.0..120.0_f64) * 10.0).round() / 10.0,
                _ => rng.gen_range(1..20) as f64,
            };
            let price = (base_price * rng.gen_range(0.9..1.1)).round();
            let created_at = date + Duration::minutes(rng.gen_range(0..480));

            transaction_store.insert(
                &NewTransaction::new(customer.id, product.id, quantity, *unit, price)?,
                created_at,
            )?;
            transaction_count += 1;
        }
    }

    println!(
        "Created {} customers, {} products and {transaction_count} transactions.",
        customers.len(),
        products.len()
    );
    println!("Success!");

    Ok(())
}
