//! # Seed Data Generator
//!
//! Populates the database with default accounts and a small starter
//! catalog for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p pharma-db --bin seed
//!
//! # Specify database path
//! cargo run -p pharma-db --bin seed -- --db ./data/pharmacare.db
//! ```
//!
//! ## Generated Data
//! - Four accounts, one per role (admin / pharmacist / cashier / seller),
//!   all with the password `demo1234`
//! - Six product categories
//! - Three suppliers
//! - Five products, including the classic Paracetamol 500mg
//! - Default settings (pharmacy name, currency, alert thresholds)
//!
//! The seed is idempotent: it refuses to run against a database that
//! already has users.

use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use argon2::Argon2;
use std::env;

use pharma_core::{
    AccountStatus, NewCategory, NewProduct, NewSupplier, NewUser, SettingType, UserRole,
};
use pharma_db::{Database, DbConfig};

const DEMO_PASSWORD: &str = "demo1234";

const USERS: &[(&str, &str, UserRole)] = &[
    ("Administrator", "admin", UserRole::Admin),
    ("Dr. Kouassi", "pharmacien", UserRole::Pharmacist),
    ("Marie Diallo", "caissier", UserRole::Cashier),
    ("Jean Traore", "vendeur", UserRole::Seller),
];

const CATEGORIES: &[(&str, &str)] = &[
    ("Analgesics", "Pain relief and antipyretics"),
    ("Antibiotics", "Prescription antibiotics"),
    ("Vitamins", "Vitamins and supplements"),
    ("Syrups", "Cough and cold syrups"),
    ("Antiseptics", "Disinfectants and wound care"),
    ("Medical Supplies", "Bandages, syringes, thermometers"),
];

const SUPPLIERS: &[(&str, &str)] = &[
    ("PharmaDistrib", "contact@pharmadistrib.example"),
    ("MediSupply", "orders@medisupply.example"),
    ("GlobalPharm", "sales@globalpharm.example"),
];

/// (name, category index, purchase, price, stock, min_stock)
const PRODUCTS: &[(&str, usize, i64, i64, i64, i64)] = &[
    ("Paracetamol 500mg", 0, 300, 500, 45, 20),
    ("Ibuprofen 400mg", 0, 450, 700, 30, 15),
    ("Amoxicillin 500mg", 1, 900, 1500, 25, 10),
    ("Vitamin C 1000mg", 2, 600, 1000, 60, 20),
    ("Cough Syrup 125ml", 3, 800, 1200, 18, 10),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./pharmacare_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("PharmaCare Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./pharmacare_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("PharmaCare Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("- Connected to database");
    println!("- Migrations applied");

    let existing = db.users().list().await?;
    if !existing.is_empty() {
        println!("! Database already has {} users", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Accounts
    let password_hash = hash_demo_password()?;
    for (name, username, role) in USERS {
        db.users()
            .create(&NewUser {
                name: name.to_string(),
                username: username.to_string(),
                email: Some(format!("{username}@pharmacare.example")),
                password_hash: password_hash.clone(),
                phone: None,
                role: *role,
                status: AccountStatus::Active,
            })
            .await?;
    }
    println!("- Created {} accounts (password: {DEMO_PASSWORD})", USERS.len());

    // Categories
    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (name, description) in CATEGORIES {
        let category = db
            .categories()
            .create(&NewCategory {
                name: name.to_string(),
                description: Some(description.to_string()),
            })
            .await?;
        category_ids.push(category.id);
    }
    println!("- Created {} categories", CATEGORIES.len());

    // Suppliers
    let mut supplier_ids = Vec::with_capacity(SUPPLIERS.len());
    for (name, email) in SUPPLIERS {
        let supplier = db
            .suppliers()
            .create(&NewSupplier {
                name: name.to_string(),
                contact: None,
                email: Some(email.to_string()),
                phone: None,
                address: None,
                status: AccountStatus::Active,
            })
            .await?;
        supplier_ids.push(supplier.id);
    }
    println!("- Created {} suppliers", SUPPLIERS.len());

    // Products
    for (idx, (name, category_idx, purchase, price, stock, min_stock)) in
        PRODUCTS.iter().enumerate()
    {
        db.products()
            .create(&NewProduct {
                name: name.to_string(),
                category_id: Some(category_ids[*category_idx]),
                purchase_price_cents: *purchase,
                price_cents: *price,
                stock: *stock,
                min_stock: *min_stock,
                supplier_id: Some(supplier_ids[idx % supplier_ids.len()]),
                expiry_date: None,
                batch_number: Some(format!("BATCH-{:04}", idx + 1)),
            })
            .await?;
    }
    println!("- Created {} products", PRODUCTS.len());

    // Settings
    let settings: &[(&str, &str, SettingType, &str)] = &[
        ("pharmacy_name", "PharmaCare", SettingType::String, "Display name on receipts"),
        ("currency", "XOF", SettingType::String, "ISO currency code"),
        ("low_stock_alerts", "true", SettingType::Boolean, "Raise low stock notifications"),
        ("expiry_warning_days", "30", SettingType::Number, "Days before expiry to warn"),
    ];
    for (key, value, setting_type, description) in settings {
        db.settings()
            .upsert(key, Some(value), *setting_type, Some(description))
            .await?;
    }
    println!("- Created {} settings", settings.len());

    println!();
    println!("Seed complete.");

    Ok(())
}

fn hash_demo_password() -> Result<String, Box<dyn std::error::Error>> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(DEMO_PASSWORD.as_bytes(), &salt)
        .map_err(|e| format!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}
