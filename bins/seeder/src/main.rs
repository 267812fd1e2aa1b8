//! Database seeder for Garrison development and testing.
//!
//! Seeds two bases, a small equipment catalogue, one user per role and a
//! month of ledger activity at Alpha. Every row has a fixed ID, so running
//! the seeder twice changes nothing.
//!
//! Usage: cargo run --bin seeder
//!
//! All users get the password from `SEED_PASSWORD` (default `garrison-dev`).

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use garrison_core::auth::hash_password;
use garrison_db::entities::{
    assignments, bases, equipment_types, purchases,
    sea_orm_active_enums::{AssignmentStatus, EquipmentCategory, TransferStatus, UserRole},
    transfers, users,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

const ALPHA: Uuid = Uuid::from_u128(0x0001_0000_0000_0000_0000_0000_0000_0001);
const BRAVO: Uuid = Uuid::from_u128(0x0001_0000_0000_0000_0000_0000_0000_0002);

const RIFLE: Uuid = Uuid::from_u128(0x0002_0000_0000_0000_0000_0000_0000_0001);
const VEHICLE: Uuid = Uuid::from_u128(0x0002_0000_0000_0000_0000_0000_0000_0002);
const AMMO: Uuid = Uuid::from_u128(0x0002_0000_0000_0000_0000_0000_0000_0003);
const RADIO: Uuid = Uuid::from_u128(0x0002_0000_0000_0000_0000_0000_0000_0004);

const ADMIN_USER: Uuid = Uuid::from_u128(0x0003_0000_0000_0000_0000_0000_0000_0001);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let password = std::env::var("SEED_PASSWORD").unwrap_or_else(|_| "garrison-dev".to_string());

    println!("Connecting to database...");
    let db = garrison_db::connect(&database_url, 2, 1)
        .await
        .context("failed to connect to database")?;

    println!("Seeding bases...");
    seed_bases(&db).await?;

    println!("Seeding equipment types...");
    seed_equipment_types(&db).await?;

    println!("Seeding users...");
    seed_users(&db, &password).await?;

    println!("Seeding ledger...");
    seed_ledger(&db).await?;

    println!("Seeding complete!");
    Ok(())
}

fn date(y: i32, m: u32, d: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).with_context(|| format!("invalid seed date {y}-{m}-{d}"))
}

/// Ledger rows get IDs in their own range so reruns find them.
const fn ledger_id(n: u128) -> Uuid {
    Uuid::from_u128((0x0004 << 112) | n)
}

async fn seed_bases(db: &DatabaseConnection) -> anyhow::Result<()> {
    for (id, name, location) in [
        (ALPHA, "Alpha", "Fort Alpha, North Sector"),
        (BRAVO, "Bravo", "Camp Bravo, East Sector"),
    ] {
        if bases::Entity::find_by_id(id).one(db).await?.is_some() {
            println!("  Base {name} already exists, skipping...");
            continue;
        }
        let now = Utc::now().into();
        bases::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            location: Set(location.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .with_context(|| format!("failed to insert base {name}"))?;
        println!("  Created base {name}");
    }
    Ok(())
}

async fn seed_equipment_types(db: &DatabaseConnection) -> anyhow::Result<()> {
    for (id, name, category, description) in [
        (RIFLE, "M4 Carbine", EquipmentCategory::Weapon, "5.56mm carbine"),
        (VEHICLE, "HMMWV", EquipmentCategory::Vehicle, "Light utility vehicle"),
        (AMMO, "5.56mm Ball", EquipmentCategory::Ammunition, "Boxes of 1000 rounds"),
        (RADIO, "PRC-152", EquipmentCategory::Communication, "Handheld radio"),
    ] {
        if equipment_types::Entity::find_by_id(id).one(db).await?.is_some() {
            println!("  Equipment type {name} already exists, skipping...");
            continue;
        }
        equipment_types::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            category: Set(category),
            description: Set(Some(description.to_string())),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
        .with_context(|| format!("failed to insert equipment type {name}"))?;
        println!("  Created equipment type {name}");
    }
    Ok(())
}

async fn seed_users(db: &DatabaseConnection, password: &str) -> anyhow::Result<()> {
    let users_to_seed = [
        (ADMIN_USER, "admin", "System Administrator", UserRole::Admin, None),
        (
            Uuid::from_u128(0x0003_0000_0000_0000_0000_0000_0000_0002),
            "cmdr.alpha",
            "Commander Alpha",
            UserRole::BaseCommander,
            Some(ALPHA),
        ),
        (
            Uuid::from_u128(0x0003_0000_0000_0000_0000_0000_0000_0003),
            "log.alpha",
            "Logistics Alpha",
            UserRole::LogisticsOfficer,
            Some(ALPHA),
        ),
        (
            Uuid::from_u128(0x0003_0000_0000_0000_0000_0000_0000_0004),
            "cmdr.bravo",
            "Commander Bravo",
            UserRole::BaseCommander,
            Some(BRAVO),
        ),
        (
            Uuid::from_u128(0x0003_0000_0000_0000_0000_0000_0000_0005),
            "log.bravo",
            "Logistics Bravo",
            UserRole::LogisticsOfficer,
            Some(BRAVO),
        ),
    ];

    for (id, username, full_name, role, home_base_id) in users_to_seed {
        if users::Entity::find_by_id(id).one(db).await?.is_some() {
            println!("  User {username} already exists, skipping...");
            continue;
        }
        let password_hash = hash_password(password)?;
        let now = Utc::now().into();
        users::ActiveModel {
            id: Set(id),
            username: Set(username.to_string()),
            full_name: Set(full_name.to_string()),
            password_hash: Set(password_hash),
            role: Set(role),
            home_base_id: Set(home_base_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .with_context(|| format!("failed to insert user {username}"))?;
        println!("  Created user {username}");
    }
    Ok(())
}

/// Alpha holds 100 rifles before January 2024. During January it buys 20,
/// receives 5 from Bravo, sends 10 to Bravo, expends 3 and has 4 out on
/// assignment. A 50-rifle shipment from Bravo is still in transit.
async fn seed_ledger(db: &DatabaseConnection) -> anyhow::Result<()> {
    let purchase_rows = [
        (ledger_id(1), ALPHA, RIFLE, 100, date(2023, 12, 1)?),
        (ledger_id(2), ALPHA, RIFLE, 20, date(2024, 1, 5)?),
        (ledger_id(3), BRAVO, RIFLE, 80, date(2023, 11, 15)?),
        (ledger_id(4), ALPHA, RADIO, 12, date(2024, 1, 9)?),
    ];
    for (id, base_id, equipment_type_id, quantity, purchase_date) in purchase_rows {
        if purchases::Entity::find_by_id(id).one(db).await?.is_some() {
            continue;
        }
        let unit_cost = Decimal::new(85_000, 2);
        purchases::ActiveModel {
            id: Set(id),
            base_id: Set(base_id),
            equipment_type_id: Set(equipment_type_id),
            quantity: Set(quantity),
            unit_cost: Set(unit_cost),
            total_cost: Set(unit_cost * Decimal::from(quantity)),
            purchase_date: Set(purchase_date),
            notes: Set(Some("seeded".to_string())),
            created_by: Set(ADMIN_USER),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
        .context("failed to insert purchase")?;
    }

    let transfer_rows = [
        (ledger_id(11), BRAVO, ALPHA, 5, date(2024, 1, 8)?, TransferStatus::Completed),
        (ledger_id(12), ALPHA, BRAVO, 10, date(2024, 1, 12)?, TransferStatus::Completed),
        (ledger_id(13), BRAVO, ALPHA, 50, date(2024, 1, 14)?, TransferStatus::InTransit),
    ];
    for (id, source, destination, quantity, transfer_date, status) in transfer_rows {
        if transfers::Entity::find_by_id(id).one(db).await?.is_some() {
            continue;
        }
        let now = Utc::now().into();
        transfers::ActiveModel {
            id: Set(id),
            source_base_id: Set(source),
            destination_base_id: Set(destination),
            equipment_type_id: Set(RIFLE),
            quantity: Set(quantity),
            transfer_date: Set(transfer_date),
            status: Set(status),
            completed_on: Set((status == TransferStatus::Completed).then_some(transfer_date)),
            notes: Set(Some("seeded".to_string())),
            created_by: Set(ADMIN_USER),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .context("failed to insert transfer")?;
    }

    let assignment_rows = [
        (ledger_id(21), 3, "Range training", date(2024, 1, 20)?, AssignmentStatus::Expended),
        (ledger_id(22), 4, "2nd Platoon", date(2024, 1, 22)?, AssignmentStatus::Active),
    ];
    for (id, quantity, assignee, assignment_date, status) in assignment_rows {
        if assignments::Entity::find_by_id(id).one(db).await?.is_some() {
            continue;
        }
        let now = Utc::now().into();
        assignments::ActiveModel {
            id: Set(id),
            base_id: Set(ALPHA),
            equipment_type_id: Set(RIFLE),
            quantity: Set(quantity),
            assignee: Set(assignee.to_string()),
            assignment_date: Set(assignment_date),
            status: Set(status),
            expended_on: Set((status == AssignmentStatus::Expended).then_some(assignment_date)),
            notes: Set(Some("seeded".to_string())),
            created_by: Set(ADMIN_USER),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .context("failed to insert assignment")?;
    }

    println!("  Ledger rows in place");
    Ok(())
}
