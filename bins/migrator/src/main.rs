//! Database migration runner for Garrison.
//!
//! Reads `DATABASE_URL` (from the environment or `.env`).
//!
//! Usage:
//!   migrator up      - Apply the schema
//!   migrator down    - Drop it again
//!   migrator status  - Show applied migrations
//!   migrator fresh   - Drop everything and re-apply

use garrison_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The CLI sets up its own tracing.
    cli::run_cli(Migrator).await;
}
