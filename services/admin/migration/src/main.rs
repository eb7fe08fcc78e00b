use sea_orm_migration::prelude::*;

use backoffice_admin_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
