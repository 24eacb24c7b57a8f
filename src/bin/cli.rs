use anyhow::Result;
use clap::{Parser, Subcommand};

use colegio::cli::{create_admin, seeder};
use colegio::config::database::init_db_pool;

#[derive(Parser)]
#[command(name = "colegio-admin", about = "Administrative tasks for the colegio API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an administrator account interactively
    CreateAdmin,
    /// Seed catalogs and demo students
    Seed {
        /// Number of demo students to create
        #[arg(long, default_value_t = 50)]
        alumnos: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let db = init_db_pool().await;

    match cli.command {
        Command::CreateAdmin => create_admin::run(&db).await?,
        Command::Seed { alumnos } => seeder::run(&db, alumnos).await?,
    }

    Ok(())
}
