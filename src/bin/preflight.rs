use notechain::infra::config;
use notechain::CardanoClient;
use notechain::DatabaseService;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL, JWT_SECRET, CARDANO_API_URL\n\
         Optional:\n\
           CARDANO_PROJECT_ID, TOKEN_TTL_DAYS, TX_POLL_INTERVAL_SECS,\n\
           TX_PENDING_EXPIRY_SECS, BIND_ADDR\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    // Force-read config (nice error messages if missing)
    let api_url = config::cardano_api_url();
    let _ = config::database_url();
    let _ = config::jwt_secret();

    println!("> Preflight:");
    println!("  CARDANO_API_URL={}", api_url);
    println!(
        "  CARDANO_PROJECT_ID={}",
        if config::cardano_project_id().is_some() { "(set)" } else { "(not set)" }
    );
    println!("  TOKEN_TTL_DAYS={}", config::token_ttl_days());
    println!("  TX_POLL_INTERVAL_SECS={}", config::tx_poll_interval_secs());
    println!("  TX_PENDING_EXPIRY_SECS={}", config::tx_pending_expiry_secs());
    println!("  BIND_ADDR={}", config::bind_addr());

    // Database connectivity (also creates the schema if missing).
    let db = DatabaseService::new().await?;
    sqlx::query("SELECT 1").execute(db.pool()).await?;
    println!("  Database is reachable (schema ensured).");

    // Cardano API connectivity.
    let cardano = CardanoClient::from_env();
    match cardano.health().await {
        Ok(true) => println!("  Cardano API is reachable and healthy."),
        Ok(false) => eprintln!("  Warning: Cardano API reachable but reports unhealthy."),
        Err(e) => {
            return Err(anyhow::anyhow!(
                "Cardano API health check failed: {} (wallet balance lookups and tx tracking will not work)",
                e
            ));
        }
    }

    println!("> Preflight OK.");
    Ok(())
}
