use clap::Parser;

/// Real-time coordinator for in-person hold'em played without chips.
#[derive(Parser)]
#[command(name = "chiprack", about)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind: String,
    /// PostgreSQL connection string; omit to keep rooms in memory only.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    rack_core::log();
    let args = Args::parse();
    rack_server::run(rack_server::Config {
        bind: args.bind,
        database_url: args.database_url,
    })
    .await
}
