use clap::Parser;
use tracing_subscriber::EnvFilter;

mod client;

#[derive(Parser)]
#[command(name = "pente")]
#[command(about = "Connect to a Pente game server", long_about = None)]
struct Cli {
    /// Server host name or IP
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(long, default_value_t = 55555)]
    port: u16,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    println!("Connecting to {}:{}...", cli.host, cli.port);
    if let Err(e) = client::run(&cli.host, cli.port).await {
        eprintln!("Error: {}", e);
    }
}
