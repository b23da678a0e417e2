use anyhow::Result;
use clap::Parser;
use skittish_snake::game::GameConfig;
use skittish_snake::modes::PlayMode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skittish_snake")]
#[command(version, about = "Snake game where the food runs away or teleports when you get close")]
struct Cli {
    /// Grid width
    #[arg(long, default_value = "20")]
    width: usize,

    /// Grid height
    #[arg(long, default_value = "20")]
    height: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging stays silent unless RUST_LOG asks for it; the TUI owns the screen
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Create game configuration from CLI arguments
    let config = GameConfig::new(cli.width, cli.height);

    let mut play_mode = PlayMode::new(config);
    play_mode.run().await?;

    Ok(())
}
