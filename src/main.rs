use clap::Parser;
use residency_returns::api::{Cli, Command, build_config, run_http_server};
use residency_returns::logging::init_logging;
use residency_returns::pipeline;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Some(Command::Serve { port }) = cli.command {
        if let Err(e) = run_http_server(port).await {
            eprintln!("Server error: {e}");
            std::process::exit(1);
        }
        return;
    }

    let result = build_config(&cli).and_then(|config| pipeline::run(&config));
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
