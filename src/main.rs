use clap::Parser;

use breakeven::api::{Cli, Command, run_http_server, run_report};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = breakeven::logging::init_logging(cli.log_level) {
        eprintln!("Logging disabled: {e}");
    }

    if let Some(Command::Serve { port }) = cli.command {
        if let Err(e) = run_http_server(port).await {
            eprintln!("Server error: {e}");
            std::process::exit(1);
        }
        return;
    }

    match run_report(&cli.inputs, cli.format) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
