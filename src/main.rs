use clap::Parser;
use trazo::cli::{
    handle_completions, handle_config_init, lookup, plan, reconcile, Cli, Commands,
    ConfigCommands,
};

fn print_output(
    result: Result<String, Box<dyn std::error::Error>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = result?;
    println!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Lookup(args) => print_output(lookup::handle_lookup(&args).await),
        Commands::Plan(args) => print_output(plan::handle_plan(&args).await),
        Commands::Reconcile(args) => print_output(reconcile::handle_reconcile(&args)),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
