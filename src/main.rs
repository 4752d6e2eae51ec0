use clap::Parser;
use fabric_desk::cli::{
    catalog, chat, handle_completions, handle_config_init, health, serve, Cli, Commands,
    ConfigCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => serve::run_serve(args).await,
        Commands::Chat(args) => chat::run_chat(args).await,
        Commands::Health(args) => health::handle_health(&args).await.map(|output| {
            println!("{}", output.trim_end());
        }),
        Commands::Patterns(args) => catalog::handle_patterns(&args).await.map(|output| {
            println!("{}", output);
        }),
        Commands::Models(args) => catalog::handle_models(&args).await.map(|output| {
            println!("{}", output);
        }),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
