use clap::Parser;
use tickwatch::cli::{
    connect, handle_completions, handle_config_init, query, settings, watch, Cli, Commands,
    ConfigCommands, SettingsCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Watch(args) => watch::run_watch(args).await,
        Commands::Stats(args) => match connect(&args.connect) {
            Ok((_, api)) => query::handle_stats(&args, api).await.map(print_output),
            Err(e) => Err(e),
        },
        Commands::Lag(args) => match connect(&args.connect) {
            Ok((_, api)) => query::handle_lag(&args, api).await.map(print_output),
            Err(e) => Err(e),
        },
        Commands::Players(args) => match connect(&args.connect) {
            Ok((_, api)) => query::handle_players(&args, api).await.map(print_output),
            Err(e) => Err(e),
        },
        Commands::Settings(cmd) => match cmd {
            SettingsCommands::Show(args) => match connect(&args.connect) {
                Ok((_, api)) => settings::handle_settings_show(&args, api)
                    .await
                    .map(print_output),
                Err(e) => Err(e),
            },
            SettingsCommands::Set(args) => match connect(&args.connect) {
                Ok((config, api)) => settings::handle_settings_set(&args, &config, api)
                    .await
                    .map(print_output),
                Err(e) => Err(e),
            },
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args).map(print_output),
        },
        Commands::Completions(args) => {
            handle_completions(&args, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_output(output: String) {
    println!("{}", output);
}
