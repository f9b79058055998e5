use clap::Parser;
use colored::Colorize;
use msu_rs::{cli, commit, playlist, update, util};

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = cli::Cli::parse();
    if let Err(err) = run(args).await {
        eprintln!("{}", err.to_string().red());
        std::process::exit(1);
    }
}

async fn run(args: cli::Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = util::HttpClient::new()?;

    match args.command {
        cli::Command::Update(opts) => match update::run(&client, &opts).await? {
            playlist::PatchOutcome::Updated { .. } => {
                println!(
                    "{}",
                    format!("Updated {} stream URL", opts.entry_name).green()
                );
            }
            playlist::PatchOutcome::Unchanged => {
                println!("{}", "Stream URL unchanged".green());
            }
        },
        cli::Command::Commit(opts) => commit::run(&client, &opts).await?,
    }

    Ok(())
}
