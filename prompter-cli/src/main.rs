mod config;
mod constants;

use anyhow::Result;
use clap::{Parser, Subcommand};

use prompter_core::file_store::JsonFileStore;
use prompter_core::llm::OpenAiGateway;
use prompter_core::repository::PromptRepository;
use prompter_core::store::StoreBackend;

use crate::config::{load_config, require_api_key};
use crate::constants::KQL_SYSTEM_PROMPT;

#[derive(Parser, Debug)]
#[command(version,
display_name = "prompter",
bin_name = "prompter",
about = "Store, rate and iteratively rewrite prompts",
long_about = "Store, rate and iteratively rewrite prompts through a language model", )]
struct Args {
    /// Path of the prompt store document (defaults to the configured one)
    #[arg(short = 'd', long)]
    db_path: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Generate a KQL query from a natural-language question
    Kql {
        /// The question, as free text
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// List stored prompts with their ratings
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config();
    let db_path = args.db_path.unwrap_or(config.db_path);

    match &args.cmd {
        Commands::Kql { question } => {
            let api_key = require_api_key();
            let store = JsonFileStore::new(&db_path);
            let gateway = OpenAiGateway::new(api_key, &config.model_config.base_url);
            let repository =
                PromptRepository::new(store, gateway, &config.model_config.model_name)?;

            let question = question.join(" ");
            let id = repository.create(&question)?;
            let query = repository.regenerate(&id, Some(KQL_SYSTEM_PROMPT)).await?;
            println!("{query}");
        }
        Commands::List => {
            let store = JsonFileStore::new(&db_path);
            store.ensure()?;
            for prompt in store.load()?.prompts {
                let latest: String = prompt.latest_text().chars().take(40).collect();
                println!(
                    "- {}: {}... (👍{} 👎{})",
                    prompt.id, latest, prompt.thumbs_up, prompt.thumbs_down
                );
            }
        }
    }

    Ok(())
}
