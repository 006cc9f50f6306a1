use confy::ConfyError;
use prompter_core::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::env::home_dir;
use std::path::PathBuf;

use crate::constants::PROMPTER_CLI;

#[derive(Serialize, Deserialize)]
pub struct PrompterCliConfig {
    pub db_path: String,
    pub(crate) model_config: ModelConfig,
}

#[derive(Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_name: String,
    pub base_url: String,
}

impl Default for PrompterCliConfig {
    fn default() -> Self {
        let db_path = home_dir()
            .map(|p| p.join("prompter").join("prompts_db.json"))
            .unwrap_or_else(|| PathBuf::from("prompts_db.json"));

        Self {
            db_path: db_path.display().to_string(),
            model_config: ModelConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_name: String::from(DEFAULT_MODEL),
            base_url: String::from(DEFAULT_BASE_URL),
        }
    }
}

pub fn load_config() -> PrompterCliConfig {
    let config: Result<PrompterCliConfig, ConfyError> = confy::load(PROMPTER_CLI, None);
    match config {
        Ok(config) => config,
        _ => {
            eprintln!("Error: Problem loading config. Exiting...");
            std::process::exit(exitcode::CONFIG);
        }
    }
}

/// The completion credential comes from the environment; its absence is fatal
/// before any work is attempted.
pub fn require_api_key() -> String {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => {
            eprintln!("Error: OPENAI_API_KEY is not set. Exiting...");
            std::process::exit(exitcode::CONFIG);
        }
    }
}
