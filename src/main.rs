use clap::Parser;
use dotenv::dotenv;
use handler::Cli;
use serde::{Deserialize, Serialize};

mod handler;
mod document;
mod chat;
mod report;
mod uploads;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = read_config()?;
    let args = Cli::parse();
    handler::handler(args, config).await?;
    Ok(())
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    // Storage
    upload_dir: String,
    export_dir: String,

    // Server
    bind: String,
    max_upload_bytes: usize,

    // Chat
    openai_url: String,
    openai_api_key: String,
    report_model: String,
    clarify_model: String,
    request_timeout_secs: u64,

    // Prompt
    default_tone: String,
    default_style: String,
}

fn read_config() -> anyhow::Result<Config> {
    Ok(config::Config::builder()
        .set_default("upload_dir", "uploads")?
        .set_default("export_dir", "exports")?
        .set_default("bind", "127.0.0.1:8000")?
        .set_default("max_upload_bytes", 50 * 1024 * 1024)?
        .set_default("openai_url", "https://api.openai.com/v1/chat/completions")?
        .set_default("openai_api_key", "")?
        .set_default("report_model", "gpt-4o")?
        .set_default("clarify_model", "gpt-4o-mini")?
        .set_default("request_timeout_secs", 120)?
        .set_default("default_tone", "professional")?
        .set_default("default_style", "analytical")?
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::default())
        .build()?
        .try_deserialize::<Config>()?)
}

#[cfg(test)]
pub fn test_config(root: &std::path::Path) -> Config {
    Config {
        upload_dir: root.join("uploads").to_string_lossy().into_owned(),
        export_dir: root.join("exports").to_string_lossy().into_owned(),
        bind: "127.0.0.1:0".to_string(),
        max_upload_bytes: 1024 * 1024,
        openai_url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
        openai_api_key: String::new(),
        report_model: "gpt-4o".to_string(),
        clarify_model: "gpt-4o-mini".to_string(),
        request_timeout_secs: 5,
        default_tone: "professional".to_string(),
        default_style: "analytical".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_config() -> anyhow::Result<()> {
        let config = read_config()?;
        assert!(!config.upload_dir.is_empty());
        assert!(config.openai_url.starts_with("http"));
        assert!(config.max_upload_bytes > 0);
        Ok(())
    }
}
