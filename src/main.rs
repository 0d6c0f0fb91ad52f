mod api;
mod deployment;
mod outcome_log;
mod pipeline;

use clap::{Parser, Subcommand};
use deployment::Deployment;
use emojify_core::{config, dictionary};
use pipeline::Terminal;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "emojify",
    version,
    about = "Emojify — translate text into emoji with model routing and a local fallback"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server.
    Serve {
        /// Deployment variant (controls mount path and config source).
        #[arg(long, value_enum, default_value_t = Deployment::Node)]
        deployment: Deployment,
        /// Override `[server].host`.
        #[arg(long)]
        host: Option<String>,
        /// Override `[server].port`.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Show effective configuration and backend availability.
    Status {
        #[arg(long, value_enum, default_value_t = Deployment::Node)]
        deployment: Deployment,
    },
    /// Translate text once and print the result.
    Translate {
        /// Only use the local dictionary.
        #[arg(long)]
        local: bool,
        #[arg(long, value_enum, default_value_t = Deployment::Node)]
        deployment: Deployment,
        /// The text to translate.
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let file_cfg = config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&file_cfg.server.log_level)),
        )
        .init();

    match cli.command {
        Commands::Serve {
            deployment,
            host,
            port,
        } => {
            let cfg = deployment.configure(file_cfg);
            let host = host.unwrap_or_else(|| cfg.server.host.clone());
            let port = port.unwrap_or(cfg.server.port);

            let pipeline = Arc::new(deployment.build_pipeline(&cfg));
            let state = api::ApiState::new(pipeline, deployment);
            api::serve(state, &format!("{host}:{port}"), cfg.server.body_limit_bytes).await?;
        }
        Commands::Status { deployment } => {
            let cfg = deployment.configure(file_cfg);
            let (openai, gemini) = deployment.build_providers(&cfg);

            println!("Emojify — Status Check\n");
            println!("Config: {}", cli.config);
            println!("Deployment: {deployment} (POST {})", deployment.mount_path());
            println!(
                "Default provider: {}",
                cfg.translate.default_provider_kind()
            );
            println!(
                "Rate limit: {} requests / {}ms",
                cfg.rate_limit.max_requests, cfg.rate_limit.window_ms
            );
            println!();

            let openai_model = cfg
                .provider
                .openai
                .model_or(deployment.default_openai_model());
            for (provider, model) in [
                (openai, openai_model),
                (gemini, cfg.provider.gemini.model.as_str()),
            ] {
                let state = if !provider.has_api_key() {
                    "no API key (local fallback)"
                } else if provider.is_available().await {
                    "available"
                } else {
                    "unreachable"
                };
                println!("  {} ({model}): {state}", provider.name());
            }
            println!();
            println!(
                "Recognized environment: {}",
                deployment::recognized_env_keys().join(", ")
            );
        }
        Commands::Translate {
            local,
            deployment,
            text,
        } => {
            if text.is_empty() {
                anyhow::bail!("no text provided. Usage: emojify translate <text>");
            }
            let input = text.join(" ");

            if local {
                let capped =
                    pipeline::truncate_chars(&input, file_cfg.translate.max_input_chars);
                println!("{}", dictionary::translate(capped));
                return Ok(());
            }

            let cfg = deployment.configure(file_cfg);
            let pipeline = deployment.build_pipeline(&cfg);
            match pipeline.translate(&input).await {
                Terminal::InvalidInput => anyhow::bail!("text is empty"),
                terminal => {
                    if let Some(outcome) = terminal.outcome() {
                        println!("{}", outcome.output);
                        if let Some(ref err) = outcome.error {
                            eprintln!("({err}: local dictionary result)");
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
