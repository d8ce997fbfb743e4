use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use chatloop::{Commands, Container, ContainerConfig, ProviderKind, Router};

#[derive(Parser)]
#[command(name = "chatloop")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Completion backend
    #[arg(long, global = true, value_enum, default_value = "anthropic")]
    provider: ProviderKind,

    /// Model (or Azure deployment) overriding the provider's environment default
    #[arg(long, global = true)]
    model: Option<String>,

    #[arg(long, global = true, default_value = "2000")]
    max_tokens: u32,

    #[arg(long, global = true, default_value = "0.7")]
    temperature: f32,

    #[arg(long, global = true, default_value = "0.8")]
    top_p: f32,

    /// System directive opening every conversation; empty for none
    #[arg(long, global = true, default_value = chatloop::connector::DEFAULT_SYSTEM_PROMPT)]
    system: String,

    /// Label attached to completion requests in logs
    #[arg(long, global = true, default_value = "chat")]
    service_id: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ContainerConfig {
        provider: cli.provider,
        service_id: cli.service_id,
        model: cli.model,
        max_tokens: cli.max_tokens,
        temperature: cli.temperature,
        top_p: cli.top_p,
        system_prompt: cli.system,
    };

    let container = Container::new(config)?;
    debug!(
        "Provider: {}, settings: {:?}",
        container.provider_kind().as_str(),
        container.settings()
    );
    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "chatloop",
            "ask",
            "Hi",
            "--provider",
            "mock",
            "--temperature",
            "0.2",
        ])
        .unwrap();

        assert_eq!(cli.provider, ProviderKind::Mock);
        assert_eq!(cli.temperature, 0.2);
        assert!(matches!(cli.command, Commands::Ask { .. }));
    }

    #[test]
    fn render_collects_repeated_turns() {
        let cli = Cli::try_parse_from([
            "chatloop",
            "render",
            "--turn",
            "system:Be brief.",
            "--turn",
            "user:Hi",
        ])
        .unwrap();

        match cli.command {
            Commands::Render { turn } => assert_eq!(turn, vec!["system:Be brief.", "user:Hi"]),
            _ => panic!("expected render command"),
        }
        assert_eq!(cli.system, chatloop::connector::DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let res = Cli::try_parse_from(["chatloop", "--provider", "openai", "chat"]);
        assert!(res.is_err());
    }
}
