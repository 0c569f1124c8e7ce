//! Course Rewards Controller (v1)
//!
//! Terminal presentation layer over the course workflow controller.
//!
//! # Architecture Overview
//!
//! ```text
//!   stdin command ──▶ CourseWorkflowController ──▶ TransactionDispatcher
//!                          │        ▲                  │          │
//!                          │        │          sign & submit   await finality
//!                          ▼        │                  ▼          ▼
//!                   CourseWorkflowState         WalletProvider  LedgerRpc
//!                          │                   (LocalWallet)   (AptosRestClient)
//!                          ▼
//!   stdout ◀────────── StatusReporter
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use course_rewards::config::{load_config, ControllerConfig};
use course_rewards::observability::logging;
use course_rewards::{AptosRestClient, CourseWorkflowController, LocalWallet, WalletProvider};

#[derive(Parser)]
#[command(name = "course-rewards")]
#[command(about = "Drive the course reward workflow from a terminal", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive workflow session (default)
    Session,
    /// Print the account address of COURSE_REWARDS_PRIVATE_KEY
    Address,
}

/// One line of session input.
#[derive(Debug, PartialEq, Eq)]
enum SessionCommand {
    Connect,
    CreateCourse(u64),
    Enroll,
    RequestReward,
    Approve(String),
    State,
    Help,
    Quit,
}

impl SessionCommand {
    /// `Ok(None)` for blank lines.
    fn parse(line: &str, default_reward: u64) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let arg = words.next();

        let command = match verb {
            "connect" => SessionCommand::Connect,
            "create-course" => match arg {
                Some(reward) => SessionCommand::CreateCourse(
                    reward
                        .parse()
                        .map_err(|e| format!("Invalid reward '{}': {}", reward, e))?,
                ),
                None => SessionCommand::CreateCourse(default_reward),
            },
            "enroll" => SessionCommand::Enroll,
            "request-reward" => SessionCommand::RequestReward,
            "approve" => SessionCommand::Approve(arg.unwrap_or_default().to_string()),
            "state" => SessionCommand::State,
            "help" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
        };
        Ok(Some(command))
    }
}

const HELP: &str = "\
Commands:
  connect                 connect the wallet
  create-course [reward]  create a course with a completion reward
  enroll                  enroll the connected account
  request-reward          request the completion reward
  approve <address>       approve and transfer a student's reward
  state                   show local workflow state
  quit                    leave the session";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ControllerConfig::default(),
    };
    logging::init(&config.logging);

    tracing::info!(
        node_url = %config.network.node_url,
        module_address = %config.module.address,
        module_name = %config.module.name,
        "Configuration loaded"
    );

    let client = AptosRestClient::new(config.network.clone(), config.finality.clone())?;

    match cli.command.unwrap_or(Commands::Session) {
        Commands::Address => {
            let wallet = LocalWallet::from_env(client, config.gas.clone())?;
            println!("{}", wallet.address());
        }
        Commands::Session => run_session(config, client).await?,
    }

    Ok(())
}

async fn run_session(
    config: ControllerConfig,
    client: AptosRestClient,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider: Option<Arc<dyn WalletProvider>> =
        match LocalWallet::from_env(client.clone(), config.gas.clone()) {
            Ok(wallet) => Some(Arc::new(wallet)),
            Err(e) => {
                tracing::warn!(error = %e, "No wallet provider available");
                None
            }
        };

    let mut controller = CourseWorkflowController::from_config(provider, Arc::new(client), &config);

    let mut reports = controller.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match reports.recv().await {
                Ok(report) => println!("{}", report.message),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Status output fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match SessionCommand::parse(&line, config.workflow.default_completion_reward) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{}", message);
                continue;
            }
        };

        // Outcomes are printed by the status printer.
        match command {
            SessionCommand::Connect => {
                let _ = controller.connect().await;
            }
            SessionCommand::CreateCourse(reward) => {
                let _ = controller.create_course(reward).await;
            }
            SessionCommand::Enroll => {
                let _ = controller.enroll().await;
            }
            SessionCommand::RequestReward => {
                let _ = controller.request_reward().await;
            }
            SessionCommand::Approve(student) => {
                let _ = controller.approve_reward(&student).await;
            }
            SessionCommand::State => {
                println!("{}", serde_json::to_string_pretty(controller.state())?);
            }
            SessionCommand::Help => println!("{}", HELP),
            SessionCommand::Quit => break,
        }
    }

    drop(controller);
    printer.await?;
    tracing::info!("Session closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(SessionCommand::parse("", 100), Ok(None));
        assert_eq!(SessionCommand::parse("  connect ", 100), Ok(Some(SessionCommand::Connect)));
        assert_eq!(
            SessionCommand::parse("create-course", 100),
            Ok(Some(SessionCommand::CreateCourse(100)))
        );
        assert_eq!(
            SessionCommand::parse("create-course 250", 100),
            Ok(Some(SessionCommand::CreateCourse(250)))
        );
        assert_eq!(
            SessionCommand::parse("approve abc123", 100),
            Ok(Some(SessionCommand::Approve("abc123".to_string())))
        );
        assert_eq!(
            SessionCommand::parse("approve", 100),
            Ok(Some(SessionCommand::Approve(String::new())))
        );
        assert_eq!(SessionCommand::parse("exit", 100), Ok(Some(SessionCommand::Quit)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(SessionCommand::parse("create-course lots", 100)
            .unwrap_err()
            .contains("Invalid reward"));
        assert!(SessionCommand::parse("dance", 100).unwrap_err().contains("Unknown command"));
    }
}
