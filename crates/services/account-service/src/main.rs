//! Account Service - command-line front end for the account core.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use account_service_lib::config::AccountServiceConfig;
use account_service_lib::DemoInput;
use common::AppError;
use domain::{Email, Password, Phone};

#[derive(Parser)]
#[command(name = "account-service")]
#[command(about = "Account identity tools: value validation, password hashing, lifecycle demo")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and normalize an email address, showing its domain
    ValidateEmail { address: String },
    /// Validate a phone number and describe its parts
    ValidatePhone { number: String },
    /// Hash a password with the account hashing parameters
    HashPassword { password: String },
    /// Check a candidate password against a stored hash
    VerifyPassword {
        #[arg(long)]
        hash: String,
        candidate: String,
    },
    /// Walk an account through register and every update operation
    Demo {
        #[arg(long, default_value = "usuario@example.com")]
        email: String,
        #[arg(long, default_value = "Senha123!")]
        password: String,
        #[arg(long, default_value = "(11) 98765-4321")]
        phone: String,
        #[arg(long, default_value = "(47) 3333-4444")]
        new_phone: String,
        #[arg(long, default_value = "novo@example.com")]
        new_email: String,
        #[arg(long, default_value = "NovaSenha456!")]
        new_password: String,
    },
}

/// Exit status for input the caller can correct.
const EXIT_REJECTED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let config = AccountServiceConfig::from_env();
    common::init_tracing(&config.service());

    let cli = Cli::parse();

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.to_response().to_json());
            if e.is_client_error() {
                ExitCode::from(EXIT_REJECTED)
            } else {
                tracing::error!(error = %e, "command failed");
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(command: Commands, config: &AccountServiceConfig) -> Result<(), AppError> {
    match command {
        Commands::ValidateEmail { address } => {
            let email = Email::new(&address)?;
            print_json(&json!({
                "email": email.as_str(),
                "domain": email.domain(),
            }))?;
        }
        Commands::ValidatePhone { number } => {
            let phone = Phone::new(&number)?;
            print_json(&json!({
                "number": phone.number(),
                "display": phone.to_string(),
                "area_code": phone.area_code(),
                "mobile": phone.is_mobile(),
            }))?;
        }
        Commands::HashPassword { password } => {
            let password = Password::new(&password)?;
            println!("{}", password.as_str());
        }
        Commands::VerifyPassword { hash, candidate } => {
            let password = Password::from_hash(hash)?;
            println!("{}", password.verify(&candidate));
        }
        Commands::Demo {
            email,
            password,
            phone,
            new_phone,
            new_email,
            new_password,
        } => {
            let input = DemoInput {
                email,
                password,
                phone,
                new_phone,
                new_email,
                new_password,
            };
            for step in account_service_lib::run_demo(config, input).await? {
                print_json(&step)?;
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let line = serde_json::to_string(value)
        .map_err(|e| AppError::internal(format!("serialization failed: {}", e)))?;
    println!("{}", line);
    Ok(())
}
