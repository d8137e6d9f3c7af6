use clap::Subcommand;
use serde_json::json;

use crate::auth::JwtKeys;
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::{DatabaseManager, PgUserStore};
use crate::grams::StoreError;
use crate::users::{normalize_email, UserStore};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Register a user")]
    Add {
        #[arg(help = "Email address")]
        email: String,
    },

    #[command(about = "Issue an access token for a user")]
    Token {
        #[arg(help = "Email address")]
        email: String,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = super::connect().await?;
    let users = PgUserStore::new(pool.clone());

    let result = match cmd {
        UserCommands::Add { email } => add(&users, &email, &output_format).await,
        UserCommands::Token { email } => token(&users, &email, &output_format).await,
    };

    DatabaseManager::close(&pool).await;
    result
}

async fn add(users: &dyn UserStore, email: &str, output_format: &OutputFormat) -> anyhow::Result<()> {
    if !looks_like_email(email) {
        anyhow::bail!("'{}' is not an email address", email);
    }

    match users.create(email).await {
        Ok(user) => output_success(
            output_format,
            &format!("User {} registered", user.email),
            Some(json!({ "user": user })),
        ),
        Err(StoreError::Conflict(msg)) => {
            output_error(output_format, &msg)?;
            anyhow::bail!("user already exists")
        }
        Err(e) => Err(e.into()),
    }
}

async fn token(users: &dyn UserStore, email: &str, output_format: &OutputFormat) -> anyhow::Result<()> {
    let Some(user) = users.find_by_email(email).await? else {
        anyhow::bail!("no user registered as {}", normalize_email(email));
    };

    let keys = JwtKeys::from_config(&config().security)?;
    let token = keys.issue(&user)?;

    match output_format {
        OutputFormat::Json => output_success(
            output_format,
            &format!("Token issued for {}", user.email),
            Some(json!({
                "token": token,
                "user": user,
                "expires_in_hours": keys.expiry_hours(),
            })),
        ),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}

fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !email.contains(char::is_whitespace),
        None => false,
    }
}
