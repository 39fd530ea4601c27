//! Account CLI commands.

use clap::{Args, Subcommand};

use esbox_core::error::AppError;
use esbox_core::result::AppResult;
use esbox_entity::auth::{LoginRequest, RegisterRequest};
use esbox_service::AppContext;

use crate::output::{self, OutputFormat};

/// Arguments for auth commands
#[derive(Debug, Args)]
pub struct AuthArgs {
    /// Auth subcommand
    #[command(subcommand)]
    pub command: AuthCommand,
}

/// Auth subcommands
#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Sign in and save the session token
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password (will prompt twice if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Sign out and forget the saved token
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Send a password reset link
    ForgotPassword {
        /// Account email
        email: String,
    },
    /// Set a new password using a reset token
    ResetPassword {
        /// Token from the reset link
        token: String,
        /// New password (will prompt twice if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Confirm an email address
    VerifyEmail {
        /// Token from the verification link
        token: String,
    },
}

/// Execute auth commands
pub async fn execute(args: &AuthArgs, ctx: &AppContext, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        AuthCommand::Login { email, password } => {
            let password = match password {
                Some(p) => p.clone(),
                None => output::password("Password", None)?,
            };
            let user = ctx
                .auth
                .login(&LoginRequest {
                    email: email.clone(),
                    password,
                })
                .await?;
            output::print_success(&format!("Signed in as {}", user.username));
        }
        AuthCommand::Register {
            username,
            email,
            password,
        } => {
            let password = match password {
                Some(p) => p.clone(),
                None => output::password("Password", Some("Confirm password"))?,
            };
            let message = ctx
                .auth
                .register(&RegisterRequest {
                    username: username.clone(),
                    email: email.clone(),
                    confirm_password: password.clone(),
                    password,
                })
                .await?;
            output::print_success(&message);
        }
        AuthCommand::Logout => {
            ctx.auth.logout().await?;
            output::print_success("Signed out");
        }
        AuthCommand::Whoami => match ctx.auth.user().await {
            Some(user) => match format {
                OutputFormat::Json => output::print_item(&user, format),
                OutputFormat::Table => {
                    output::print_kv("ID", &user.id.to_string());
                    output::print_kv("Username", &user.username);
                    output::print_kv("Email", &user.email);
                }
            },
            None => return Err(AppError::authentication("Not signed in")),
        },
        AuthCommand::ForgotPassword { email } => {
            let message = ctx.auth.forgot_password(email).await?;
            output::print_success(&message);
        }
        AuthCommand::ResetPassword { token, password } => {
            let (password, confirm) = match password {
                Some(p) => (p.clone(), p.clone()),
                None => {
                    let p = output::password("New password", Some("Confirm password"))?;
                    (p.clone(), p)
                }
            };
            let message = ctx.auth.reset_password(token, &password, &confirm).await?;
            output::print_success(&message);
        }
        AuthCommand::VerifyEmail { token } => {
            let message = ctx.auth.verify_email(token).await?;
            output::print_success(&message);
        }
    }

    Ok(())
}
