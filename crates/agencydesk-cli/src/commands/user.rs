//! Staff account CLI commands.
//!
//! `user create` is how the first SUPER_ADMIN gets into a fresh database;
//! the API can only create accounts on behalf of an existing admin.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use agencydesk_auth::password::{PasswordHasher, PasswordValidator};
use agencydesk_core::config::AppConfig;
use agencydesk_core::error::AppError;
use agencydesk_core::types::pagination::PageRequest;
use agencydesk_database::UserRepository;
use agencydesk_database::store::UserStore;
use agencydesk_entity::user::{NewUser, Role, User, UserPatch};

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a staff account
    Create {
        /// Login email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
        /// Display name (prompted when omitted)
        #[arg(short, long)]
        name: Option<String>,
        /// Role: SMM, ADMIN or SUPER_ADMIN
        #[arg(short, long, default_value = "SMM")]
        role: Role,
        /// Password (prompted with confirmation when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// List staff accounts
    List {
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Accounts per page
        #[arg(long, default_value_t = 50)]
        per_page: u64,
    },
    /// Re-activate a staff account
    Enable {
        /// Login email
        email: String,
    },
    /// Deactivate a staff account
    Disable {
        /// Login email
        email: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: i64,
    email: String,
    name: String,
    role: String,
    active: bool,
    created_at: String,
    last_login: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            name: u.name.clone(),
            role: u.role.to_string(),
            active: u.is_active,
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
            last_login: u
                .last_login_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string()),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let db = super::create_db_pool(config).await?;
    let users = UserRepository::new(db.pool().clone());

    match &args.command {
        UserCommand::Create {
            email,
            name,
            role,
            password,
        } => {
            let email = prompt_or(email, "Email")?;
            let name = prompt_or(name, "Name")?;
            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            PasswordValidator::new(&config.auth)
                .validate(&password, &[email.as_str(), name.as_str()])?;
            let password_hash = PasswordHasher::new(&config.auth)?.hash_password(&password)?;

            let new_user = NewUser {
                email,
                name,
                password_hash,
                role: *role,
            }
            .validated()?;
            let user = users.create(&new_user).await?;

            output::print_success(&format!(
                "{} account '{}' created (id: {})",
                user.role, user.email, user.id
            ));
        }
        UserCommand::List { page, per_page } => {
            let page = users.list(PageRequest::new(*page, *per_page)).await?;
            let rows: Vec<UserRow> = page.items.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                output::print_kv(
                    "Page",
                    &format!("{} of {} ({} accounts)", page.page, page.total_pages, page.total),
                );
            }
        }
        UserCommand::Enable { email } => {
            set_active(&users, email, true).await?;
            output::print_success(&format!("User '{email}' enabled"));
        }
        UserCommand::Disable { email } => {
            set_active(&users, email, false).await?;
            output::print_success(&format!("User '{email}' disabled"));
            output::print_warning("Tokens already issued to this user stay valid until they expire.");
        }
    }

    db.close().await;
    Ok(())
}

async fn set_active(users: &UserRepository, email: &str, is_active: bool) -> Result<(), AppError> {
    let user = users
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))?;

    let patch = UserPatch {
        is_active: Some(is_active),
        ..UserPatch::default()
    };
    users.update(user.id, &patch).await?;
    Ok(())
}

fn prompt_or(value: &Option<String>, prompt: &str) -> Result<String, AppError> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {e}"))),
    }
}
