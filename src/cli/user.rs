use crate::{services::auth, Config, Database};
use anyhow::Result;
use std::path::Path;

use super::UserCommand;

pub async fn run(config_path: &Path, command: UserCommand) -> Result<()> {
    let config = Config::load(config_path)?;
    let db = Database::open(&config.database.path)?;

    match command {
        UserCommand::Add {
            username,
            email,
            password,
        } => {
            let password = match password {
                Some(p) => p,
                None => {
                    let p = rpassword::prompt_password("Password: ")?;
                    let p_confirm = rpassword::prompt_password("Confirm password: ")?;
                    if p != p_confirm {
                        anyhow::bail!("Passwords do not match");
                    }
                    p
                }
            };

            auth::create_user(&db, &username, &email, &password)?;
            tracing::info!("User '{}' created", username);
        }
        UserCommand::List => {
            let users = auth::list_users(&db)?;

            println!("{:<20} {:<30}", "USERNAME", "EMAIL");
            println!("{}", "-".repeat(50));
            for user in users {
                println!("{:<20} {:<30}", user.username, user.email);
            }
        }
        UserCommand::Remove { username } => {
            if auth::delete_user(&db, &username)? {
                tracing::info!("User '{}' removed", username);
            } else {
                tracing::warn!("User '{}' not found", username);
            }
        }
        UserCommand::Passwd { username } => {
            let password = rpassword::prompt_password("New password: ")?;
            let password_confirm = rpassword::prompt_password("Confirm password: ")?;

            if password != password_confirm {
                anyhow::bail!("Passwords do not match");
            }

            auth::update_password(&db, &username, &password)?;
            tracing::info!("Password updated for '{}'", username);
        }
    }

    Ok(())
}
