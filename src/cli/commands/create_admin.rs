//! Create admin command handler

use crate::api::validation::validate_new_user;
use crate::config::Config;
use crate::models::user::NewUser;
use crate::state::SharedState;

pub async fn cmd_create_admin(config: Config, new_user: NewUser) -> anyhow::Result<()> {
    let new_user = NewUser {
        is_admin: true,
        ..new_user
    };
    validate_new_user(&new_user)?;

    let shared = SharedState::new(config).await?;
    let user = shared.user_service.register(new_user).await?;

    println!("✓ Created admin user '{}'", user.username);
    println!();
    println!("Request a token with: POST /auth/token");

    Ok(())
}
