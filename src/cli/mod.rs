//! CLI module - Command-line interface for the cookbook server

mod commands;

use clap::{Parser, Subcommand};

/// Cookbook - recipe favorites backend
#[derive(Parser)]
#[command(name = "cookbook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    #[command(alias = "-d", alias = "--daemon")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Create an administrator account
    CreateAdmin {
        /// Login name
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "Admin")]
        first_name: String,
        #[arg(long, default_value = "User")]
        last_name: String,
    },
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["cookbook"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_create_admin() {
        let cli = Cli::try_parse_from([
            "cookbook",
            "create-admin",
            "root",
            "--password",
            "hunter22",
            "--email",
            "root@example.com",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::CreateAdmin {
                username,
                first_name,
                ..
            }) => {
                assert_eq!(username, "root");
                assert_eq!(first_name, "Admin");
            }
            _ => panic!("expected create-admin"),
        }
    }

    #[test]
    fn test_create_admin_requires_password() {
        assert!(Cli::try_parse_from(["cookbook", "create-admin", "root", "--email", "r@x.io"]).is_err());
    }
}
