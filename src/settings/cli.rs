use super::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "loginstore", about = "Record user logins in a relational store")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record one login per username
    Login {
        #[arg(required = true)]
        usernames: Vec<String>,
    },
    /// Print a user's record as JSON
    Show { username: String },
    /// Apply pending migrations (mysql backend only)
    Migrate,
}
