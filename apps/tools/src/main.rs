use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shared::domain::{ContactRecord, ContactUpdate};
use storage::{ContactStore, Storage};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/contact.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the stored contact.
    Show,
    /// Overwrite only the fields that are passed; `--last ""` clears a field.
    Set {
        #[arg(long)]
        first: Option<String>,
        #[arg(long)]
        last: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;
    let contacts = ContactStore::new(Arc::new(storage));

    match cli.command {
        Command::Show => {
            print_contact(&contacts.get().await?);
        }
        Command::Set { first, last, email } => {
            let update = ContactUpdate { first, last, email };
            if update.is_empty() {
                anyhow::bail!("nothing to update; pass at least one of --first, --last, --email");
            }
            let contact = contacts.update(update).await?;
            info!(database_url = %cli.database_url, "contact updated");
            print_contact(&contact);
        }
    }

    Ok(())
}

fn print_contact(contact: &ContactRecord) {
    println!("first={}", contact.first);
    println!("last={}", contact.last);
    println!("email={}", contact.email);
}
