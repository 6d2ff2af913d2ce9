//! Populate the database with sample accounts and feedback entries.
//!
//! Intended for local development: runs the schema migrations, registers two
//! users through the real account service, and posts a few entries for them.
//! Re-running against an already-seeded database logs the duplicate
//! collisions and leaves existing rows untouched.

use std::env;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use feedback_backend::domain::{
    AccountService, EmailAddress, ErrorCode, FeedbackContent, FeedbackService, FeedbackTitle,
    NewAccount, NewFeedback, PersonName, Username,
};
use feedback_backend::outbound::persistence::{
    DbPool, DieselFeedbackRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};

struct SampleAccount {
    username: &'static str,
    password: &'static str,
    email: &'static str,
    first_name: &'static str,
    last_name: &'static str,
}

struct SampleEntry {
    owner: &'static str,
    title: &'static str,
    content: &'static str,
}

const ACCOUNTS: [SampleAccount; 2] = [
    SampleAccount {
        username: "pete.d",
        password: "hack9sh9q",
        email: "pete@example.com",
        first_name: "Pete",
        last_name: "Davidson",
    },
    SampleAccount {
        username: "patrick15",
        password: "TBd9g09t",
        email: "patrick@example.com",
        first_name: "Patrick",
        last_name: "Mahomes",
    },
];

const ENTRIES: [SampleEntry; 3] = [
    SampleEntry {
        owner: "pete.d",
        title: "Signup flow is smooth",
        content: "Registering took under a minute and the session stuck around. Nice work.",
    },
    SampleEntry {
        owner: "pete.d",
        title: "Editing my own posts",
        content: "Being able to fix typos in my own entries without asking anyone is great.",
    },
    SampleEntry {
        owner: "patrick15",
        title: "Listing page ordering",
        content: "The feedback list order seems arbitrary. Newest-first would read better.",
    },
];

fn sample_account(sample: &SampleAccount) -> std::io::Result<NewAccount> {
    let build = || -> Result<NewAccount, Box<dyn std::error::Error + Send + Sync>> {
        Ok(NewAccount::new(
            Username::new(sample.username)?,
            sample.password,
            EmailAddress::new(sample.email)?,
            PersonName::new(sample.first_name)?,
            PersonName::new(sample.last_name)?,
        )?)
    };
    build().map_err(std::io::Error::other)
}

fn sample_entry(sample: &SampleEntry) -> std::io::Result<NewFeedback> {
    let build = || -> Result<NewFeedback, Box<dyn std::error::Error + Send + Sync>> {
        Ok(NewFeedback {
            title: FeedbackTitle::new(sample.title)?,
            content: FeedbackContent::new(sample.content)?,
            owner: Username::new(sample.owner)?,
        })
    };
    build().map_err(std::io::Error::other)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        warn!(error = %e, "tracing init failed");
    }

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;

    let migration_url = database_url.clone();
    tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
        .await
        .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
        .map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(std::io::Error::other)?;
    let accounts = AccountService::new(Arc::new(DieselUserRepository::new(pool.clone())));
    let feedback = FeedbackService::new(Arc::new(DieselFeedbackRepository::new(pool)));

    let mut created_accounts = false;
    for sample in &ACCOUNTS {
        match accounts.register(sample_account(sample)?).await {
            Ok(user) => {
                created_accounts = true;
                info!(username = %user.username(), "seeded account");
            }
            Err(err) if err.code() == ErrorCode::Conflict => {
                info!(username = sample.username, "account already present, skipping");
            }
            Err(err) => return Err(std::io::Error::other(err)),
        }
    }

    if !created_accounts {
        info!("database already seeded, leaving feedback entries untouched");
        return Ok(());
    }

    for sample in &ENTRIES {
        let created = feedback
            .create(sample_entry(sample)?)
            .await
            .map_err(std::io::Error::other)?;
        info!(id = %created.id(), owner = %created.owner(), "seeded feedback entry");
    }

    Ok(())
}
