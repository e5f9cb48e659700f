//! Default project and account seeding.

use sea_orm::{DatabaseConnection, DbErr};
use shootlogix_core::auth::{PasswordError, Role, hash_password};
use thiserror::Error;

use crate::repositories::{
    CreateProductionInput, MembershipRepository, ProductionError, ProductionRepository,
    UserRepository,
};

/// Production every default account joins.
pub const DEFAULT_PRODUCTION: &str = "KLAS7";

/// A default login account.
#[derive(Debug, Clone, Copy)]
pub struct DefaultAccount {
    /// Login name.
    pub nickname: &'static str,
    /// Initial password.
    pub password: &'static str,
    /// Role in [`DEFAULT_PRODUCTION`].
    pub role: Role,
    /// Global administrator flag.
    pub is_admin: bool,
}

/// Accounts created on first start.
pub const DEFAULT_ACCOUNTS: [DefaultAccount; 4] = [
    DefaultAccount {
        nickname: "ADMIN",
        password: "@dm1NKL",
        role: Role::Admin,
        is_admin: true,
    },
    DefaultAccount {
        nickname: "UNIT",
        password: "UN1Tkl@",
        role: Role::Unit,
        is_admin: false,
    },
    DefaultAccount {
        nickname: "TRANSPORT",
        password: "Tr@nsp0kl",
        role: Role::Transpo,
        is_admin: false,
    },
    DefaultAccount {
        nickname: "READER",
        password: "Re@derKL1",
        role: Role::Reader,
        is_admin: false,
    },
];

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Password hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Default production could not be created.
    #[error(transparent)]
    Production(#[from] ProductionError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// What a seeding run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Whether the default production was created.
    pub production_created: bool,
    /// Users created.
    pub users_created: usize,
    /// Memberships created.
    pub memberships_created: usize,
}

/// Ensures the default production and accounts exist.
///
/// Existing users keep their passwords; only missing memberships are added.
///
/// # Errors
///
/// Returns an error if hashing or a database write fails.
pub async fn seed_default_accounts(db: &DatabaseConnection) -> Result<SeedReport, SeedError> {
    let productions = ProductionRepository::new(db.clone());
    let users = UserRepository::new(db.clone());
    let memberships = MembershipRepository::new(db.clone());
    let mut report = SeedReport::default();

    let production = match productions.find_by_name(DEFAULT_PRODUCTION).await? {
        Some(p) => {
            productions.seed_departments(p.id).await?;
            p
        }
        None => {
            report.production_created = true;
            productions
                .create(CreateProductionInput {
                    name: DEFAULT_PRODUCTION.to_string(),
                    status: Some("active".to_string()),
                    ..Default::default()
                })
                .await?
        }
    };

    for account in DEFAULT_ACCOUNTS {
        let user = match users.find_by_nickname(account.nickname).await? {
            Some(u) => u,
            None => {
                let hash = hash_password(account.password)?;
                report.users_created += 1;
                users
                    .create(account.nickname, &hash, account.is_admin)
                    .await?
            }
        };
        if memberships
            .ensure(user.id, production.id, account.role)
            .await?
        {
            report.memberships_created += 1;
        }
    }

    tracing::info!(
        production = DEFAULT_PRODUCTION,
        users_created = report.users_created,
        memberships_created = report.memberships_created,
        "Default accounts seeded"
    );
    Ok(report)
}
