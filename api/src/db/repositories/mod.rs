// Database repository management

mod profile_repository;
mod support_log_repository;

pub use profile_repository::{ProfileFields, ProfileRepository, NFT_MINT_PENDING};
pub use support_log_repository::{NewSupportLog, SupportLogRepository};

use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, DbErr, Statement};

/// Container for all database repositories
pub struct Repositories {
    pub profile: ProfileRepository,
    pub support_log: SupportLogRepository,
    conn: DatabaseConnection,
}

impl Repositories {
    /// Creates a new repositories container with database connection
    pub fn new(conn: DatabaseConnection) -> Self {
        Repositories {
            profile: ProfileRepository::new(conn.clone()),
            support_log: SupportLogRepository::new(conn.clone()),
            conn,
        }
    }

    /// Round-trips a trivial statement to verify connectivity
    pub async fn ping(&self) -> bool {
        self.conn.ping().await.is_ok()
    }
}

/// Serializes transactions touching one wallet's profile row and support count.
///
/// On Postgres this takes a transaction-scoped advisory lock keyed on the
/// checksummed address, so a profile insert and a support entry for the same
/// wallet cannot interleave. SQLite already serializes writers.
async fn lock_wallet<C: ConnectionTrait>(conn: &C, wallet: &str) -> Result<(), DbErr> {
    if let Some(stmt) = wallet_lock_statement(conn.get_database_backend(), wallet) {
        conn.execute(stmt).await?;
    }
    Ok(())
}

fn wallet_lock_statement(backend: DbBackend, wallet: &str) -> Option<Statement> {
    match backend {
        DbBackend::Postgres => Some(Statement::from_sql_and_values(
            backend,
            "SELECT pg_advisory_xact_lock(hashtext($1))",
            [wallet.into()],
        )),
        _ => None,
    }
}
