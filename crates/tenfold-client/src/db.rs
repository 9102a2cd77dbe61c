//! Durable session snapshot storage.
//!
//! One redb table with three well-known string keys. The keys are
//! independent on purpose: the tenant entry comes and goes with the role of
//! the logged-in user, and a partially written snapshot must be detectable
//! (and discardable) at restore time.

use std::path::PathBuf;

use redb_bincode::{ReadTransaction, TableDefinition, WriteTransaction};
use snafu::ResultExt as _;
use tracing::debug;

use crate::error::{CommitSnafu, CreateDirSnafu, DatabaseSnafu, DbResult, JoinSnafu, TransactionSnafu};

const LOG_TARGET: &str = "tenfold::client::db";

/// Bearer token of the current session.
pub const TOKEN_KEY: &str = "accessToken";
/// JSON-serialized [`tenfold_core::User`] record.
pub const USER_KEY: &str = "userData";
/// Active tenant identifier; present only for non-superuser sessions.
pub const TENANT_KEY: &str = "tenantId";

const SESSION_TABLE: TableDefinition<String, String> = TableDefinition::new("tenfold::session");

/// The durable snapshot exactly as stored, before any validation.
///
/// `user_json` is kept as a string here; deciding whether it parses (and
/// what to do when it does not) is the session store's call.
#[derive(Debug, Default, Clone)]
pub struct PersistedSession {
    pub token: Option<String>,
    pub user_json: Option<String>,
    pub tenant_id: Option<String>,
}

impl PersistedSession {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.user_json.is_none() && self.tenant_id.is_none()
    }
}

#[derive(Debug)]
pub struct SessionDb {
    inner: redb_bincode::Database,
}

impl SessionDb {
    pub async fn open(path: impl Into<PathBuf>) -> DbResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.context(CreateDirSnafu)?;
        }

        debug!(target: LOG_TARGET, path = %path.display(), "Opening session database");
        let inner = tokio::task::spawn_blocking(move || redb_bincode::Database::create(path))
            .await
            .context(JoinSnafu)?
            .context(DatabaseSnafu)?;

        let s = Self { inner };
        // Make sure the table exists so a fresh database reads as an empty
        // session rather than a missing table.
        s.write_with(|dbtx| {
            dbtx.open_table(&SESSION_TABLE)?;
            Ok(())
        })
        .await?;

        Ok(s)
    }

    async fn write_with<T>(&self, f: impl FnOnce(&WriteTransaction) -> DbResult<T>) -> DbResult<T> {
        tokio::task::block_in_place(|| {
            let dbtx = self.inner.begin_write().context(TransactionSnafu)?;

            let res = f(&dbtx)?;

            dbtx.commit().context(CommitSnafu)?;

            Ok(res)
        })
    }

    async fn read_with<T>(&self, f: impl FnOnce(&ReadTransaction) -> DbResult<T>) -> DbResult<T> {
        tokio::task::block_in_place(|| {
            let dbtx = self.inner.begin_read().context(TransactionSnafu)?;

            f(&dbtx)
        })
    }

    /// Read the whole snapshot in one consistent view.
    pub async fn load(&self) -> DbResult<PersistedSession> {
        self.read_with(|dbtx| {
            let table = dbtx.open_table(&SESSION_TABLE)?;

            Ok(PersistedSession {
                token: table.get(&TOKEN_KEY.to_owned())?.map(|g| g.value()),
                user_json: table.get(&USER_KEY.to_owned())?.map(|g| g.value()),
                tenant_id: table.get(&TENANT_KEY.to_owned())?.map(|g| g.value()),
            })
        })
        .await
    }

    /// Persist a freshly authenticated session in one transaction.
    ///
    /// `tenant_id = None` actively removes the tenant entry, so a superuser
    /// login wipes whatever a previous tenant session left behind.
    pub async fn store_login(
        &self,
        token: &str,
        user_json: &str,
        tenant_id: Option<&str>,
    ) -> DbResult<()> {
        let token = token.to_owned();
        let user_json = user_json.to_owned();
        let tenant_id = tenant_id.map(ToOwned::to_owned);

        self.write_with(|dbtx| {
            let mut table = dbtx.open_table(&SESSION_TABLE)?;

            table.insert(&TOKEN_KEY.to_owned(), &token)?;
            table.insert(&USER_KEY.to_owned(), &user_json)?;
            match &tenant_id {
                Some(tenant_id) => {
                    table.insert(&TENANT_KEY.to_owned(), tenant_id)?;
                }
                None => {
                    table.remove(&TENANT_KEY.to_owned())?;
                }
            }

            Ok(())
        })
        .await
    }

    /// Remove all three entries.
    pub async fn clear(&self) -> DbResult<()> {
        debug!(target: LOG_TARGET, "Clearing session snapshot");
        self.write_with(|dbtx| {
            let mut table = dbtx.open_table(&SESSION_TABLE)?;

            table.remove(&TOKEN_KEY.to_owned())?;
            table.remove(&USER_KEY.to_owned())?;
            table.remove(&TENANT_KEY.to_owned())?;

            Ok(())
        })
        .await
    }

    /// Overwrite a single raw entry. Diagnostics and tests only; normal
    /// session flow always writes through [`Self::store_login`].
    pub async fn store_raw(&self, key: &'static str, value: &str) -> DbResult<()> {
        let value = value.to_owned();
        self.write_with(|dbtx| {
            let mut table = dbtx.open_table(&SESSION_TABLE)?;

            table.insert(&key.to_owned(), &value)?;

            Ok(())
        })
        .await
    }
}
