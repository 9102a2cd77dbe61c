use std::path::PathBuf;
use std::sync::RwLock;

use tenfold_core::{TenantId, User};
use tenfold_util_error::FmtCompact as _;
use tracing::{debug, warn};

use crate::db::SessionDb;
use crate::error::DbResult;
use crate::scope::RequestScope;

const LOG_TARGET: &str = "tenfold::client::session";

/// Who is logged in, and with what scope.
///
/// `is_admin` and `is_authenticated` are derived on every call rather than
/// stored, so they can never go stale relative to the user record.
#[derive(Debug, Default, Clone)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
    tenant_id: Option<TenantId>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.is_superuser)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn tenant_id(&self) -> Option<&TenantId> {
        self.tenant_id.as_ref()
    }

    /// Authorization snapshot for shaping one outgoing request.
    ///
    /// Admin sessions never expose a tenant id here, no matter what ended
    /// up in the `tenant_id` field, so stale tenant state cannot leak onto
    /// an admin request.
    pub fn scope(&self) -> RequestScope {
        let is_admin = self.is_admin();
        RequestScope {
            token: self.token.clone(),
            is_admin,
            tenant_id: if is_admin { None } else { self.tenant_id.clone() },
        }
    }
}

/// Single source of truth for the console's one session.
///
/// Owned by [`crate::Client`] and handed around by reference. Restores
/// itself from the durable snapshot when opened; every populated state it
/// exposes carries both a token and a user, never half of either.
#[derive(Debug)]
pub struct SessionStore {
    db: SessionDb,
    state: RwLock<Session>,
}

impl SessionStore {
    pub async fn open(path: impl Into<PathBuf>) -> DbResult<Self> {
        Self::restore(SessionDb::open(path).await?).await
    }

    /// Restore from an already opened database.
    ///
    /// A snapshot whose user record does not parse is corrupt: all durable
    /// entries are removed and the store starts unauthenticated. The same
    /// goes for a partial snapshot (token without user or user without
    /// token), which a crash between writes could leave behind.
    pub async fn restore(db: SessionDb) -> DbResult<Self> {
        let persisted = db.load().await?;
        let leftover_tenant = persisted.tenant_id.is_some();

        let session = match (persisted.token, persisted.user_json) {
            (Some(token), Some(user_json)) => match serde_json::from_str::<User>(&user_json) {
                Ok(user) => {
                    // A superuser session ignores whatever tenant entry a
                    // previous login persisted; the entry itself is
                    // rewritten on the next login.
                    let tenant_id = if user.is_superuser {
                        None
                    } else {
                        persisted.tenant_id.map(TenantId::from)
                    };
                    debug!(
                        target: LOG_TARGET,
                        user = %user.email,
                        admin = user.is_superuser,
                        "Restored session"
                    );
                    Session {
                        token: Some(token),
                        user: Some(user),
                        tenant_id,
                    }
                }
                Err(err) => {
                    warn!(
                        target: LOG_TARGET,
                        err = %err.fmt_compact(),
                        "Corrupt user record in session snapshot, discarding session"
                    );
                    db.clear().await?;
                    Session::default()
                }
            },
            (None, None) => {
                // A lone tenant entry is as partial as a lone token.
                if leftover_tenant {
                    db.clear().await?;
                }
                Session::default()
            }
            _ => {
                debug!(target: LOG_TARGET, "Partial session snapshot, discarding");
                db.clear().await?;
                Session::default()
            }
        };

        Ok(Self {
            db,
            state: RwLock::new(session),
        })
    }

    /// Consistent copy of the current session, from one lock acquisition.
    pub fn snapshot(&self) -> Session {
        self.state.read().expect("Locking failed").clone()
    }

    /// Authorization snapshot for one request, from one lock acquisition.
    pub fn scope(&self) -> RequestScope {
        self.state.read().expect("Locking failed").scope()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().expect("Locking failed").is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.state.read().expect("Locking failed").is_admin()
    }

    pub fn db(&self) -> &SessionDb {
        &self.db
    }

    /// Publish a freshly authenticated session: durable snapshot first, so
    /// a failed write leaves the previous state fully intact, then memory.
    pub(crate) async fn set_logged_in(
        &self,
        token: String,
        user: User,
        tenant_id: Option<TenantId>,
    ) -> DbResult<()> {
        let user_json = serde_json::to_string(&user).expect("Can't fail");
        self.db
            .store_login(&token, &user_json, tenant_id.as_ref().map(TenantId::as_str))
            .await?;

        *self.state.write().expect("Locking failed") = Session {
            token: Some(token),
            user: Some(user),
            tenant_id,
        };

        Ok(())
    }

    /// Tear the session down: memory unconditionally, then the durable
    /// snapshot. Used by logout and by the 401 response path.
    pub(crate) async fn clear(&self) -> DbResult<()> {
        *self.state.write().expect("Locking failed") = Session::default();
        self.db.clear().await
    }
}
