use std::sync::Arc;

use crate::account::AccountService;
use crate::auth::AuthService;
use crate::gatekeeper::Gatekeeper;
use crate::storage::{AccountLedger, CredentialStore, TransferRecordStore};
use crate::transfer::{TransferCoordinator, TransferOptions};

/// Shared gateway state
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub coordinator: Arc<TransferCoordinator>,
    pub accounts: Arc<AccountService>,
}

impl AppState {
    pub fn new(
        auth: Arc<AuthService>,
        coordinator: Arc<TransferCoordinator>,
        accounts: Arc<AccountService>,
    ) -> Self {
        Self {
            auth,
            coordinator,
            accounts,
        }
    }

    /// Wire every service over one store that serves all three roles.
    pub fn from_store<S>(gatekeeper: Arc<Gatekeeper>, store: Arc<S>, options: TransferOptions) -> Self
    where
        S: CredentialStore + AccountLedger + TransferRecordStore + 'static,
    {
        let auth = Arc::new(AuthService::new(
            gatekeeper,
            store.clone(),
            store.clone(),
            options.timeout,
        ));
        let accounts = Arc::new(AccountService::new(
            store.clone(),
            store.clone(),
            options.timeout,
        ));
        let coordinator = Arc::new(TransferCoordinator::new(
            auth.clone(),
            store.clone(),
            store,
            options,
        ));
        Self::new(auth, coordinator, accounts)
    }
}
