use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

use super::error::AccountError;
use super::models::{AccountTransfers, AccountView, NewAccount};
use super::validation::{AccountName, Cpf, validate_opening_balance, validate_secret};
use crate::auth::hash_secret;
use crate::core_types::AccountId;
use crate::storage::{Account, AccountLedger, TransferRecordStore, new_account_id, with_timeout};

/// Account provisioning and read-side queries.
pub struct AccountService {
    ledger: Arc<dyn AccountLedger>,
    records: Arc<dyn TransferRecordStore>,
    timeout: Duration,
}

impl AccountService {
    pub fn new(
        ledger: Arc<dyn AccountLedger>,
        records: Arc<dyn TransferRecordStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            records,
            timeout,
        }
    }

    /// Validate `req`, hash its secret and store a new account.
    pub async fn create(&self, req: NewAccount) -> Result<AccountId, AccountError> {
        let name = AccountName::new(&req.name)?;
        let cpf = Cpf::new(&req.cpf)?;
        validate_secret(&req.secret)?;
        let balance = validate_opening_balance(req.balance)?;

        let account = Account {
            id: new_account_id(),
            name: name.into_string(),
            cpf: cpf.into_string(),
            secret_hash: hash_secret(&req.secret).map_err(AccountError::Hash)?,
            balance,
            created_at: Utc::now(),
        };
        let id = account.id.clone();

        if let Err(e) = with_timeout(self.timeout, self.ledger.create_account(account)).await {
            let e = AccountError::from(e);
            if matches!(e, AccountError::DuplicateCpf) {
                tracing::info!(cpf = %req.cpf.trim(), "Account rejected: cpf already registered");
            }
            return Err(e);
        }

        tracing::info!(account_id = %id, "Account created");
        Ok(id)
    }

    pub async fn list(&self) -> Result<Vec<AccountView>, AccountError> {
        let accounts = with_timeout(self.timeout, self.ledger.list_accounts()).await?;
        Ok(accounts.into_iter().map(AccountView::from).collect())
    }

    pub async fn balance(&self, account_id: &str) -> Result<Decimal, AccountError> {
        Ok(with_timeout(self.timeout, self.ledger.get_balance(account_id)).await?)
    }

    /// Transfers sent and received by `account_id`, each oldest first.
    pub async fn transfers(&self, account_id: &str) -> Result<AccountTransfers, AccountError> {
        let records = with_timeout(self.timeout, self.records.list_transfers(account_id)).await?;
        Ok(AccountTransfers::split(account_id, records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_secret;
    use crate::error::ErrorKind;
    use crate::storage::mock::MockStore;
    use crate::storage::{MemoryStore, NewTransfer};
    use std::str::FromStr;

    fn service() -> (AccountService, Arc<MockStore>) {
        let store = Arc::new(MockStore::new(Arc::new(MemoryStore::new())));
        let service = AccountService::new(store.clone(), store.clone(), Duration::from_secs(15));
        (service, store)
    }

    fn new_account(cpf: &str) -> NewAccount {
        NewAccount {
            name: "Chewbacca Solo".to_string(),
            cpf: cpf.to_string(),
            secret: "254855".to_string(),
            balance: Decimal::from_str("42.42").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_stores_hashed_secret() {
        let (service, store) = service();
        let id = service.create(new_account("11111111030")).await.unwrap();
        assert_eq!(id.len(), 32);

        let stored = store.inner().account(&id).unwrap();
        assert_eq!(stored.name, "Chewbacca Solo");
        assert_eq!(stored.balance, Decimal::from_str("42.42").unwrap());
        assert_ne!(stored.secret_hash, "254855");
        assert!(verify_secret("254855", &stored.secret_hash).unwrap());
        assert_eq!(service.balance(&id).await.unwrap(), stored.balance);
    }

    #[tokio::test]
    async fn test_duplicate_cpf_is_invalid_input() {
        let (service, store) = service();
        service.create(new_account("11111111030")).await.unwrap();
        let err = service.create(new_account("11111111030")).await.unwrap_err();
        assert!(matches!(err, AccountError::DuplicateCpf));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(store.inner().list_accounts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_fields_store_nothing() {
        let (service, store) = service();
        let mut blank_name = new_account("12345678909");
        blank_name.name = "  ".to_string();
        let mut no_secret = new_account("12345678909");
        no_secret.secret.clear();
        let mut negative = new_account("12345678909");
        negative.balance = Decimal::from_str("-42.42").unwrap();

        for req in [new_account("11111111111"), blank_name, no_secret, negative] {
            let err = service.create(req).await.unwrap_err();
            assert!(matches!(err, AccountError::Invalid(_)), "{:?}", err);
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
        assert!(store.inner().list_accounts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_balance_is_not_found() {
        let (service, _) = service();
        let err = service.balance("a6sf46af6af").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_returns_views() {
        let (service, _) = service();
        let id = service.create(new_account("52998224725")).await.unwrap();
        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].cpf, "52998224725");
    }

    #[tokio::test]
    async fn test_transfers_split() {
        let (service, store) = service();
        for (from, to) in [("me", "x"), ("x", "me"), ("x", "y")] {
            store
                .inner()
                .append_transfer(NewTransfer {
                    origin_account_id: from.to_string(),
                    destination_account_id: to.to_string(),
                    amount: Decimal::from_str("23.32").unwrap(),
                })
                .await
                .unwrap();
        }
        let history = service.transfers("me").await.unwrap();
        assert_eq!(history.sent.len(), 1);
        assert_eq!(history.received.len(), 1);
        assert_eq!(history.sent[0].destination_account_id, "x");
    }

    #[tokio::test]
    async fn test_listing_failure_is_internal() {
        let (service, store) = service();
        store.set_fail_list(true);
        assert_eq!(service.list().await.unwrap_err().kind(), ErrorKind::Internal);
        assert_eq!(service.transfers("me").await.unwrap_err().kind(), ErrorKind::Internal);
    }
}
