use sea_orm::DatabaseConnection;

use crate::infra::db::{DbInboxStore, DbPaymentRepository};

/// Shared application state for the consumer and health server.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn payment_repo(&self) -> DbPaymentRepository {
        DbPaymentRepository {
            db: self.db.clone(),
        }
    }

    pub fn inbox_store(&self) -> DbInboxStore {
        DbInboxStore {
            db: self.db.clone(),
        }
    }
}
