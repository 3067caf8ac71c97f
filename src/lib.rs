pub mod accounts;
pub mod api;
pub mod catalog;
pub mod chat;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod db;

pub use db::DbPool;

use config::Config;
use std::sync::Arc;

use crate::accounts::AccountService;
use crate::catalog::CatalogService;
use crate::chat::ChatClient;
use crate::db::SqliteStore;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub accounts: AccountService,
    pub catalog: CatalogService,
    pub chat: ChatClient,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> anyhow::Result<Self> {
        let store = Arc::new(SqliteStore::new(db.clone()));
        let chat = ChatClient::new(config.chat.clone(), db.clone())?;
        Ok(Self {
            accounts: AccountService::new(store.clone()),
            catalog: CatalogService::new(store),
            chat,
            config,
            db,
        })
    }
}
