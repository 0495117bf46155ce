use crate::config::Config;
use crate::item_repository;
use crate::services::ItemService;
use tokio::task::JoinHandle;
use tracing::info;

/// The running catalog: the repository actor plus the service in front of it.
pub struct CatalogSystem {
    pub service: ItemService,
    handle: JoinHandle<()>,
}

impl CatalogSystem {
    /// Spawns the item repository actor. Must be called inside a Tokio runtime.
    pub fn new(config: &Config) -> Self {
        info!(data_file = %config.data_file.display(), "Starting catalog");
        let (actor, client) = item_repository::new(config.data_file.clone(), config.channel_capacity);
        let handle = tokio::spawn(actor.run());

        Self {
            service: ItemService::new(client),
            handle,
        }
    }

    /// Drops this system's client and waits for the actor to finish.
    ///
    /// Clones of [`service`](Self::service) held elsewhere keep the actor alive, so drop
    /// them first.
    pub async fn shutdown(self) -> Result<(), String> {
        drop(self.service);
        self.handle
            .await
            .map_err(|e| format!("Item actor failed: {e}"))?;
        info!("Catalog stopped");
        Ok(())
    }
}
