use tracing::{error, info};

use crate::actors::DirectoryService;
use crate::clients::{DirectoryClient, UserApi};
use crate::error::DirectoryError;

/// Owns the running directory actor.
///
/// Responsible for starting the actor, handing out its client, and shutting it down.
pub struct DirectorySystem {
    pub directory_client: DirectoryClient,
    handle: tokio::task::JoinHandle<()>,
}

impl DirectorySystem {
    pub fn new<A: UserApi>(api: A, mailbox_size: usize) -> Self {
        let (service, directory_client) = DirectoryService::new(mailbox_size, api);
        let handle = tokio::spawn(service.run());

        Self {
            directory_client,
            handle,
        }
    }

    pub async fn shutdown(self) -> Result<(), DirectoryError> {
        info!("Shutting down system...");
        self.directory_client.shutdown().await?;

        if let Err(e) = self.handle.await {
            error!("Actor task failed: {:?}", e);
            return Err(DirectoryError::ActorCommunicationError(format!(
                "Actor task failed: {:?}",
                e
            )));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
