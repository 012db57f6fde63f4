use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::domain::{UserField, UserId};
use crate::error::DirectoryError;
use crate::messages::DirectoryRequest;
use crate::view::ViewState;

pub mod user_client;

pub use user_client::{HttpUserClient, UserApi};

// =============================================================================
// Macro for request/response client methods
// =============================================================================

macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, Error = $error_type:ty) => {
        impl $client {
            #[instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $error_type> {
                debug!("Sending request");
                let (respond_to, response) = oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| <$error_type>::ActorCommunicationError("Actor closed".to_string()))?;

                response.await.map_err(|_| <$error_type>::ActorCommunicationError("Actor dropped".to_string()))?
            }
        }
    };
}

// =============================================================================
// Directory Client
// =============================================================================

/// Handle to the directory actor.
///
/// Each method resolves once the actor has applied the action, including the
/// reconciliation of any remote call it started.
#[derive(Clone, Debug)]
pub struct DirectoryClient {
    sender: mpsc::Sender<DirectoryRequest>,
}

impl DirectoryClient {
    pub fn new(sender: mpsc::Sender<DirectoryRequest>) -> Self {
        Self { sender }
    }

    /// Asks the actor to stop. Pending requests queued behind this one are dropped.
    pub async fn shutdown(&self) -> Result<(), DirectoryError> {
        self.sender
            .send(DirectoryRequest::Shutdown)
            .await
            .map_err(|_| DirectoryError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(DirectoryClient => fn load() -> usize as DirectoryRequest::Load, Error = DirectoryError);
client_method!(DirectoryClient => fn open_create() -> () as DirectoryRequest::OpenCreate, Error = DirectoryError);
client_method!(DirectoryClient => fn open_edit(id: UserId) -> () as DirectoryRequest::OpenEdit, Error = DirectoryError);
client_method!(DirectoryClient => fn change_field(field: UserField, value: String) -> () as DirectoryRequest::ChangeField, Error = DirectoryError);
client_method!(DirectoryClient => fn submit() -> () as DirectoryRequest::Submit, Error = DirectoryError);
client_method!(DirectoryClient => fn delete(id: UserId) -> () as DirectoryRequest::Delete, Error = DirectoryError);
client_method!(DirectoryClient => fn cancel() -> () as DirectoryRequest::Cancel, Error = DirectoryError);
client_method!(DirectoryClient => fn snapshot() -> ViewState as DirectoryRequest::Snapshot, Error = DirectoryError);
