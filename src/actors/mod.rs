use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::clients::{DirectoryClient, UserApi};
use crate::domain::{User, UserField, UserId};
use crate::error::DirectoryError;
use crate::messages::{DirectoryRequest, RemoteOutcome, ServiceResponse};
use crate::view::{Submission, ViewState};

// =============================================================================
// DIRECTORY SERVICE
// =============================================================================

/// The directory component: sole owner of the view state.
///
/// Local transitions are applied inline. Remote calls run in background tasks
/// that post a [`RemoteOutcome`] back to this actor, so a slow call only holds
/// up the action that started it. Failed calls are logged and leave the view
/// state untouched.
pub struct DirectoryService<A: UserApi> {
    receiver: mpsc::Receiver<DirectoryRequest>,
    /// Cloned into background tasks so they can report back
    sender: mpsc::Sender<DirectoryRequest>,
    api: Arc<A>,
    state: ViewState,
}

impl<A: UserApi> DirectoryService<A> {
    pub fn new(buffer_size: usize, api: A) -> (Self, DirectoryClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            sender: sender.clone(),
            api: Arc::new(api),
            state: ViewState::default(),
        };
        let client = DirectoryClient::new(sender);
        (service, client)
    }

    #[instrument(name = "directory_service", skip(self))]
    pub async fn run(mut self) {
        info!("DirectoryService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                DirectoryRequest::Load { respond_to } => {
                    self.handle_load(respond_to);
                }
                DirectoryRequest::OpenCreate { respond_to } => {
                    self.handle_open_create(respond_to);
                }
                DirectoryRequest::OpenEdit { id, respond_to } => {
                    self.handle_open_edit(id, respond_to);
                }
                DirectoryRequest::ChangeField {
                    field,
                    value,
                    respond_to,
                } => {
                    self.handle_change_field(field, value, respond_to);
                }
                DirectoryRequest::Submit { respond_to } => {
                    self.handle_submit(respond_to);
                }
                DirectoryRequest::Delete { id, respond_to } => {
                    self.handle_delete(id, respond_to);
                }
                DirectoryRequest::Cancel { respond_to } => {
                    debug!("Closing modal");
                    self.state.cancel();
                    let _ = respond_to.send(Ok(()));
                }
                DirectoryRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.state.clone()));
                }
                DirectoryRequest::Completed(outcome) => {
                    self.handle_outcome(outcome);
                }
                DirectoryRequest::Shutdown => {
                    info!("DirectoryService shutting down");
                    break;
                }
            }
        }

        info!("DirectoryService stopped");
    }

    /// Runs a remote call in the background and posts its outcome back.
    fn spawn_remote<F>(&self, call: F)
    where
        F: std::future::Future<Output = RemoteOutcome> + Send + 'static,
    {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let outcome = call.await;
            if sender
                .send(DirectoryRequest::Completed(outcome))
                .await
                .is_err()
            {
                warn!("DirectoryService gone before remote call completed");
            }
        });
    }

    #[instrument(skip(self, respond_to))]
    fn handle_load(&self, respond_to: ServiceResponse<usize, DirectoryError>) {
        debug!("Fetching user collection");
        let api = Arc::clone(&self.api);
        self.spawn_remote(async move {
            RemoteOutcome::Loaded {
                result: api.list_users().await,
                respond_to,
            }
        });
    }

    fn handle_open_create(&mut self, respond_to: ServiceResponse<(), DirectoryError>) {
        debug!("Opening create form");
        self.state.open_create();
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(fields(user_id = %id), skip(self, respond_to))]
    fn handle_open_edit(&mut self, id: UserId, respond_to: ServiceResponse<(), DirectoryError>) {
        let result = match self.state.find(id).cloned() {
            Some(user) => {
                debug!(user_name = %user.name, "Opening edit form");
                self.state.open_edit(user);
                Ok(())
            }
            None => {
                warn!("User not in collection");
                Err(DirectoryError::NotFound(id))
            }
        };
        let _ = respond_to.send(result);
    }

    #[instrument(fields(field = %field), skip(self, value, respond_to))]
    fn handle_change_field(
        &mut self,
        field: UserField,
        value: String,
        respond_to: ServiceResponse<(), DirectoryError>,
    ) {
        self.state.change_field(field, value);
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_submit(&self, respond_to: ServiceResponse<(), DirectoryError>) {
        let submission = match self.state.submission() {
            Ok(submission) => submission,
            Err(e) => {
                warn!(error = %e, "Submit rejected");
                let _ = respond_to.send(Err(e));
                return;
            }
        };

        let api = Arc::clone(&self.api);
        match submission {
            Submission::Create(user) => {
                debug!(user_name = %user.name, "Creating user");
                self.spawn_remote(async move {
                    RemoteOutcome::Created {
                        result: api.create_user(&user).await,
                        respond_to,
                    }
                });
            }
            Submission::Update(id, user) => {
                debug!(user_id = %id, "Updating user");
                self.spawn_remote(async move {
                    RemoteOutcome::Updated {
                        id,
                        result: api.update_user(id, &user).await,
                        respond_to,
                    }
                });
            }
        }
    }

    #[instrument(fields(user_id = %id), skip(self, respond_to))]
    fn handle_delete(&self, id: UserId, respond_to: ServiceResponse<(), DirectoryError>) {
        debug!("Deleting user");
        let api = Arc::clone(&self.api);
        self.spawn_remote(async move {
            RemoteOutcome::Deleted {
                id,
                result: api.delete_user(id).await,
                respond_to,
            }
        });
    }

    fn handle_outcome(&mut self, outcome: RemoteOutcome) {
        match outcome {
            RemoteOutcome::Loaded { result, respond_to } => {
                let _ = respond_to.send(self.apply_loaded(result.map_err(Into::into)));
            }
            RemoteOutcome::Created { result, respond_to } => {
                let result = result
                    .map_err(Into::into)
                    .and_then(|user| self.apply_created(user));
                let _ = respond_to.send(result);
            }
            RemoteOutcome::Updated {
                id,
                result,
                respond_to,
            } => {
                let result = result
                    .map_err(Into::into)
                    .and_then(|user| self.apply_updated(id, user));
                let _ = respond_to.send(result);
            }
            RemoteOutcome::Deleted {
                id,
                result,
                respond_to,
            } => {
                let _ = respond_to.send(self.apply_deleted(id, result.map_err(Into::into)));
            }
        }
    }

    #[instrument(skip(self, result))]
    fn apply_loaded(&mut self, result: Result<Vec<User>, DirectoryError>) -> Result<usize, DirectoryError> {
        match result {
            Ok(users) => {
                self.state.replace_all(users);
                let user_count = self.state.users().len();
                info!(user_count, "User collection loaded");
                Ok(user_count)
            }
            Err(e) => {
                error!(error = %e, "Error fetching users");
                Err(e)
            }
        }
    }

    #[instrument(skip(self, user), fields(user_id = ?user.id))]
    fn apply_created(&mut self, user: User) -> Result<(), DirectoryError> {
        match self.state.apply_created(user) {
            Ok(()) => {
                info!("User added");
                self.state.finish_submit();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error adding user");
                Err(e)
            }
        }
    }

    #[instrument(skip(self, user), fields(user_id = %id))]
    fn apply_updated(&mut self, id: UserId, user: User) -> Result<(), DirectoryError> {
        match self.state.apply_updated(id, user) {
            Ok(replaced) => {
                if replaced {
                    info!("User updated");
                } else {
                    warn!("Updated user is no longer in the collection");
                }
                self.state.finish_submit();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error updating user");
                Err(e)
            }
        }
    }

    #[instrument(skip(self, result), fields(user_id = %id))]
    fn apply_deleted(&mut self, id: UserId, result: Result<(), DirectoryError>) -> Result<(), DirectoryError> {
        match result {
            Ok(()) => {
                if self.state.remove(id) {
                    info!("User deleted");
                } else {
                    debug!("Deleted user was not in the collection");
                }
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error deleting user");
                Err(e)
            }
        }
    }
}
