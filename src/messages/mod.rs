use tokio::sync::oneshot;

use crate::domain::{User, UserField, UserId};
use crate::error::{ApiError, DirectoryError};
use crate::view::ViewState;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Typed messages for the directory actor. User actions carry a oneshot
/// channel that is answered once the action, including any remote call, has
/// been reconciled with the view state.
#[derive(Debug)]
pub enum DirectoryRequest {
    Load {
        respond_to: ServiceResponse<usize, DirectoryError>,
    },
    OpenCreate {
        respond_to: ServiceResponse<(), DirectoryError>,
    },
    OpenEdit {
        id: UserId,
        respond_to: ServiceResponse<(), DirectoryError>,
    },
    ChangeField {
        field: UserField,
        value: String,
        respond_to: ServiceResponse<(), DirectoryError>,
    },
    Submit {
        respond_to: ServiceResponse<(), DirectoryError>,
    },
    Delete {
        id: UserId,
        respond_to: ServiceResponse<(), DirectoryError>,
    },
    Cancel {
        respond_to: ServiceResponse<(), DirectoryError>,
    },
    Snapshot {
        respond_to: ServiceResponse<ViewState, DirectoryError>,
    },
    /// Posted back by a background remote call when it finishes.
    Completed(RemoteOutcome),
    Shutdown,
}

/// Result of a remote call, paired with the response channel of the action
/// that started it.
#[derive(Debug)]
pub enum RemoteOutcome {
    Loaded {
        result: Result<Vec<User>, ApiError>,
        respond_to: ServiceResponse<usize, DirectoryError>,
    },
    Created {
        result: Result<User, ApiError>,
        respond_to: ServiceResponse<(), DirectoryError>,
    },
    Updated {
        id: UserId,
        result: Result<User, ApiError>,
        respond_to: ServiceResponse<(), DirectoryError>,
    },
    Deleted {
        id: UserId,
        result: Result<(), ApiError>,
        respond_to: ServiceResponse<(), DirectoryError>,
    },
}
