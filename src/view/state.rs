//! Explicit view state of the directory: the collection, the form draft and
//! the two modal flags.
//!
//! Every transition here is synchronous. The actor sequences them around the
//! remote calls; nothing in this module touches the network.

use std::collections::HashSet;

use tracing::warn;

use crate::domain::{User, UserField, UserId};
use crate::error::DirectoryError;

/// What a submit sends to the remote collection, captured from the draft and
/// the mode at the moment of submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(User),
    Update(UserId, User),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    users: Vec<User>,
    draft: User,
    editing: bool,
    modal_visible: bool,
}

impl ViewState {
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn draft(&self) -> &User {
        &self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_modal_visible(&self) -> bool {
        self.modal_visible
    }

    pub fn find(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == Some(id))
    }

    /// Replaces the collection with the server's list, keeping server order.
    ///
    /// A repeated identifier keeps its first record; later copies are dropped.
    pub fn replace_all(&mut self, users: Vec<User>) {
        let mut seen = HashSet::new();
        self.users = users
            .into_iter()
            .filter(|user| match user.id {
                Some(id) if !seen.insert(id) => {
                    warn!(user_id = %id, "Dropping repeated user from server list");
                    false
                }
                _ => true,
            })
            .collect();
    }

    pub fn open_create(&mut self) {
        self.reset_draft();
        self.modal_visible = true;
    }

    pub fn open_edit(&mut self, user: User) {
        self.draft = user;
        self.editing = true;
        self.modal_visible = true;
    }

    pub fn change_field(&mut self, field: UserField, value: String) {
        field.set(&mut self.draft, value);
    }

    /// Hides the modal. The draft and edit mode are left as they are.
    pub fn cancel(&mut self) {
        self.modal_visible = false;
    }

    /// Validates the draft and captures what a submit would send.
    ///
    /// Only an open form can be submitted.
    pub fn submission(&self) -> Result<Submission, DirectoryError> {
        if !self.modal_visible {
            return Err(DirectoryError::FormClosed);
        }
        self.draft.validate().map_err(DirectoryError::Validation)?;

        if self.editing {
            let id = self.draft.id.ok_or(DirectoryError::MissingId)?;
            Ok(Submission::Update(id, self.draft.clone()))
        } else {
            Ok(Submission::Create(User {
                id: None,
                ..self.draft.clone()
            }))
        }
    }

    /// Appends a record returned by a create call.
    pub fn apply_created(&mut self, user: User) -> Result<(), DirectoryError> {
        if let Some(id) = user.id {
            if self.find(id).is_some() {
                return Err(DirectoryError::DuplicateId(id));
            }
        }
        self.users.push(user);
        Ok(())
    }

    /// Replaces the entry with identifier `id` by the record returned from an
    /// update call. Returns whether an entry was replaced.
    pub fn apply_updated(&mut self, id: UserId, user: User) -> Result<bool, DirectoryError> {
        if let Some(returned) = user.id {
            if returned != id {
                return Err(DirectoryError::IdMismatch {
                    expected: id,
                    returned,
                });
            }
        }

        match self.users.iter_mut().find(|entry| entry.id == Some(id)) {
            Some(entry) => {
                *entry = user.with_id(id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes the entry with identifier `id`. Returns whether one was removed.
    pub fn remove(&mut self, id: UserId) -> bool {
        let before = self.users.len();
        self.users.retain(|user| user.id != Some(id));
        self.users.len() != before
    }

    /// Closes the form after a successful submit.
    pub fn finish_submit(&mut self) {
        self.reset_draft();
        self.modal_visible = false;
    }

    fn reset_draft(&mut self) {
        self.draft = User::default();
        self.editing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::domain::{Address, AddressField};

    fn user(id: u64, name: &str) -> User {
        User {
            id: Some(UserId(id)),
            name: name.into(),
            username: name.to_lowercase(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "555-0100".into(),
            website: "example.com".into(),
            address: Address {
                street: "Main St".into(),
                suite: "Apt. 1".into(),
                city: "Springfield".into(),
                zipcode: "12345".into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn loaded(users: Vec<User>) -> ViewState {
        let mut state = ViewState::default();
        state.replace_all(users);
        state
    }

    #[test]
    fn test_replace_all_keeps_server_order() {
        let users = vec![user(3, "C"), user(1, "A"), user(2, "B")];
        let state = loaded(users.clone());
        assert_eq!(state.users(), users.as_slice());
    }

    #[test]
    fn test_replace_all_drops_repeated_ids() {
        let state = loaded(vec![user(1, "A"), user(2, "B"), user(1, "A2")]);
        assert_eq!(state.users(), &[user(1, "A"), user(2, "B")]);
    }

    #[test]
    fn test_open_create_yields_empty_draft() {
        let mut state = loaded(vec![user(1, "A")]);
        state.open_edit(user(1, "A"));

        state.open_create();

        assert_eq!(state.draft(), &User::default());
        assert_eq!(state.draft().id, None);
        assert!(!state.is_editing());
        assert!(state.is_modal_visible());
    }

    #[test]
    fn test_open_edit_copies_record() {
        let mut state = loaded(vec![user(1, "A")]);
        state.open_edit(user(1, "A"));

        assert_eq!(state.draft(), &user(1, "A"));
        assert!(state.is_editing());
        assert!(state.is_modal_visible());
    }

    #[test]
    fn test_change_field_only_touches_addressed_field() {
        let mut state = ViewState::default();
        state.open_edit(user(1, "A"));

        state.change_field(UserField::Address(AddressField::City), "X".into());

        let mut expected = user(1, "A");
        expected.address.city = "X".into();
        assert_eq!(state.draft(), &expected);
    }

    #[test]
    fn test_cancel_hides_modal_only() {
        let mut state = ViewState::default();
        state.open_edit(user(1, "A"));
        state.change_field(UserField::Name, "Edited".into());

        state.cancel();

        assert!(!state.is_modal_visible());
        assert!(state.is_editing());
        assert_eq!(state.draft().name, "Edited");
    }

    #[test]
    fn test_submission_create_strips_id() {
        let mut state = ViewState::default();
        state.open_create();
        let mut draft = user(9, "B");
        draft.id = None;
        for field in UserField::FORM {
            state.change_field(field, field.get(&draft).to_string());
        }

        assert_eq!(state.submission(), Ok(Submission::Create(draft)));
    }

    #[test]
    fn test_submission_update_uses_draft_id() {
        let mut state = ViewState::default();
        state.open_edit(user(4, "D"));
        assert_eq!(
            state.submission(),
            Ok(Submission::Update(UserId(4), user(4, "D")))
        );
    }

    #[test]
    fn test_submission_update_carries_unknown_fields() {
        let mut record = user(4, "D");
        record.extra.insert("company".into(), json!({ "name": "Acme" }));
        let mut state = loaded(vec![record.clone()]);
        state.open_edit(record);
        state.change_field(UserField::Phone, "555-0199".into());

        let Ok(Submission::Update(_, sent)) = state.submission() else {
            panic!("expected an update");
        };
        assert_eq!(sent.extra["company"]["name"], "Acme");
        assert_eq!(sent.phone, "555-0199");
    }

    #[test]
    fn test_submission_refused_while_form_closed() {
        let mut state = ViewState::default();
        state.open_edit(user(4, "D"));
        state.cancel();
        assert_eq!(state.submission(), Err(DirectoryError::FormClosed));

        assert_eq!(ViewState::default().submission(), Err(DirectoryError::FormClosed));
    }

    #[test]
    fn test_submission_update_requires_id() {
        let mut state = ViewState::default();
        let mut record = user(4, "D");
        record.id = None;
        state.open_edit(record);
        assert_eq!(state.submission(), Err(DirectoryError::MissingId));
    }

    #[test]
    fn test_submission_rejects_incomplete_draft() {
        let mut state = ViewState::default();
        state.open_create();
        state.change_field(UserField::Name, "B".into());
        assert!(matches!(
            state.submission(),
            Err(DirectoryError::Validation(_))
        ));
    }

    #[test]
    fn test_apply_created_appends() {
        let mut state = loaded(vec![user(1, "A")]);
        state.apply_created(user(2, "B")).unwrap();
        assert_eq!(state.users(), &[user(1, "A"), user(2, "B")]);
    }

    #[test]
    fn test_apply_created_rejects_existing_id() {
        let mut state = loaded(vec![user(1, "A")]);
        assert_eq!(
            state.apply_created(user(1, "Other")),
            Err(DirectoryError::DuplicateId(UserId(1)))
        );
        assert_eq!(state.users(), &[user(1, "A")]);
    }

    #[test]
    fn test_apply_updated_replaces_only_matching_entry() {
        let mut state = loaded(vec![user(1, "A"), user(2, "B"), user(3, "C")]);
        assert_eq!(state.apply_updated(UserId(2), user(2, "B2")), Ok(true));
        assert_eq!(state.users(), &[user(1, "A"), user(2, "B2"), user(3, "C")]);
    }

    #[test]
    fn test_apply_updated_keeps_id_when_response_omits_it() {
        let mut state = loaded(vec![user(1, "A")]);
        let mut response = user(1, "A2");
        response.id = None;
        assert_eq!(state.apply_updated(UserId(1), response), Ok(true));
        assert_eq!(state.users(), &[user(1, "A2")]);
    }

    #[test]
    fn test_apply_updated_rejects_other_id() {
        let mut state = loaded(vec![user(1, "A"), user(2, "B")]);
        assert_eq!(
            state.apply_updated(UserId(1), user(2, "B2")),
            Err(DirectoryError::IdMismatch {
                expected: UserId(1),
                returned: UserId(2),
            })
        );
        assert_eq!(state.users(), &[user(1, "A"), user(2, "B")]);
    }

    #[test]
    fn test_apply_updated_missing_entry_is_noop() {
        let mut state = loaded(vec![user(1, "A")]);
        assert_eq!(state.apply_updated(UserId(5), user(5, "E")), Ok(false));
        assert_eq!(state.users(), &[user(1, "A")]);
    }

    #[test]
    fn test_remove_only_matching_entry() {
        let mut state = loaded(vec![user(1, "A"), user(2, "B")]);
        assert!(state.remove(UserId(1)));
        assert_eq!(state.users(), &[user(2, "B")]);
        assert!(!state.remove(UserId(1)));
    }

    #[test]
    fn test_finish_submit_resets_form() {
        let mut state = ViewState::default();
        state.open_edit(user(1, "A"));
        state.finish_submit();

        assert_eq!(state.draft(), &User::default());
        assert!(!state.is_editing());
        assert!(!state.is_modal_visible());
    }
}
