//! Process-local `UserRepository` backed by a keyed collection.
//!
//! Mirrors the storage semantics of the Diesel adapter — live-row unique
//! email check, creation-order listing, soft delete as a timestamp — so
//! integration tests exercise the same behaviour without PostgreSQL. The
//! mutex provides the mutual exclusion the keyed collection needs under a
//! multi-threaded runtime. An insertion sequence keeps listing order
//! deterministic even when two rows share a creation timestamp.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use pagination::{PageRequest, Paged};
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, NewUser, User, UserId, UserPatch};

#[derive(Default)]
struct Store {
    rows: HashMap<Uuid, Entry>,
    next_seq: u64,
}

struct Entry {
    seq: u64,
    user: User,
}

/// In-memory implementation of the `UserRepository` port.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: Mutex<Store>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> Result<MutexGuard<'_, Store>, UserRepositoryError> {
        self.store
            .lock()
            .map_err(|_| UserRepositoryError::query("user store mutex poisoned"))
    }

    fn live_sorted(store: &Store) -> Vec<User> {
        let mut live: Vec<(u64, User)> = store
            .rows
            .values()
            .filter(|entry| entry.user.deleted_at().is_none())
            .map(|entry| (entry.seq, entry.user.clone()))
            .collect();
        live.sort_by_key(|(seq, _)| *seq);
        live.into_iter().map(|(_, user)| user).collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, UserRepositoryError> {
        let mut store = self.store()?;
        // Same guard the unique index provides in PostgreSQL.
        let taken = store
            .rows
            .values()
            .any(|entry| {
                entry.user.deleted_at().is_none() && entry.user.email() == &new_user.email
            });
        if taken {
            return Err(UserRepositoryError::duplicate_email(
                new_user.email.to_string(),
            ));
        }

        let now = Utc::now();
        let user = User::from_parts(UserId::random(), new_user.name, new_user.email, now, now, None);
        let seq = store.next_seq;
        store.next_seq += 1;
        store.rows.insert(
            user.id().as_uuid(),
            Entry {
                seq,
                user: user.clone(),
            },
        );
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let store = self.store()?;
        Ok(store
            .rows
            .get(&id.as_uuid())
            .map(|entry| &entry.user)
            .filter(|user| user.deleted_at().is_none())
            .cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let store = self.store()?;
        Ok(store
            .rows
            .values()
            .map(|entry| &entry.user)
            .find(|user| user.deleted_at().is_none() && user.email() == email)
            .cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Paged<User>, UserRepositoryError> {
        let store = self.store()?;
        let live = Self::live_sorted(&store);
        let total = live.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(0);
        let limit = usize::try_from(page.limit()).unwrap_or(0);
        let items = live.into_iter().skip(offset).take(limit).collect();
        Ok(Paged::new(items, total))
    }

    async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, UserRepositoryError> {
        let mut store = self.store()?;
        let existing = store
            .rows
            .get(&id.as_uuid())
            .map(|entry| entry.user.clone())
            .filter(|user| user.deleted_at().is_none())
            .ok_or(UserRepositoryError::RowMissing)?;

        let updated = User::from_parts(
            existing.id(),
            patch.name.unwrap_or_else(|| existing.name().clone()),
            patch.email.unwrap_or_else(|| existing.email().clone()),
            existing.created_at(),
            Utc::now(),
            None,
        );
        if let Some(entry) = store.rows.get_mut(&id.as_uuid()) {
            entry.user = updated.clone();
        }
        Ok(updated)
    }

    async fn delete(&self, id: UserId) -> Result<(), UserRepositoryError> {
        let mut store = self.store()?;
        let existing = store
            .rows
            .get(&id.as_uuid())
            .map(|entry| entry.user.clone())
            .filter(|user| user.deleted_at().is_none())
            .ok_or(UserRepositoryError::RowMissing)?;

        let now = Utc::now();
        let deleted = User::from_parts(
            existing.id(),
            existing.name().clone(),
            existing.email().clone(),
            existing.created_at(),
            now,
            Some(now),
        );
        if let Some(entry) = store.rows.get_mut(&id.as_uuid()) {
            entry.user = deleted;
        }
        Ok(())
    }
}
