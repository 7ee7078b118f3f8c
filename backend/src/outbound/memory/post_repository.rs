//! Process-local `PostRepository` backed by a keyed collection.
//!
//! Same shape as the in-memory user store: mutex-guarded map, insertion
//! sequence for deterministic listing order, soft delete as a timestamp.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use pagination::{PageRequest, Paged};
use uuid::Uuid;

use crate::domain::ports::{PostListFilter, PostRepository, PostRepositoryError};
use crate::domain::{NewPost, Post, PostId, PostPatch};

#[derive(Default)]
struct Store {
    rows: HashMap<Uuid, Entry>,
    next_seq: u64,
}

struct Entry {
    seq: u64,
    post: Post,
}

/// In-memory implementation of the `PostRepository` port.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: Mutex<Store>,
}

impl InMemoryPostRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> Result<MutexGuard<'_, Store>, PostRepositoryError> {
        self.store
            .lock()
            .map_err(|_| PostRepositoryError::query("post store mutex poisoned"))
    }

    fn matches(post: &Post, filter: PostListFilter) -> bool {
        post.deleted_at().is_none()
            && filter
                .author_id
                .is_none_or(|author| post.author_id() == author)
    }

    fn live_sorted(store: &Store, filter: PostListFilter) -> Vec<Post> {
        let mut live: Vec<(u64, Post)> = store
            .rows
            .values()
            .filter(|entry| Self::matches(&entry.post, filter))
            .map(|entry| (entry.seq, entry.post.clone()))
            .collect();
        live.sort_by_key(|(seq, _)| *seq);
        live.into_iter().map(|(_, post)| post).collect()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, PostRepositoryError> {
        let mut store = self.store()?;
        let now = Utc::now();
        let post = Post::from_parts(
            PostId::random(),
            new_post.author_id,
            new_post.title,
            new_post.body,
            now,
            now,
            None,
        );
        let seq = store.next_seq;
        store.next_seq += 1;
        store.rows.insert(
            post.id().as_uuid(),
            Entry {
                seq,
                post: post.clone(),
            },
        );
        Ok(post)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let store = self.store()?;
        Ok(store
            .rows
            .get(&id.as_uuid())
            .map(|entry| &entry.post)
            .filter(|post| post.deleted_at().is_none())
            .cloned())
    }

    async fn list(
        &self,
        page: PageRequest,
        filter: PostListFilter,
    ) -> Result<Paged<Post>, PostRepositoryError> {
        let store = self.store()?;
        let live = Self::live_sorted(&store, filter);
        let total = live.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(0);
        let limit = usize::try_from(page.limit()).unwrap_or(0);
        let items = live.into_iter().skip(offset).take(limit).collect();
        Ok(Paged::new(items, total))
    }

    async fn update(&self, id: PostId, patch: PostPatch) -> Result<Post, PostRepositoryError> {
        let mut store = self.store()?;
        let existing = store
            .rows
            .get(&id.as_uuid())
            .map(|entry| entry.post.clone())
            .filter(|post| post.deleted_at().is_none())
            .ok_or(PostRepositoryError::RowMissing)?;

        let updated = Post::from_parts(
            existing.id(),
            existing.author_id(),
            patch.title.unwrap_or_else(|| existing.title().clone()),
            patch.body.unwrap_or_else(|| existing.body().clone()),
            existing.created_at(),
            Utc::now(),
            None,
        );
        if let Some(entry) = store.rows.get_mut(&id.as_uuid()) {
            entry.post = updated.clone();
        }
        Ok(updated)
    }

    async fn delete(&self, id: PostId) -> Result<(), PostRepositoryError> {
        let mut store = self.store()?;
        let existing = store
            .rows
            .get(&id.as_uuid())
            .map(|entry| entry.post.clone())
            .filter(|post| post.deleted_at().is_none())
            .ok_or(PostRepositoryError::RowMissing)?;

        let now = Utc::now();
        let deleted = Post::from_parts(
            existing.id(),
            existing.author_id(),
            existing.title().clone(),
            existing.body().clone(),
            existing.created_at(),
            now,
            Some(now),
        );
        if let Some(entry) = store.rows.get_mut(&id.as_uuid()) {
            entry.post = deleted;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{PostBody, PostTitle, UserId};

    fn draft(author: UserId, title: &str) -> NewPost {
        NewPost {
            author_id: author,
            title: PostTitle::new(title).expect("valid title"),
            body: PostBody::new("Body text.").expect("valid body"),
        }
    }

    #[tokio::test]
    async fn created_post_round_trips_unchanged() {
        let repo = InMemoryPostRepository::new();
        let created = repo
            .create(draft(UserId::random(), "Hello"))
            .await
            .expect("create succeeds");

        let fetched = repo
            .find_by_id(created.id())
            .await
            .expect("lookup succeeds")
            .expect("post present");
        assert_eq!(fetched, created);
        assert_eq!(fetched.deleted_at(), None);
    }

    #[tokio::test]
    async fn soft_delete_hides_post_from_all_reads() {
        let repo = InMemoryPostRepository::new();
        let post = repo
            .create(draft(UserId::random(), "Hello"))
            .await
            .expect("create succeeds");

        repo.delete(post.id()).await.expect("delete succeeds");

        assert_eq!(
            repo.find_by_id(post.id()).await.expect("lookup succeeds"),
            None
        );
        let page = repo
            .list(PageRequest::default(), PostListFilter::default())
            .await
            .expect("list succeeds");
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);

        let error = repo
            .delete(post.id())
            .await
            .expect_err("second delete misses");
        assert!(matches!(error, PostRepositoryError::RowMissing));
    }

    #[tokio::test]
    async fn author_filter_scopes_items_and_total() {
        let repo = InMemoryPostRepository::new();
        let ann = UserId::random();
        let ben = UserId::random();
        for i in 0..3 {
            repo.create(draft(ann, &format!("Ann {i}")))
                .await
                .expect("create succeeds");
        }
        repo.create(draft(ben, "Ben 0")).await.expect("create succeeds");

        let page = repo
            .list(
                PageRequest::default(),
                PostListFilter {
                    author_id: Some(ann),
                },
            )
            .await
            .expect("list succeeds");
        assert_eq!(page.total, 3);
        assert!(page.items.iter().all(|post| post.author_id() == ann));
    }

    #[tokio::test]
    async fn update_patches_only_supplied_fields() {
        let repo = InMemoryPostRepository::new();
        let post = repo
            .create(draft(UserId::random(), "Hello"))
            .await
            .expect("create succeeds");

        let patch = PostPatch {
            title: Some(PostTitle::new("Edited").expect("valid title")),
            body: None,
        };
        let updated = repo.update(post.id(), patch).await.expect("update succeeds");
        assert_eq!(updated.title().as_ref(), "Edited");
        assert_eq!(updated.body(), post.body());
    }
}
