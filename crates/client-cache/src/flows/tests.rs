//! Flow Tests
//!
//! Flows run against a `RefCell` state and scripted in-memory backends.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    use crate::flows::{self, DirectoryApi, FeedApi, NotificationApi};
    use crate::models::*;
    use crate::{ClientError, ClientResult, DirectoryState, EntityId, FeedState, NotificationState, PAGE_SIZE};

    fn user(id: &str) -> UserSummary {
        UserSummary { id: EntityId::server(id), name: id.to_uppercase(), avatar_url: None }
    }

    fn post(id: &str, body: &str) -> Post {
        Post {
            id: EntityId::server(id),
            author: user("me"),
            body: body.to_string(),
            media: Vec::new(),
            comments: Vec::new(),
            likes: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn offline() -> ClientError {
        ClientError::Network("offline".into())
    }

    /// Scripted feed backend: pages are served in order, `fail` flips every
    /// mutation into a network error.
    #[derive(Default)]
    struct MockFeed {
        pages: RefCell<VecDeque<ClientResult<Vec<Post>>>>,
        offsets: RefCell<Vec<usize>>,
        fail: Cell<bool>,
        next_id: Cell<u32>,
    }

    impl MockFeed {
        fn with_pages(pages: Vec<ClientResult<Vec<Post>>>) -> Self {
            Self { pages: RefCell::new(pages.into()), ..Default::default() }
        }

        fn check(&self) -> ClientResult<()> {
            if self.fail.get() { Err(offline()) } else { Ok(()) }
        }

        fn issue_id(&self) -> String {
            self.next_id.set(self.next_id.get() + 1);
            format!("srv-{}", self.next_id.get())
        }
    }

    #[async_trait(?Send)]
    impl FeedApi for MockFeed {
        async fn fetch_posts(&self, offset: usize) -> ClientResult<Vec<Post>> {
            self.offsets.borrow_mut().push(offset);
            self.pages.borrow_mut().pop_front().unwrap_or(Ok(Vec::new()))
        }

        async fn create_post(&self, draft: &PostDraft) -> ClientResult<Post> {
            self.check()?;
            Ok(post(&self.issue_id(), &draft.body))
        }

        async fn update_post(&self, id: &str, body: &str) -> ClientResult<Post> {
            self.check()?;
            Ok(post(id, body))
        }

        async fn delete_post(&self, _id: &str) -> ClientResult<()> {
            self.check()
        }

        async fn create_comment(&self, post_id: &str, body: &str) -> ClientResult<Comment> {
            self.check()?;
            Ok(Comment {
                id: EntityId::server(self.issue_id()),
                post_id: EntityId::server(post_id),
                author: user("me"),
                body: body.to_string(),
                created_at: Utc::now(),
            })
        }

        async fn delete_comment(&self, _id: &str) -> ClientResult<()> {
            self.check()
        }

        async fn like_post(&self, _post_id: &str) -> ClientResult<()> {
            self.check()
        }

        async fn unlike_post(&self, _post_id: &str) -> ClientResult<()> {
            self.check()
        }
    }

    fn posts(start: usize, len: usize) -> Vec<Post> {
        (start..start + len).map(|i| post(&i.to_string(), "body")).collect()
    }

    #[tokio::test]
    async fn test_pages_advance_cursor() {
        let api = MockFeed::with_pages(vec![Ok(posts(0, 10)), Ok(posts(10, 10)), Ok(posts(20, 4))]);
        let state = RefCell::new(FeedState::new());

        for _ in 0..3 {
            flows::load_posts(&api, &state).await.unwrap();
        }
        assert_eq!(state.borrow().posts.cursor(), 3 * PAGE_SIZE);
        assert_eq!(state.borrow().posts.len(), 24);
        assert_eq!(*api.offsets.borrow(), vec![0, 10, 20]);
    }

    #[tokio::test]
    async fn test_failed_page_is_retried_at_same_offset() {
        let api = MockFeed::with_pages(vec![Ok(posts(0, 10)), Err(offline()), Ok(posts(10, 2))]);
        let state = RefCell::new(FeedState::new());

        flows::load_posts(&api, &state).await.unwrap();
        assert!(flows::load_posts(&api, &state).await.is_err());
        assert_eq!(state.borrow().posts.cursor(), 10);
        flows::load_posts(&api, &state).await.unwrap();
        assert_eq!(*api.offsets.borrow(), vec![0, 10, 10]);
        assert_eq!(state.borrow().posts.len(), 12);
    }

    #[tokio::test]
    async fn test_exhausted_list_stops_fetching() {
        let api = MockFeed::with_pages(vec![Ok(posts(0, 10)), Ok(Vec::new())]);
        let state = RefCell::new(FeedState::new());

        flows::load_posts(&api, &state).await.unwrap();
        assert_eq!(flows::load_posts(&api, &state).await, Ok(0));
        assert_eq!(flows::load_posts(&api, &state).await, Ok(0));
        assert_eq!(api.offsets.borrow().len(), 2);
        assert_eq!(state.borrow().posts.cursor(), 10);
    }

    #[tokio::test]
    async fn test_create_post_success() {
        let api = MockFeed::default();
        let state = RefCell::new(FeedState::new());
        let draft = PostDraft { body: "Doors open at 9".into(), media: Vec::new() };

        let id = flows::create_post(&api, &state, user("me"), draft).await.unwrap();
        let feed = state.borrow();
        assert_eq!(feed.posts.len(), 1);
        let only = feed.posts.values().next().unwrap();
        assert_eq!(only.id, id);
        assert!(!only.id.is_temp());
    }

    #[tokio::test]
    async fn test_create_post_failure_rolls_back() {
        let api = MockFeed::with_pages(vec![Ok(posts(0, 3))]);
        let state = RefCell::new(FeedState::new());
        flows::load_posts(&api, &state).await.unwrap();
        let before = state.borrow().posts.entries().to_vec();

        api.fail.set(true);
        let draft = PostDraft { body: "lost".into(), media: Vec::new() };
        let err = flows::create_post(&api, &state, user("me"), draft).await.unwrap_err();
        assert_eq!(err, offline());
        assert_eq!(state.borrow().posts.entries(), &before[..]);
    }

    #[tokio::test]
    async fn test_like_failure_reverts() {
        let api = MockFeed::with_pages(vec![Ok(posts(0, 1))]);
        let state = RefCell::new(FeedState::new());
        flows::load_posts(&api, &state).await.unwrap();
        let key = state.borrow().posts.key_of(&EntityId::server("0")).unwrap();
        let me = EntityId::server("me");

        assert_eq!(flows::toggle_like(&api, &state, key, me.clone()).await, Ok(true));
        api.fail.set(true);
        assert!(flows::toggle_like(&api, &state, key, me.clone()).await.is_err());
        // Unlike failed, like is back
        let feed = state.borrow();
        let post = feed.post(key).unwrap();
        assert_eq!(post.like_count(), 1);
        assert!(post.is_liked_by(&me));
    }

    #[tokio::test]
    async fn test_comment_and_delete_flows() {
        let api = MockFeed::with_pages(vec![Ok(posts(0, 2))]);
        let state = RefCell::new(FeedState::new());
        flows::load_posts(&api, &state).await.unwrap();
        let key = state.borrow().posts.key_of(&EntityId::server("1")).unwrap();

        let comment_id = flows::add_comment(&api, &state, key, user("me"), "see you there".into()).await.unwrap();
        assert_eq!(state.borrow().post(key).unwrap().comments[0].id, comment_id);

        api.fail.set(true);
        assert!(flows::delete_comment(&api, &state, key, comment_id).await.is_err());
        assert_eq!(state.borrow().post(key).unwrap().comments.len(), 1);

        assert!(flows::delete_post(&api, &state, key).await.is_err());
        assert_eq!(state.borrow().posts.position(key), Some(1));

        api.fail.set(false);
        flows::delete_post(&api, &state, key).await.unwrap();
        assert_eq!(state.borrow().posts.len(), 1);
    }

    #[tokio::test]
    async fn test_edit_failure_restores_body() {
        let api = MockFeed::with_pages(vec![Ok(posts(0, 1))]);
        let state = RefCell::new(FeedState::new());
        flows::load_posts(&api, &state).await.unwrap();
        let key = state.borrow().posts.key_of(&EntityId::server("0")).unwrap();

        api.fail.set(true);
        assert!(flows::edit_post(&api, &state, key, "changed".into()).await.is_err());
        assert_eq!(state.borrow().post(key).unwrap().body, "body");
    }

    #[tokio::test]
    async fn test_delete_post_failure_reinserts_at_index() {
        let api = MockFeed::with_pages(vec![Ok(posts(0, 3))]);
        let state = RefCell::new(FeedState::new());
        flows::load_posts(&api, &state).await.unwrap();
        let key = state.borrow().posts.entries()[1].key;

        api.fail.set(true);
        assert!(flows::delete_post(&api, &state, key).await.is_err());
        assert_eq!(state.borrow().posts.len(), 3);
        assert_eq!(state.borrow().posts.position(key), Some(1));

        api.fail.set(false);
        flows::delete_post(&api, &state, key).await.unwrap();
        assert_eq!(state.borrow().posts.len(), 2);
        assert!(state.borrow().post(key).is_none());
    }

    // ========================
    // Notifications
    // ========================

    struct MockNotifications {
        items: Vec<Notification>,
        fail: Cell<bool>,
    }

    #[async_trait(?Send)]
    impl NotificationApi for MockNotifications {
        async fn fetch_notifications(&self, offset: usize) -> ClientResult<Vec<Notification>> {
            Ok(self.items.iter().skip(offset).take(PAGE_SIZE).cloned().collect())
        }

        async fn mark_seen(&self, _id: &str) -> ClientResult<()> {
            if self.fail.get() { Err(offline()) } else { Ok(()) }
        }

        async fn mark_all_seen(&self) -> ClientResult<()> {
            if self.fail.get() { Err(offline()) } else { Ok(()) }
        }

        async fn delete_notification(&self, _id: &str) -> ClientResult<()> {
            if self.fail.get() { Err(offline()) } else { Ok(()) }
        }
    }

    fn notifications(count: usize) -> Vec<Notification> {
        (0..count)
            .map(|i| Notification {
                id: EntityId::server(i.to_string()),
                sender: user("sender"),
                message: "liked your post".into(),
                seen: SeenStatus::NotSeen,
                created_at: Utc::now(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_notification_pages_then_end() {
        let api = MockNotifications { items: notifications(10), fail: Cell::new(false) };
        let state = RefCell::new(NotificationState::new());

        assert_eq!(flows::load_notifications(&api, &state).await, Ok(10));
        assert_eq!(state.borrow().list.cursor(), 10);
        assert_eq!(flows::load_notifications(&api, &state).await, Ok(0));
        assert_eq!(state.borrow().list.cursor(), 10);
        assert!(state.borrow().list.is_exhausted());
    }

    #[tokio::test]
    async fn test_mark_all_seen_failure() {
        let api = MockNotifications { items: notifications(3), fail: Cell::new(true) };
        let state = RefCell::new(NotificationState::new());
        flows::load_notifications(&api, &state).await.unwrap();

        assert!(flows::mark_all_seen(&api, &state).await.is_err());
        assert_eq!(state.borrow().unseen_count(), 3);

        api.fail.set(false);
        let key = state.borrow().list.entries()[0].key;
        flows::mark_seen(&api, &state, key).await.unwrap();
        assert_eq!(state.borrow().unseen_count(), 2);
    }

    #[tokio::test]
    async fn test_delete_notification_failure_restores() {
        let api = MockNotifications { items: notifications(2), fail: Cell::new(true) };
        let state = RefCell::new(NotificationState::new());
        flows::load_notifications(&api, &state).await.unwrap();
        let key = state.borrow().list.entries()[0].key;

        assert!(flows::delete_notification(&api, &state, key).await.is_err());
        assert_eq!(state.borrow().list.position(key), Some(0));
        assert_eq!(state.borrow().unseen_count(), 2);
    }

    #[tokio::test]
    async fn test_delete_unsaved_notification_keeps_it() {
        let api = MockNotifications { items: notifications(1), fail: Cell::new(false) };
        let state = RefCell::new(NotificationState::new());
        flows::load_notifications(&api, &state).await.unwrap();
        let mut unsaved = notifications(1).remove(0);
        unsaved.id = EntityId::Temp(5);
        let key = state.borrow_mut().push(unsaved).unwrap();

        let err = flows::delete_notification(&api, &state, key).await.unwrap_err();
        assert!(matches!(err, ClientError::Conflict(_)));
        assert_eq!(state.borrow().list.position(key), Some(0));
        assert_eq!(state.borrow().list.len(), 2);
    }

    // ========================
    // Directory
    // ========================

    struct MockDirectory {
        fail: Cell<bool>,
    }

    #[async_trait(?Send)]
    impl DirectoryApi for MockDirectory {
        async fn fetch_companies(&self, _offset: usize) -> ClientResult<Vec<Company>> {
            Ok(Vec::new())
        }

        async fn fetch_users_not_in_company(&self, _company_id: &str, offset: usize) -> ClientResult<Vec<UserSummary>> {
            if offset > 0 {
                return Ok(Vec::new());
            }
            Ok(vec![user("a"), user("b"), user("c")])
        }

        async fn invite_user(&self, _company_id: &str, _user_id: &str) -> ClientResult<()> {
            if self.fail.get() { Err(ClientError::http(403, "Forbidden")) } else { Ok(()) }
        }

        async fn fetch_jobs(&self, _offset: usize) -> ClientResult<Vec<JobOffer>> {
            Ok(Vec::new())
        }

        async fn create_job(&self, company_id: &str, draft: &JobDraft) -> ClientResult<JobOffer> {
            if self.fail.get() {
                return Err(offline());
            }
            Ok(JobOffer {
                id: EntityId::server("job-1"),
                company_id: EntityId::server(company_id),
                title: draft.title.clone(),
                description: draft.description.clone(),
                location: None,
                contract_type: None,
                created_at: None,
            })
        }

        async fn delete_job(&self, _id: &str) -> ClientResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_invite_flow() {
        let api = MockDirectory { fail: Cell::new(true) };
        let state = RefCell::new(DirectoryState::new());
        flows::load_users_not_in_company(&api, &state, "c1").await.unwrap();
        let key = state.borrow().not_in_company.key_of(&EntityId::server("b")).unwrap();

        let err = flows::invite_user(&api, &state, "c1", key).await.unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(state.borrow().not_in_company.position(key), Some(1));

        api.fail.set(false);
        flows::invite_user(&api, &state, "c1", key).await.unwrap();
        assert_eq!(state.borrow().not_in_company.len(), 2);
    }

    #[tokio::test]
    async fn test_invite_unsaved_user_keeps_row() {
        let api = MockDirectory { fail: Cell::new(false) };
        let state = RefCell::new(DirectoryState::new());
        flows::load_users_not_in_company(&api, &state, "c1").await.unwrap();
        let unsaved = UserSummary { id: EntityId::Temp(3), name: "New".into(), avatar_url: None };
        let key = state.borrow_mut().not_in_company.prepend(unsaved).unwrap();

        let err = flows::invite_user(&api, &state, "c1", key).await.unwrap_err();
        assert!(matches!(err, ClientError::Conflict(_)));
        assert_eq!(state.borrow().not_in_company.position(key), Some(0));
        assert_eq!(state.borrow().not_in_company.len(), 4);
    }

    #[tokio::test]
    async fn test_job_flows() {
        let api = MockDirectory { fail: Cell::new(false) };
        let state = RefCell::new(DirectoryState::new());
        let draft = JobDraft { title: "Hostess".into(), ..Default::default() };

        let id = flows::create_job(&api, &state, EntityId::server("c1"), draft.clone()).await.unwrap();
        assert_eq!(id, EntityId::server("job-1"));

        let key = state.borrow().jobs.key_of(&id).unwrap();
        flows::delete_job(&api, &state, key).await.unwrap();
        assert!(state.borrow().jobs.is_empty());

        api.fail.set(true);
        assert!(flows::create_job(&api, &state, EntityId::server("c1"), draft).await.is_err());
        assert!(state.borrow().jobs.is_empty());

        // A company that is itself still pending cannot own a job
        let err = flows::create_job(&api, &state, EntityId::Temp(1), JobDraft::default()).await.unwrap_err();
        assert!(matches!(err, ClientError::Conflict(_)));
    }
}
