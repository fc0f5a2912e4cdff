//! Feed Endpoints
//!
//! Posts, comments and likes.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use client_cache::flows::FeedApi;
use client_cache::{ClientResult, Comment, Post, PostDraft};

use super::{segment, ApiClient};

#[derive(Serialize)]
struct UpdatePostArgs<'a> {
    body: &'a str,
}

#[derive(Serialize)]
struct CreateCommentArgs<'a> {
    body: &'a str,
}

#[async_trait(?Send)]
impl FeedApi for ApiClient {
    async fn fetch_posts(&self, offset: usize) -> ClientResult<Vec<Post>> {
        self.fetch_page("posts", &[("offset", offset.to_string())]).await
    }

    async fn create_post(&self, draft: &PostDraft) -> ClientResult<Post> {
        self.send_data(self.request(Method::POST, "posts").json(draft)).await
    }

    async fn update_post(&self, id: &str, body: &str) -> ClientResult<Post> {
        let path = format!("posts/{}", segment(id));
        self.send_data(self.request(Method::PUT, &path).json(&UpdatePostArgs { body })).await
    }

    async fn delete_post(&self, id: &str) -> ClientResult<()> {
        let path = format!("posts/{}", segment(id));
        self.send_empty(self.request(Method::DELETE, &path)).await
    }

    async fn create_comment(&self, post_id: &str, body: &str) -> ClientResult<Comment> {
        let path = format!("posts/{}/comments", segment(post_id));
        self.send_data(self.request(Method::POST, &path).json(&CreateCommentArgs { body })).await
    }

    async fn delete_comment(&self, id: &str) -> ClientResult<()> {
        let path = format!("comments/{}", segment(id));
        self.send_empty(self.request(Method::DELETE, &path)).await
    }

    async fn like_post(&self, post_id: &str) -> ClientResult<()> {
        let path = format!("posts/{}/like", segment(post_id));
        self.send_empty(self.request(Method::POST, &path)).await
    }

    async fn unlike_post(&self, post_id: &str) -> ClientResult<()> {
        let path = format!("posts/{}/like", segment(post_id));
        self.send_empty(self.request(Method::DELETE, &path)).await
    }
}
