//! Notification Endpoints

use async_trait::async_trait;
use reqwest::Method;

use client_cache::flows::NotificationApi;
use client_cache::{ClientResult, Notification};

use super::{segment, ApiClient};

#[async_trait(?Send)]
impl NotificationApi for ApiClient {
    async fn fetch_notifications(&self, offset: usize) -> ClientResult<Vec<Notification>> {
        self.fetch_page("notifications", &[("offset", offset.to_string())]).await
    }

    async fn mark_seen(&self, id: &str) -> ClientResult<()> {
        let path = format!("notifications/{}/seen", segment(id));
        self.send_empty(self.request(Method::PUT, &path)).await
    }

    async fn mark_all_seen(&self) -> ClientResult<()> {
        self.send_empty(self.request(Method::PUT, "notifications/seen")).await
    }

    async fn delete_notification(&self, id: &str) -> ClientResult<()> {
        let path = format!("notifications/{}", segment(id));
        self.send_empty(self.request(Method::DELETE, &path)).await
    }
}
