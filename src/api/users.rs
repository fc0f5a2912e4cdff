//! User Endpoints

use reqwest::Method;

use client_cache::{ClientResult, User};

use super::ApiClient;

impl ApiClient {
    /// The signed-in user with roles
    pub async fn fetch_me(&self) -> ClientResult<User> {
        self.send_data(self.request(Method::GET, "me")).await
    }
}
