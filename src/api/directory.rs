//! Directory Endpoints
//!
//! Companies, job offers and company invitations.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use client_cache::flows::DirectoryApi;
use client_cache::{ClientResult, Company, JobDraft, JobOffer, UserSummary, PAGE_SIZE};

use super::{page_for_offset, segment, ApiClient};

#[derive(Serialize)]
struct InviteArgs<'a> {
    user_id: &'a str,
}

#[derive(Serialize)]
struct CreateJobArgs<'a> {
    company_id: &'a str,
    #[serde(flatten)]
    draft: &'a JobDraft,
}

#[async_trait(?Send)]
impl DirectoryApi for ApiClient {
    async fn fetch_companies(&self, offset: usize) -> ClientResult<Vec<Company>> {
        let page = page_for_offset(offset, PAGE_SIZE);
        self.fetch_page("companies", &[("page", page.to_string())]).await
    }

    async fn fetch_users_not_in_company(&self, company_id: &str, offset: usize) -> ClientResult<Vec<UserSummary>> {
        let path = format!("companies/{}/users-not-in-company", segment(company_id));
        self.fetch_page(&path, &[("offset", offset.to_string())]).await
    }

    async fn invite_user(&self, company_id: &str, user_id: &str) -> ClientResult<()> {
        let path = format!("companies/{}/invitations", segment(company_id));
        self.send_empty(self.request(Method::POST, &path).json(&InviteArgs { user_id })).await
    }

    async fn fetch_jobs(&self, offset: usize) -> ClientResult<Vec<JobOffer>> {
        let page = page_for_offset(offset, PAGE_SIZE);
        self.fetch_page("jobs", &[("page", page.to_string())]).await
    }

    async fn create_job(&self, company_id: &str, draft: &JobDraft) -> ClientResult<JobOffer> {
        let args = CreateJobArgs { company_id, draft };
        self.send_data(self.request(Method::POST, "jobs").json(&args)).await
    }

    async fn delete_job(&self, id: &str) -> ClientResult<()> {
        let path = format!("jobs/{}", segment(id));
        self.send_empty(self.request(Method::DELETE, &path)).await
    }
}
