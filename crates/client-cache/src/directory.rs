//! Directory State
//!
//! Company directory, job offers, and the users a company can still invite.

use tracing::debug;

use crate::entity::{EntityId, EntryKey, TempIdGenerator};
use crate::models::{Company, JobDraft, JobOffer, UserSummary};
use crate::optimistic::{Pending, Removal};
use crate::paged::PagedList;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryState {
    pub companies: PagedList<Company>,
    pub jobs: PagedList<JobOffer>,
    pub not_in_company: PagedList<UserSummary>,
    temp_ids: TempIdGenerator,
}

impl DirectoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invited users leave the "not in company" list right away
    pub fn begin_invite(&mut self, key: EntryKey) -> Option<Removal<UserSummary>> {
        let removal = self.not_in_company.remove(key)?;
        debug!(user = %removal.value().id, "user invited optimistically");
        Some(removal)
    }

    pub fn restore_invite(&mut self, removal: Removal<UserSummary>) {
        self.not_in_company.restore(removal);
    }

    pub fn begin_create_job(&mut self, company_id: EntityId, draft: &JobDraft) -> Pending {
        let job = JobOffer {
            id: EntityId::Temp(0),
            company_id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            location: draft.location.clone(),
            contract_type: draft.contract_type.clone(),
            created_at: None,
        };
        self.jobs.insert_front(&mut self.temp_ids, job)
    }

    pub fn confirm_job(&mut self, pending: &Pending, job: JobOffer) -> bool {
        self.jobs.reconcile(pending, job)
    }

    pub fn fail_job(&mut self, pending: &Pending) {
        let _ = self.jobs.discard(pending);
    }

    pub fn begin_delete_job(&mut self, key: EntryKey) -> Option<Removal<JobOffer>> {
        if self.jobs.get(key)?.id.is_temp() {
            return None;
        }
        self.jobs.remove(key)
    }

    pub fn restore_job(&mut self, removal: Removal<JobOffer>) {
        self.jobs.restore(removal);
    }
}
