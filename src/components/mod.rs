//! UI Components
//!
//! Reusable Leptos components.

use chrono::{DateTime, Local, Utc};

mod delete_confirm_button;
mod diagnostics;
mod directory;
mod feed;
mod job_board;
mod load_more_sentinel;
mod new_post_form;
mod notification_list;
mod post_card;
mod role_guard;
mod toast_host;

pub use delete_confirm_button::DeleteConfirmButton;
pub use diagnostics::DiagnosticsPanel;
pub use directory::{CompanyList, UsersNotInCompany};
pub use feed::Feed;
pub use job_board::JobBoard;
pub use load_more_sentinel::LoadMoreSentinel;
pub use new_post_form::NewPostForm;
pub use notification_list::{NotificationBell, NotificationList};
pub use post_card::{CommentList, LikeButton, PostCard};
pub use role_guard::{roles, RoleGuard};
pub use toast_host::ToastHost;

/// Server timestamp shown in the viewer's local time
pub fn display_time(at: &DateTime<Utc>, format: &str) -> String {
    at.with_timezone(&Local).format(format).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_time_matches_local_conversion() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let expected = at.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string();
        assert_eq!(display_time(&at, "%d/%m/%Y %H:%M"), expected);
        assert_eq!(display_time(&at, "%Y"), "2024");
    }
}
