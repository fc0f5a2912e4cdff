//! Role Guard Component
//!
//! Renders children only for users whose roles pass a `client_cache::RoleGuard`.

use leptos::prelude::*;

use client_cache::Role;

use crate::store::{use_app_store, AppStateStoreFields};

/// Role-gated children
///
/// # Arguments
/// * `allowed` - at least one of these roles is required
/// * `exclusive` - if set, the user may hold no role outside this list
/// * `fallback` - rendered when the check fails (nothing by default)
#[component]
pub fn RoleGuard(
    #[prop(into)] allowed: Vec<Role>,
    #[prop(optional, into)] exclusive: Option<Vec<Role>>,
    #[prop(optional, into)] fallback: ViewFn,
    children: ChildrenFn,
) -> impl IntoView {
    let store = use_app_store();
    let guard = client_cache::RoleGuard { allowed, exclusive };

    let permitted = move || {
        store
            .current_user()
            .read()
            .as_ref()
            .is_some_and(|user| guard.permits(&user.roles))
    };

    view! {
        <Show when=permitted fallback=fallback>
            {children()}
        </Show>
    }
}

/// Role list from string literals
pub fn roles(names: &[&str]) -> Vec<Role> {
    names.iter().map(|name| Role::from(*name)).collect()
}
