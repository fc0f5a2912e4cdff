//! Diagnostics Panel
//!
//! Recent log lines from the in-app buffer, for admins reporting issues.

use leptos::prelude::*;

use crate::components::{roles, RoleGuard};
use crate::context::use_app_context;

#[component]
pub fn DiagnosticsPanel() -> impl IntoView {
    let ctx = use_app_context();
    let (lines, set_lines) = signal(Vec::<String>::new());
    let refresh = move || set_lines.set(ctx.recent_logs());

    view! {
        <RoleGuard allowed=roles(&["admin"])>
            <details class="diagnostics" on:toggle=move |_| refresh()>
                <summary>"Diagnostics"</summary>
                <button class="refresh-btn" on:click=move |_| refresh()>"Refresh"</button>
                <pre class="log-lines">{move || lines.get().join("\n")}</pre>
            </details>
        </RoleGuard>
    }
}
