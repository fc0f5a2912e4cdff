//! Load More Sentinel Component
//!
//! Invisible marker at the bottom of a list. When it scrolls into view the
//! next page is requested; the list's in-flight guard absorbs repeats.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

type ObserverSlot = Option<(web_sys::IntersectionObserver, Closure<dyn FnMut(js_sys::Array)>)>;

/// Start loading a bit before the sentinel is actually on screen
const ROOT_MARGIN: &str = "200px";

#[component]
pub fn LoadMoreSentinel(
    #[prop(into)] on_visible: Callback<()>,
    /// List exhausted: stop asking for pages
    done: Signal<bool>,
    loading: Signal<bool>,
) -> impl IntoView {
    let sentinel = NodeRef::<leptos::html::Div>::new();
    let slot: StoredValue<ObserverSlot, LocalStorage> = StoredValue::new_local(None);

    Effect::new(move |_| {
        let Some(el) = sentinel.get() else { return };
        if slot.with_value(|s| s.is_some()) {
            return;
        }
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            let visible = entries.iter().any(|entry| {
                entry.unchecked_into::<web_sys::IntersectionObserverEntry>().is_intersecting()
            });
            if visible && !done.get_untracked() {
                on_visible.run(());
            }
        });
        let options = web_sys::IntersectionObserverInit::new();
        options.set_root_margin(ROOT_MARGIN);
        match web_sys::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
            Ok(observer) => {
                observer.observe(&el);
                slot.set_value(Some((observer, callback)));
            }
            Err(e) => {
                tracing::warn!(error = ?e, "IntersectionObserver unavailable");
            }
        }
    });

    // A short page can leave the sentinel on screen; observing again makes
    // the browser report the current intersection once more.
    Effect::new(move |_| {
        if loading.get() || done.get() {
            return;
        }
        let Some(el) = sentinel.get_untracked() else { return };
        slot.with_value(|s| {
            if let Some((observer, _)) = s {
                observer.unobserve(&el);
                observer.observe(&el);
            }
        });
    });

    on_cleanup(move || {
        slot.with_value(|s| {
            if let Some((observer, _)) = s {
                observer.disconnect();
            }
        });
    });

    view! {
        <div class="load-more-sentinel" node_ref=sentinel>
            <Show when=move || loading.get()>
                <div class="loading">"Loading..."</div>
            </Show>
        </div>
    }
}
