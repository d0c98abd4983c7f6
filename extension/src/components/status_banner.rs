use dioxus::prelude::*;

use crate::icons;
use crate::status::{SaveStatus, StatusKind};

/// Show `status` and clear it again after `dismiss_ms`
pub fn flash(mut slot: Signal<Option<SaveStatus>>, status: SaveStatus, dismiss_ms: u32) {
    slot.set(Some(status.clone()));
    spawn(async move {
        gloo_timers::future::TimeoutFuture::new(dismiss_ms).await;
        // a newer banner may have replaced this one meanwhile
        if slot.peek().as_ref() == Some(&status) {
            slot.set(None);
        }
    });
}

#[component]
pub fn StatusBanner(status: Signal<Option<SaveStatus>>) -> Element {
    let Some(current) = status() else {
        return rsx! {};
    };

    let (style, icon) = match current.kind {
        StatusKind::Success => (
            "flex items-center mb-4 p-3 rounded-lg bg-green-50 border border-green-200 text-green-800",
            rsx! { icons::CheckCircle { class: Some("w-4 h-4 mr-2".to_string()) } },
        ),
        StatusKind::Error => (
            "flex items-center mb-4 p-3 rounded-lg bg-red-50 border border-red-200 text-red-800",
            rsx! { icons::AlertCircle { class: Some("w-4 h-4 mr-2".to_string()) } },
        ),
    };

    rsx! {
        div { class: style,
            {icon}
            span { class: "text-sm", "{current.message}" }
        }
    }
}
