use dioxus::prelude::*;

use super::recipients::RecipientsPanel;
use super::settings::SettingsPanel;
use super::templates::TemplatesPanel;
use super::user_context::UserContextPanel;
use crate::app_context::AppContext;
use crate::icons;

#[derive(Clone, Copy, PartialEq)]
enum Tab {
    UserContext,
    Recipients,
    Templates,
    Settings,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::UserContext, Tab::Recipients, Tab::Templates, Tab::Settings];

    fn title(self) -> &'static str {
        match self {
            Tab::UserContext => "Your Context",
            Tab::Recipients => "Recipients",
            Tab::Templates => "Templates",
            Tab::Settings => "Settings",
        }
    }
}

#[component]
fn TabIcon(tab: Tab) -> Element {
    let class = Some("w-4 h-4 mr-2".to_string());
    match tab {
        Tab::UserContext => rsx! { icons::User { class } },
        Tab::Recipients => rsx! { icons::Users { class } },
        Tab::Templates => rsx! { icons::Mail { class } },
        Tab::Settings => rsx! { icons::Settings { class } },
    }
}

#[component]
pub fn Dashboard() -> Element {
    let ctx = use_context::<AppContext>();
    let mut active = use_signal(|| Tab::UserContext);

    rsx! {
        div { class: "min-h-screen bg-gray-50",
            header { class: "bg-white border-b border-gray-200",
                div { class: "max-w-5xl mx-auto px-6 py-4 flex items-center justify-between",
                    div {
                        h1 { class: "text-2xl font-bold text-gray-900", "Mail Assistant" }
                        p { class: "text-sm text-gray-500", "Context for better drafts" }
                    }
                    span { class: "text-xs text-gray-400", "v{ctx.version}" }
                }
            }

            div { class: "max-w-5xl mx-auto px-6 py-6",
                nav { class: "flex space-x-2 mb-6",
                    for tab in Tab::ALL {
                        button {
                            key: "{tab.title()}",
                            class: if active() == tab {
                                "flex items-center px-4 py-2 rounded-lg bg-blue-600 text-white"
                            } else {
                                "flex items-center px-4 py-2 rounded-lg text-gray-600 hover:bg-gray-100"
                            },
                            onclick: move |_| active.set(tab),
                            TabIcon { tab }
                            span { "{tab.title()}" }
                        }
                    }
                }

                match active() {
                    Tab::UserContext => rsx! { UserContextPanel {} },
                    Tab::Recipients => rsx! { RecipientsPanel {} },
                    Tab::Templates => rsx! { TemplatesPanel {} },
                    Tab::Settings => rsx! { SettingsPanel {} },
                }
            }
        }
    }
}
