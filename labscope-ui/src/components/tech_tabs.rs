//! Technology Tabs Component
//!
//! One tab per distinct technology; exactly one is active.

use leptos::*;

use crate::state::DatasetState;

#[component]
pub fn TechTabs() -> impl IntoView {
    let state = use_context::<DatasetState>().expect("DatasetState not found");

    view! {
        <div class="flex flex-wrap gap-2 border-b border-gray-700 pb-3">
            {move || {
                state.facets.with(|f| f.technologies.clone())
                    .into_iter()
                    .map(|tech| {
                        let tech_for_class = tech.clone();
                        let tech_for_click = tech.clone();
                        view! {
                            <button
                                type="button"
                                on:click=move |_| state.filter.update(|f| f.select_technology(&tech_for_click))
                                class=move || {
                                    let base = "px-4 py-2 rounded-t-lg text-sm font-medium transition-colors";
                                    let active = state.filter.with(|f| {
                                        f.active_technology.as_deref() == Some(tech_for_class.as_str())
                                    });
                                    if active {
                                        format!("{} bg-primary-600 text-white", base)
                                    } else {
                                        format!("{} bg-gray-700 text-gray-300 hover:bg-gray-600", base)
                                    }
                                }
                            >
                                {tech}
                            </button>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
