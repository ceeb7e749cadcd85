//! Filter Panel Component
//!
//! Collapsible dropdown holding three collapsible checkbox groups and the
//! free-text search box.

use leptos::*;

use labscope::dataset::FilterState;

use crate::state::DatasetState;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Group {
    Tissue,
    Species,
    Status,
}

impl Group {
    fn title(&self) -> &'static str {
        match self {
            Group::Tissue => "Tissue",
            Group::Species => "Species",
            Group::Status => "Disease status",
        }
    }

    fn is_checked(&self, filter: &FilterState, value: &str) -> bool {
        match self {
            Group::Tissue => filter.selected_tissues.contains(value),
            Group::Species => filter.selected_species.contains(value),
            Group::Status => filter.selected_statuses.contains(value),
        }
    }

    fn toggle(&self, filter: &mut FilterState, value: &str, checked: bool) {
        match self {
            Group::Tissue => filter.toggle_tissue(value, checked),
            Group::Species => filter.toggle_species(value, checked),
            Group::Status => filter.toggle_status(value, checked),
        }
    }
}

#[component]
pub fn FilterPanel() -> impl IntoView {
    let state = use_context::<DatasetState>().expect("DatasetState not found");
    let (open, set_open) = create_signal(false);

    view! {
        <div class="flex flex-col md:flex-row md:items-start gap-3">
            <div class="relative">
                <button
                    type="button"
                    on:click=move |_| set_open.update(|o| *o = !*o)
                    class="px-4 py-2 rounded-lg bg-gray-700 hover:bg-gray-600 text-sm font-medium transition-colors"
                >
                    {move || if open.get() { "Filters ▲" } else { "Filters ▼" }}
                </button>

                {move || open.get().then(|| view! {
                    <div class="absolute z-10 mt-2 w-72 bg-gray-800 border border-gray-700 rounded-lg p-3 space-y-2 shadow-lg">
                        <CheckboxGroup group=Group::Tissue />
                        <CheckboxGroup group=Group::Species />
                        <CheckboxGroup group=Group::Status />
                    </div>
                })}
            </div>

            <input
                type="search"
                placeholder="Search datasets..."
                prop:value=move || state.filter.with(|f| f.search_text.clone())
                on:keyup=move |ev| {
                    let text = event_target_value(&ev);
                    state.filter.update(|f| f.set_search(&text));
                }
                class="flex-1 bg-gray-700 rounded-lg px-4 py-2 text-white
                       border border-gray-600 focus:border-primary-500 focus:outline-none"
            />
        </div>
    }
}

#[component]
fn CheckboxGroup(group: Group) -> impl IntoView {
    let state = use_context::<DatasetState>().expect("DatasetState not found");
    let (expanded, set_expanded) = create_signal(true);

    let values = move || {
        state.facets.with(|f| match group {
            Group::Tissue => f.tissues.clone(),
            Group::Species => f.species.clone(),
            Group::Status => f.statuses.clone(),
        })
    };

    view! {
        <div>
            <button
                type="button"
                on:click=move |_| set_expanded.update(|e| *e = !*e)
                class="w-full flex justify-between text-sm font-semibold text-gray-300 py-1"
            >
                <span>{group.title()}</span>
                <span>{move || if expanded.get() { "−" } else { "+" }}</span>
            </button>

            {move || expanded.get().then(|| view! {
                <div class="pl-2 space-y-1 max-h-40 overflow-y-auto">
                    {values().into_iter().map(|value| {
                        let value_for_check = value.clone();
                        let value_for_change = value.clone();
                        view! {
                            <label class="flex items-center space-x-2 text-sm text-gray-300">
                                <input
                                    type="checkbox"
                                    prop:checked=move || state.filter.with(|f| group.is_checked(f, &value_for_check))
                                    on:change=move |ev| {
                                        let checked = event_target_checked(&ev);
                                        state.filter.update(|f| group.toggle(f, &value_for_change, checked));
                                    }
                                />
                                <span>{value}</span>
                            </label>
                        }
                    }).collect_view()}
                </div>
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_touches_only_its_facet() {
        let mut filter = FilterState::default();
        Group::Species.toggle(&mut filter, "human", true);

        assert!(Group::Species.is_checked(&filter, "human"));
        assert!(!Group::Tissue.is_checked(&filter, "human"));
        assert!(filter.selected_tissues.is_empty());
        assert!(filter.selected_statuses.is_empty());

        Group::Species.toggle(&mut filter, "human", false);
        assert!(!Group::Species.is_checked(&filter, "human"));
    }
}
