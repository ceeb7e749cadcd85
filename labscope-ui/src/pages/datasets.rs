//! Datasets Page
//!
//! The lab's dataset sheet as a tabbed, filterable table.

use leptos::*;

use crate::components::{DataTable, FilterPanel, TableSkeleton, TechTabs};
use crate::state::DatasetState;

#[component]
pub fn DatasetsPage() -> impl IntoView {
    let state = use_context::<DatasetState>().expect("DatasetState not found");

    // Fetch the sheet on first mount
    create_effect(move |_| state.load());

    view! {
        <div class="space-y-6">
            // Header
            <div>
                <h1 class="text-3xl font-bold">"Datasets"</h1>
                <p class="text-gray-400 mt-1">"Spatial omics datasets available in the lab"</p>
            </div>

            {move || {
                if state.loading.get() {
                    view! { <TableSkeleton /> }.into_view()
                } else {
                    view! {
                        <div class="space-y-4">
                            <TechTabs />
                            <FilterPanel />
                            <DataTable />
                        </div>
                    }.into_view()
                }
            }}
        </div>
    }
}
