//! Loading Component
//!
//! Skeleton shown while the dataset sheet loads.

use leptos::*;

/// Skeleton loader for table rows
#[component]
pub fn TableSkeleton(
    #[prop(default = 5)]
    count: usize,
) -> impl IntoView {
    view! {
        <div class="space-y-2 animate-pulse">
            {(0..count).map(|_| view! {
                <div class="bg-gray-700 rounded h-8" />
            }).collect_view()}
        </div>
    }
}
