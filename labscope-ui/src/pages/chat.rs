//! Image Chat Page
//!
//! Drawing surface next to the conversation about it.

use leptos::*;
use leptos_router::*;

use crate::components::{ChatInput, DrawingSurface, TranscriptView};
use crate::state::ChatState;

/// Annotation chat page; `?image=<url>` swaps the displayed raster
#[component]
pub fn ChatPage() -> impl IntoView {
    let state = use_context::<ChatState>().expect("ChatState not found");
    let query = use_query_map();

    let default_image = state.viewer_config.with_value(|v| v.image_url.clone());
    let image_url = Signal::derive(move || {
        query
            .with(|q| q.get("image").cloned())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| default_image.clone())
    });

    view! {
        <div class="grid lg:grid-cols-5 gap-6">
            <section class="lg:col-span-3 bg-gray-800 rounded-xl p-4">
                <DrawingSurface image_url=image_url />
            </section>

            <section class="lg:col-span-2 flex flex-col">
                <div class="flex items-center justify-between mb-3">
                    <h1 class="text-2xl font-bold">"Ask about this image"</h1>
                    <button
                        on:click=move |_| state.reset()
                        class="px-3 py-1 text-sm rounded-lg bg-gray-700 hover:bg-gray-600 transition-colors"
                    >
                        "New chat"
                    </button>
                </div>
                <TranscriptView />
                <ChatInput />
            </section>
        </div>
    }
}
