//! Transcript Component
//!
//! Chat bubbles with thinking dots, typing reveal and ROI thumbnails.

use leptos::*;

use labscope::chat::{Sender, TranscriptEntry};

use crate::state::ChatState;

/// Scrollable list of chat bubbles
#[component]
pub fn TranscriptView() -> impl IntoView {
    let state = use_context::<ChatState>().expect("ChatState not found");
    let container = create_node_ref::<html::Div>();

    // Keep the newest message in view after every change
    create_effect(move |_| {
        state.transcript.track();
        state.overlays.track();
        if let Some(el) = container.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    view! {
        <div
            node_ref=container
            class="flex-1 overflow-y-auto space-y-3 p-4 bg-gray-800 rounded-lg min-h-[24rem] max-h-[36rem]"
        >
            {move || {
                let entries = state.transcript.with(|t| t.entries().to_vec());
                if entries.is_empty() {
                    view! {
                        <p class="text-gray-500 text-center py-8">
                            "Draw a region on the image or ask a question."
                        </p>
                    }.into_view()
                } else {
                    entries.into_iter()
                        .map(|entry| view! { <Bubble entry=entry /> })
                        .collect_view()
                }
            }}
        </div>
    }
}

/// One message bubble
#[component]
fn Bubble(entry: TranscriptEntry) -> impl IntoView {
    let state = use_context::<ChatState>().expect("ChatState not found");
    let id = entry.id;
    let pending = entry.pending;
    let sender = entry.message.sender;
    let stored = entry.message.text.clone();
    let previews = entry.message.preview_urls();

    let text = move || state.display_text(id, &stored);
    let dots = move || {
        state
            .overlays
            .with(|o| o.dots(id).map(str::to_string))
            .unwrap_or_default()
    };
    let typing_done = move || !pending && state.overlays.with(|o| !o.is_typing(id));

    let class = match sender {
        Sender::User => "message user ml-auto bg-primary-600 text-white rounded-lg px-4 py-2 max-w-[80%] w-fit",
        Sender::Ai => "message ai mr-auto bg-gray-700 text-gray-100 rounded-lg px-4 py-2 max-w-[80%] w-fit",
    };

    view! {
        <div class=class>
            <span class="whitespace-pre-wrap">{text}</span>
            {move || pending.then(|| view! {
                <span class="dots text-gray-400">{dots}</span>
            })}

            // ROI previews once the reply is fully shown
            {
                let previews = previews.clone();
                move || {
                    (typing_done() && !previews.is_empty()).then(|| view! {
                        <RoiThumbnails urls=previews.clone() />
                    })
                }
            }
        </div>
    }
}

/// Thumbnails for the ROI images a reply refers to
#[component]
fn RoiThumbnails(urls: Vec<String>) -> impl IntoView {
    view! {
        <div class="roi-thumbs flex flex-wrap gap-2 mt-2">
            {urls.into_iter().map(|url| view! {
                <a href=url.clone() target="_blank" rel="noopener">
                    <img
                        src=url
                        class="w-20 h-20 object-cover rounded border border-gray-600 hover:border-primary-400"
                    />
                </a>
            }).collect_view()}
        </div>
    }
}
