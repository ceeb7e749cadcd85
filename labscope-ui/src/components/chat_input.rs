//! Chat Input Component
//!
//! Text box with Send button. Enter sends; empty input is ignored.

use leptos::*;

use crate::state::ChatState;

#[component]
pub fn ChatInput() -> impl IntoView {
    let state = use_context::<ChatState>().expect("ChatState not found");
    let (draft, set_draft) = create_signal(String::new());

    let send = move || {
        let text = draft.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        set_draft.set(String::new());
        state.send_text(&text);
    };

    view! {
        <div class="flex space-x-2 mt-3">
            <input
                type="text"
                placeholder="Ask about the image..."
                prop:value=move || draft.get()
                on:input=move |ev| set_draft.set(event_target_value(&ev))
                on:keydown=move |ev: web_sys::KeyboardEvent| {
                    if ev.key() == "Enter" {
                        ev.prevent_default();
                        send();
                    }
                }
                class="flex-1 bg-gray-700 rounded-lg px-4 py-3 text-white
                       border border-gray-600 focus:border-primary-500 focus:outline-none"
            />
            <button
                on:click=move |_| send()
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                "Send"
            </button>
        </div>
    }
}
