//! Navigation Component
//!
//! Header with the two views. The chat tab carries a badge while replies
//! are still outstanding, so leaving the chat never hides pending work.

use leptos::*;
use leptos_router::*;

use crate::state::ChatState;

/// Header tabs, in display order
const TABS: [(&str, &str); 2] = [("/", "Image Chat"), ("/datasets", "Datasets")];

/// Whether `pathname` belongs to the tab at `href`.
///
/// The root tab only matches itself; other tabs also own their subpaths.
fn tab_is_active(href: &str, pathname: &str) -> bool {
    if href == "/" {
        return pathname.is_empty() || pathname == "/";
    }
    pathname == href
        || pathname
            .strip_prefix(href)
            .map_or(false, |rest| rest.starts_with('/'))
}

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<ChatState>().expect("ChatState not found");
    let pending = Signal::derive(move || state.transcript.with(|t| t.pending_count()));

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4 flex items-end justify-between h-14">
                <A href="/" class="self-center text-lg font-semibold tracking-wide text-white">
                    "labscope"
                    <span class="ml-2 text-xs font-normal text-gray-400">"tissue viewer"</span>
                </A>

                <div class="flex items-end space-x-4">
                    {TABS.into_iter().map(|(href, label)| {
                        let badge = (href == "/").then_some(pending);
                        view! { <Tab href=href label=label badge=badge /> }
                    }).collect_view()}
                </div>
            </div>
        </nav>
    }
}

/// Underlined header tab
#[component]
fn Tab(
    href: &'static str,
    label: &'static str,
    badge: Option<Signal<usize>>,
) -> impl IntoView {
    let location = use_location();
    let active = move || location.pathname.with(|path| tab_is_active(href, path));

    view! {
        <A
            href=href
            class=move || {
                if active() {
                    "pb-3 border-b-2 border-primary-500 text-white"
                } else {
                    "pb-3 border-b-2 border-transparent text-gray-400 hover:text-gray-200"
                }
            }
        >
            {label}
            {move || badge.map(|count| count.get()).filter(|n| *n > 0).map(|n| view! {
                <span class="ml-2 px-1.5 rounded-full bg-primary-600 text-xs text-white">{n}</span>
            })}
        </A>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_tab_matches_only_root() {
        assert!(tab_is_active("/", "/"));
        assert!(tab_is_active("/", ""));
        assert!(!tab_is_active("/", "/datasets"));
    }

    #[test]
    fn test_tab_owns_subpaths_but_not_lookalikes() {
        assert!(tab_is_active("/datasets", "/datasets"));
        assert!(tab_is_active("/datasets", "/datasets/visium"));
        assert!(!tab_is_active("/datasets", "/datasets-old"));
        assert!(!tab_is_active("/datasets", "/"));
    }
}
