//! Data Table Component
//!
//! Rebuilt from scratch from the filtered rows on every filter change.

use leptos::*;

use labscope::dataset::{apply_filters, render_table, TableCell, TABLE_COLUMNS};

use crate::state::DatasetState;

#[component]
pub fn DataTable() -> impl IntoView {
    let state = use_context::<DatasetState>().expect("DatasetState not found");

    let body = create_memo(move |_| {
        state
            .rows
            .with(|rows| state.filter.with(|f| render_table(apply_filters(rows, f))))
    });

    view! {
        <div class="overflow-x-auto">
            <p class="text-sm text-gray-400 mb-2">
                {move || format!("{} of {} datasets", body.with(Vec::len), state.rows.with(Vec::len))}
            </p>
            <table class="min-w-full text-sm">
                <thead class="bg-gray-800">
                    <tr>
                        {TABLE_COLUMNS.iter().map(|column| view! {
                            <th class="px-3 py-2 text-left font-semibold text-gray-300 whitespace-nowrap">
                                {*column}
                            </th>
                        }).collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {move || body.get().into_iter().map(|cells| view! {
                        <tr class="border-b border-gray-800 hover:bg-gray-800">
                            {cells.into_iter().map(|cell| view! {
                                <td class="px-3 py-2 text-gray-200">{render_cell(cell)}</td>
                            }).collect_view()}
                        </tr>
                    }).collect_view()}
                </tbody>
            </table>
        </div>
    }
}

fn render_cell(cell: TableCell) -> View {
    match cell {
        TableCell::Text(text) => text.into_view(),
        TableCell::Link { href, label } => view! {
            <a href=href target="_blank" rel="noopener" class="text-primary-400 hover:underline">
                {label}
            </a>
        }
        .into_view(),
    }
}
