//! Dataset State
//!
//! Rows, facets and the current filter selection for the dataset page.

use leptos::*;

use labscope::config::DatasetConfig;
use labscope::dataset::{load_from_str, DatasetRow, Facets, FilterState};

use crate::api;

/// Dataset browser state provided to all components
#[derive(Clone, Copy)]
pub struct DatasetState {
    pub rows: RwSignal<Vec<DatasetRow>>,
    pub facets: RwSignal<Facets>,
    pub filter: RwSignal<FilterState>,
    /// True while the sheet is being fetched
    pub loading: RwSignal<bool>,
    pub loaded: RwSignal<bool>,
    pub config: StoredValue<DatasetConfig>,
}

/// Provide dataset state to the component tree
pub fn provide_dataset_state() {
    let state = DatasetState {
        rows: create_rw_signal(Vec::new()),
        facets: create_rw_signal(Facets::default()),
        filter: create_rw_signal(FilterState::default()),
        loading: create_rw_signal(false),
        loaded: create_rw_signal(false),
        config: store_value(DatasetConfig::default()),
    };

    provide_context(state);
}

impl DatasetState {
    /// Fetch the sheet once; failures leave an empty table
    pub fn load(&self) {
        if self.loaded.get_untracked() || self.loading.get_untracked() {
            return;
        }
        self.loading.set(true);

        let state = *self;
        let url = self.config.with_value(|c| c.csv_url.clone());
        spawn_local(async move {
            let rows = match api::fetch_dataset_csv(&url).await {
                Ok(text) => load_from_str(&text),
                Err(e) => {
                    web_sys::console::error_1(&format!("Failed to load dataset CSV: {}", e).into());
                    Vec::new()
                }
            };

            let facets = Facets::from_rows(&rows);
            state.filter.set(FilterState::initial(&facets));
            state.facets.set(facets);
            state.rows.set(rows);
            state.loading.set(false);
            state.loaded.set(true);
        });
    }
}
