//! `GET /<root>/`: the HTML page documenting every registered event.

use axum::extract::State;
use axum::response::Html;

use super::AppState;
use crate::service::{describe_events, render_index, INDEX_TEMPLATE};

pub async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let url_name = &state.endpoint.url_name;
    let rows = describe_events(&state.registry, url_name);
    Html(render_index(INDEX_TEMPLATE, url_name, &rows, &state.root_url))
}
