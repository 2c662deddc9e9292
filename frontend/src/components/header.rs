use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-images"></i> {" Image Analysis Dashboard"}</h1>
            <p class="subtitle">{"Classify an image with a hosted vision model"}</p>
        </header>
    }
}
