use super::super::Model;
use yew::prelude::*;

pub fn render_preview_area(model: &Model) -> Html {
    let Some(url) = &model.preview_url else {
        return html! {};
    };

    let filename = model
        .selected
        .as_ref()
        .map(|selected| selected.file.name())
        .unwrap_or_else(|| "Selected image".to_string());

    html! {
        <div id="preview-container">
            <img id="actual-image-preview" src={url.to_string()} alt={filename.clone()} />
            <p class="preview-filename">{ filename }</p>
            {
                if let Some(status) = &model.state.upload_status {
                    html! { <p class="upload-status"><i class="fa-solid fa-check"></i>{ format!(" {}", status) }</p> }
                } else {
                    html! {}
                }
            }
            { render_loading(model) }
        </div>
    }
}

fn render_loading(model: &Model) -> Html {
    if !model.state.loading() {
        return html! {};
    }

    let text = if model.state.upload_status.is_some() {
        "Analyzing..."
    } else {
        "Uploading..."
    };

    html! {
        <div class="loading-preview">
            <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
            <p style="margin-left: 10px;">{ text }</p>
        </div>
    }
}
