use shared::orchestrator::ConnectionStatus;
use yew::prelude::*;

pub fn render_api_status(status: &ConnectionStatus) -> Html {
    let (class, icon) = match status {
        ConnectionStatus::Checking => ("checking", "fa-solid fa-spinner fa-spin"),
        ConnectionStatus::Connected(_) => ("connected", "fa-solid fa-circle-check"),
        ConnectionStatus::Failed(_) => ("failed", "fa-solid fa-triangle-exclamation"),
    };

    html! {
        <div class={classes!("api-status", class)}>
            <i class={icon}></i>
            <span>{ format!(" {}", status.text()) }</span>
        </div>
    }
}
