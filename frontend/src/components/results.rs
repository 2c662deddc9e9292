use super::super::Model;
use shared::RenderedPrediction;
use yew::prelude::*;

pub fn render_results(model: &Model) -> Html {
    let Some(result) = model.state.analysis() else {
        return html! {};
    };

    let raw = serde_json::to_string_pretty(&result.raw).unwrap_or_else(|_| result.raw.to_string());

    html! {
        <div class="results-container">
            <div class="result-header">
                <h2><i class="fa-solid fa-tags"></i>{" Classification Results"}</h2>
                <p class="result-message">{ &result.message }</p>
            </div>
            {
                match result.payload.rendered() {
                    Some(predictions) => html! {
                        <div class="result-bars">
                            { for predictions.iter().map(render_prediction) }
                        </div>
                    },
                    None => html! {
                        <p class="no-results-message">{"Unrecognized response format. See the raw data below."}</p>
                    },
                }
            }
            <details class="raw-analysis">
                <summary>{"Raw Analysis Data"}</summary>
                <pre>{ raw }</pre>
            </details>
        </div>
    }
}

fn render_prediction(prediction: &RenderedPrediction) -> Html {
    html! {
        <div class="result-item">
            <div class="result-label">{ &prediction.label }</div>
            {
                if let Some(confidence) = &prediction.confidence {
                    html! {
                        <>
                            <div class="result-bar-container">
                                <div class="result-bar" style={format!("width: {}%", confidence.bar_width())}></div>
                            </div>
                            <div class="result-value">{ format!("Confidence: {}", confidence.label()) }</div>
                        </>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}
