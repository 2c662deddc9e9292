mod api;
mod components;

use components::api_status::render_api_status;
use components::handlers;
use components::header::render_header;
use components::preview_area::render_preview_area;
use components::results::render_results;
use components::upload_section::render_upload_section;
use components::utils::render_error_message;
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::orchestrator::{self, Event, SelectionId, UiState};
use wasm_bindgen::JsCast;
use web_sys::{AbortController, ClipboardEvent, DragEvent};
use yew::prelude::*;

/// File behind the current selection, kept for the analyze step.
struct SelectedFile {
    id: SelectionId,
    file: GlooFile,
}

/// Abort handle for the call currently running for a selection.
struct InFlight {
    id: SelectionId,
    controller: AbortController,
}

enum Msg {
    // Input events
    FileChosen(GlooFile),
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
    SetDragging(bool),
    SetNotice(Option<String>),

    // Orchestrator events
    Orchestrator(Event),
}

struct Model {
    state: UiState,
    selected: Option<SelectedFile>,
    preview_url: Option<ObjectUrl>,
    in_flight: Option<InFlight>,
    notice: Option<String>,
    is_dragging: bool,
    paste_listener: Option<EventListener>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let (state, effects) = orchestrator::init();
        let mut model = Self {
            state,
            selected: None,
            preview_url: None,
            in_flight: None,
            notice: None,
            is_dragging: false,
            paste_listener: None,
        };

        if let Some(window) = web_sys::window() {
            let link = ctx.link().clone();
            let listener = EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            });
            model.paste_listener = Some(listener);
        }

        handlers::run_effects(&mut model, ctx, effects);
        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileChosen(file) => handlers::handle_file_chosen(self, ctx, file),
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(self, ctx, event),
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::SetNotice(notice) => {
                self.notice = notice;
                true
            }
            Msg::Orchestrator(event) => handlers::handle_event(self, ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header() }

                <main class="main-content">
                    { render_api_status(&self.state.connection) }
                    { render_upload_section(self, ctx) }
                    { render_preview_area(self) }
                    { render_results(self) }
                    { render_error_message(self) }
                </main>
            </div>
        }
    }

    fn destroy(&mut self, ctx: &Context<Self>) {
        handlers::handle_teardown(self, ctx);
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
