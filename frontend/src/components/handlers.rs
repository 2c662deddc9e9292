use super::super::{InFlight, Model, Msg, SelectedFile};
use super::utils::{chosen_file_message, first_image_file};
use crate::api;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::orchestrator::{self, Effect, Event, SelectionId};
use wasm_bindgen_futures::spawn_local;
use web_sys::{AbortController, AbortSignal, ClipboardEvent, DragEvent};
use yew::prelude::*;

pub fn handle_file_chosen(model: &mut Model, ctx: &Context<Model>, file: GlooFile) -> bool {
    model.notice = None;
    let effects = apply(model, Event::FileSelected);

    if let Some(id) = model.state.selection {
        log::info!("Selected {} ({} bytes) as {}", file.name(), file.size(), id);
        model.preview_url = Some(ObjectUrl::from(file.clone()));
        model.selected = Some(SelectedFile { id, file });
    }

    run_effects(model, ctx, effects);
    true
}

pub fn handle_event(model: &mut Model, ctx: &Context<Model>, event: Event) -> bool {
    let effects = apply(model, event);
    if !model.state.loading() {
        model.in_flight = None;
    }
    run_effects(model, ctx, effects);
    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    let files = event.data_transfer().and_then(|data_transfer| data_transfer.files());
    ctx.link().send_message(chosen_file_message(files.as_ref()));

    true
}

pub fn handle_paste(_model: &mut Model, ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    let file = event
        .clipboard_data()
        .and_then(|data_transfer| data_transfer.files())
        .as_ref()
        .and_then(first_image_file);

    // Plain text pastes fall through to the page.
    if let Some(file) = file {
        event.prevent_default();
        ctx.link().send_message(Msg::FileChosen(file));
    }
    false
}

pub fn handle_teardown(model: &mut Model, ctx: &Context<Model>) {
    let effects = apply(model, Event::TornDown);
    run_effects(model, ctx, effects);
    model.preview_url = None;
    model.selected = None;
}

pub fn run_effects(model: &mut Model, ctx: &Context<Model>, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::CheckConnection => send_connection_check(ctx),
            Effect::UploadTest(id) => {
                if let Some(file) = file_for(model, id) {
                    let signal = begin_call(model, id);
                    send_upload_test(ctx, id, file, signal);
                }
            }
            Effect::Analyze(id) => {
                let follow_up = apply(model, Event::AnalyzeDispatched(id));
                if let Some(file) = file_for(model, id) {
                    let signal = begin_call(model, id);
                    send_analysis_request(ctx, id, file, signal);
                }
                run_effects(model, ctx, follow_up);
            }
            Effect::CancelInFlight(id) => cancel(model, id),
        }
    }
}

fn apply(model: &mut Model, event: Event) -> Vec<Effect> {
    let state = std::mem::take(&mut model.state);
    let (state, effects) = orchestrator::transition(state, event);
    log::debug!("Orchestrator phase: {}", state.phase_name());
    model.state = state;
    effects
}

fn file_for(model: &Model, id: SelectionId) -> Option<GlooFile> {
    model
        .selected
        .as_ref()
        .filter(|selected| selected.id == id)
        .map(|selected| selected.file.clone())
}

fn begin_call(model: &mut Model, id: SelectionId) -> Option<AbortSignal> {
    // Without a controller the call still runs; its reply is dropped by id.
    let controller = match AbortController::new() {
        Ok(controller) => controller,
        Err(e) => {
            log::warn!("AbortController unavailable: {:?}", e);
            return None;
        }
    };
    let signal = controller.signal();
    model.in_flight = Some(InFlight { id, controller });
    Some(signal)
}

fn cancel(model: &mut Model, id: SelectionId) {
    if model.in_flight.as_ref().is_some_and(|in_flight| in_flight.id == id) {
        if let Some(in_flight) = model.in_flight.take() {
            log::info!("Cancelling request for {}", id);
            in_flight.controller.abort();
        }
    }
}

fn send_connection_check(ctx: &Context<Model>) {
    let link = ctx.link().clone();
    spawn_local(async move {
        let result = api::check_connection().await;
        link.send_message(Msg::Orchestrator(Event::ConnectionChecked(result)));
    });
}

fn send_upload_test(
    ctx: &Context<Model>,
    id: SelectionId,
    file: GlooFile,
    signal: Option<AbortSignal>,
) {
    let link = ctx.link().clone();
    spawn_local(async move {
        let result = api::test_upload(&file, signal.as_ref()).await;
        link.send_message(Msg::Orchestrator(Event::UploadTestDone(id, result)));
    });
}

fn send_analysis_request(
    ctx: &Context<Model>,
    id: SelectionId,
    file: GlooFile,
    signal: Option<AbortSignal>,
) {
    let link = ctx.link().clone();
    spawn_local(async move {
        let result = api::analyze_image(&file, signal.as_ref()).await;
        link.send_message(Msg::Orchestrator(Event::AnalyzeDone(id, result)));
    });
}
