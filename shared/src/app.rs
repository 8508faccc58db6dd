use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::capabilities::{decode_delete, decode_page, delete_url, from_transport, list_url, Capabilities};
use crate::config::ApiConfig;
use crate::event::Event;
use crate::model::Model;
use crate::saved_reports::Command;
use crate::view::ViewModel;
use crate::PAGE_SIZE;

#[derive(Default)]
pub struct App;

impl App {
    /// Runs controller commands until none are left. Commands that fail
    /// before reaching the shell are fed straight back to the controller.
    fn execute(commands: Vec<Command>, api: &ApiConfig, model: &mut Model, caps: &Capabilities) {
        let mut queue: VecDeque<Command> = commands.into();

        while let Some(command) = queue.pop_front() {
            match command {
                Command::List { ticket, offset, limit } => {
                    caps.http
                        .get(list_url(api, offset, limit))
                        .send(move |result| Event::ReportsFetched {
                            ticket,
                            outcome: from_transport(result).and_then(decode_page),
                        });
                }
                Command::Delete { id } => match delete_url(api, &id) {
                    Ok(url) => {
                        caps.http.delete(url).send(move |result| Event::DeleteFinished {
                            id: id.clone(),
                            outcome: from_transport(result).and_then(|raw| decode_delete(&raw)),
                        });
                    }
                    Err(error) => {
                        warn!(report_id = %id, %error, "could not build delete request");
                        queue.extend(model.saved.delete_finished(&id, Err(error)));
                    }
                },
                Command::OpenReport { id } => caps.navigator.open_report(id),
            }
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(event = event.name(), user = event.is_user_initiated(), "update");

        let api = match (&event, &model.api) {
            (Event::Mounted { api }, _) | (_, Some(api)) => api.clone(),
            (_, None) => {
                warn!(event = event.name(), "event before mount ignored");
                return;
            }
        };

        let commands = match event {
            Event::Mounted { api } => {
                model.api = Some(api);
                model.saved.reset();
                model.saved.load(0, PAGE_SIZE, false)
            }
            Event::Unmounted => {
                model.saved.reset();
                model.api = None;
                Vec::new()
            }
            Event::Refresh => model.saved.refresh(),
            Event::Retry => model.saved.load(0, PAGE_SIZE, false),
            Event::LoadMore => model.saved.load_more(),
            Event::DeleteRequested { id } => {
                model.saved.request_delete(id);
                Vec::new()
            }
            Event::DeleteConfirmed => model.saved.confirm_pending(),
            Event::DeleteCancelled => {
                model.saved.cancel_delete();
                Vec::new()
            }
            Event::AlertDismissed => {
                model.saved.dismiss_alert();
                Vec::new()
            }
            Event::ReportOpened { id } => model.saved.open_report(id),
            Event::ReportsFetched { ticket, outcome } => {
                model.saved.page_fetched(ticket, outcome);
                Vec::new()
            }
            Event::DeleteFinished { id, outcome } => model.saved.delete_finished(&id, outcome),
        };

        Self::execute(commands, &api, model, caps);
        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::from_model(model)
    }
}
