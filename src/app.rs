use iced::Task;
use tracing::debug;

use crate::api::ApiClient;
use crate::application::DownloadCoordinator;
use crate::domain::{AppError, DownloadCompletion, FormState, MetadataTicket, TitleResult};
use crate::settings::AppConfig;
use crate::ui::{self, FormMessage};

pub struct DownloadApp {
    form: FormState,
    coordinator: DownloadCoordinator,
}

impl DownloadApp {
    pub fn new(config: &AppConfig) -> Self {
        let api_client = ApiClient::new(config.api_config());
        let coordinator = DownloadCoordinator::new(api_client, config.save_target());

        Self {
            form: FormState::default(),
            coordinator,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Form(FormMessage),
    /// (Ticket sequence, titles)
    MetadataArrived(u64, TitleResult),
    DownloadFinished(Result<DownloadCompletion, AppError>),
}

fn lookup_titles(app: &DownloadApp, ticket: Option<MetadataTicket>) -> Task<Message> {
    let Some(MetadataTicket { seq, url }) = ticket else {
        return Task::none();
    };

    debug!(seq, %url, "Looking up titles");
    let coordinator = app.coordinator.clone();
    Task::perform(
        async move { coordinator.fetch_titles(url).await },
        move |titles| Message::MetadataArrived(seq, titles),
    )
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::Form(FormMessage::UrlChanged(url)) => {
            let ticket = app.form.set_url(url);
            return lookup_titles(app, ticket);
        }
        Message::Form(FormMessage::ModeSelected(mode)) => {
            let ticket = app.form.set_mode(mode);
            return lookup_titles(app, ticket);
        }
        Message::Form(FormMessage::FolderChanged(folder_name)) => {
            app.form.set_folder_name(folder_name);
        }
        Message::Form(FormMessage::DownloadPressed) => {
            if let Some(request) = app.form.begin_download() {
                let coordinator = app.coordinator.clone();
                return Task::perform(
                    async move { coordinator.download(request).await },
                    Message::DownloadFinished,
                );
            }
        }
        Message::MetadataArrived(seq, titles) => {
            app.form.apply_metadata(seq, titles);
        }
        Message::DownloadFinished(result) => {
            app.form.finish_download(result);
        }
    }
    Task::none()
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    ui::view(&app.form).map(Message::Form)
}
