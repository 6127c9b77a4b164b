use iced::{
    widget::{button, column, radio, row, text, text_input, Column, Space},
    Element, Length,
};

use crate::domain::{DownloadMode, FormState, Outcome, TitleResult};

#[derive(Debug, Clone)]
pub enum FormMessage {
    UrlChanged(String),
    ModeSelected(DownloadMode),
    FolderChanged(String),
    DownloadPressed,
}

pub fn view(form: &FormState) -> Element<'_, FormMessage> {
    let modes = DownloadMode::ALL.iter().fold(row![].spacing(20), |row, mode| {
        row.push(radio(
            mode.to_string(),
            *mode,
            Some(form.mode()),
            FormMessage::ModeSelected,
        ))
    });

    let mut content = column![
        text("Download from YouTube").size(32),
        Space::new().height(Length::Fixed(20.0)),
        text("Video or playlist URL").size(16),
        text_input("https://www.youtube.com/...", form.url())
            .on_input(FormMessage::UrlChanged)
            .padding(10),
        text("Download type").size(16),
        modes,
    ]
    .padding(20)
    .spacing(10);

    if form.mode() == DownloadMode::Collection {
        content = content.push(text("Folder name (optional)").size(16)).push(
            text_input("e.g. my-songs", form.folder_name())
                .on_input(FormMessage::FolderChanged)
                .padding(10),
        );
    }

    if form.is_validating() {
        content = content.push(text("Validating link...").size(14));
    }

    if let Some(titles) = detected_titles(form.title(), form.mode()) {
        content = content.push(titles);
    }

    let label = if form.is_downloading() {
        "Downloading..."
    } else {
        "Start download"
    };

    content = content
        .push(Space::new().height(Length::Fixed(10.0)))
        .push(
            button(label)
                .on_press_maybe(form.can_submit().then_some(FormMessage::DownloadPressed))
                .padding([10, 20]),
        );

    match form.outcome() {
        Outcome::None => {}
        Outcome::Success(message) => content = content.push(text(message).size(14).style(text::success)),
        Outcome::Error(message) => content = content.push(text(message).size(14).style(text::danger)),
    }

    content.into()
}

fn detected_titles(title: &TitleResult, mode: DownloadMode) -> Option<Element<'_, FormMessage>> {
    match mode {
        DownloadMode::Single => title
            .single()
            .map(|title| text(format!("Detected title: {}", title)).size(14).into()),
        DownloadMode::Collection => title.many().map(|titles| {
            titles
                .iter()
                .fold(
                    Column::new().spacing(4).push(text("Detected titles:").size(14)),
                    |list, track| list.push(text(format!("  • {}", track)).size(14)),
                )
                .into()
        }),
    }
}
