use crate::report;
use crate::style;
use iced::widget::{button, column, progress_bar, row, scrollable, text, text_input, Column, Space};
use iced::{theme, Alignment, Command, Element, Length};
use newsly_client::ApiClient;
use newsly_core::selection::suggested_name;
use newsly_core::{Candidate, NewsletterSelection, SaveState};

#[derive(Debug, Clone)]
pub enum Message {
    Scan,
    Scanned(Result<Vec<Candidate>, String>),
    Toggle(String),
    Remove(String),
    SelectAll,
    DeselectAll,
    ManualNameChanged(String),
    ManualSenderChanged(String),
    AddManual,
    Save,
    Saved(Result<usize, String>),
}

#[derive(Debug, Default)]
pub struct NewslettersPage {
    selection: NewsletterSelection,
    manual_name: String,
    manual_sender: String,
}

impl NewslettersPage {
    pub fn selection(&self) -> &NewsletterSelection {
        &self.selection
    }

    /// Falls back to a name derived from the sender's domain.
    fn manual_entry(&self) -> (String, String) {
        let sender = self.manual_sender.trim().to_string();
        let name = match self.manual_name.trim() {
            "" if !sender.is_empty() => suggested_name(&sender),
            name => name.to_string(),
        };
        (name, sender)
    }

    pub fn update(&mut self, message: Message, client: &ApiClient) -> Command<Message> {
        match message {
            Message::Scan => {
                if self.selection.begin_scan() {
                    let client = client.clone();
                    return Command::perform(
                        async move { client.scan_newsletters().await.map_err(report) },
                        Message::Scanned,
                    );
                }
            }
            Message::Scanned(result) => self.selection.finish_scan(result),
            Message::Toggle(key) => {
                self.selection.toggle(&key);
            }
            Message::Remove(key) => {
                self.selection.remove(&key);
            }
            Message::SelectAll => self.selection.select_all(),
            Message::DeselectAll => self.selection.deselect_all(),
            Message::ManualNameChanged(name) => self.manual_name = name,
            Message::ManualSenderChanged(sender) => self.manual_sender = sender,
            Message::AddManual => {
                let (name, sender) = self.manual_entry();
                if self.selection.add_manual(&name, &sender) {
                    self.manual_name.clear();
                    self.manual_sender.clear();
                }
            }
            Message::Save => {
                if let Some(selected) = self.selection.begin_save() {
                    let client = client.clone();
                    return Command::perform(
                        async move { client.save_selection(&selected).await.map_err(report) },
                        Message::Saved,
                    );
                }
            }
            Message::Saved(result) => self.selection.finish_save(result),
        }
        Command::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let scanning = self.selection.is_scanning();
        let header = row![
            column![
                text("Your newsletters").size(24),
                style::muted("Pick which senders get AI summaries."),
            ]
            .spacing(4),
            Space::with_width(Length::Fill),
            button(text(if scanning { "Scanning..." } else { "Scan my inbox" }))
                .padding([8, 14])
                .on_press_maybe((!scanning).then_some(Message::Scan)),
        ]
        .align_items(Alignment::Center);

        let summary = column![
            row![
                text(self.selection.selection_label()).size(14),
                Space::with_width(Length::Fill),
                button(text("Select all").size(13))
                    .style(theme::Button::Text)
                    .on_press(Message::SelectAll),
                button(text("Deselect all").size(13))
                    .style(theme::Button::Text)
                    .on_press(Message::DeselectAll),
            ]
            .align_items(Alignment::Center),
            progress_bar(0.0..=1.0, self.selection.progress()).height(6),
        ]
        .spacing(6);

        let mut list = Column::new().spacing(8);
        if self.selection.total() == 0 {
            list = list.push(style::muted(
                "No newsletters yet. Scan your inbox or add one by hand.",
            ));
        }
        for candidate in self.selection.candidates() {
            list = list.push(candidate_row(candidate));
        }

        let (suggestion, _) = self.manual_entry();
        let name_placeholder = if self.manual_sender.trim().is_empty() {
            "Newsletter name".to_string()
        } else {
            suggestion
        };
        let manual = style::card(
            column![
                text("Add a newsletter").size(16),
                row![
                    text_input("sender@example.com", &self.manual_sender)
                        .on_input(Message::ManualSenderChanged)
                        .padding(8),
                    text_input(&name_placeholder, &self.manual_name)
                        .on_input(Message::ManualNameChanged)
                        .on_submit(Message::AddManual)
                        .padding(8),
                    button(text("Add")).on_press(Message::AddManual),
                ]
                .spacing(8)
                .align_items(Alignment::Center),
            ]
            .spacing(8),
        )
        .width(Length::Fill);

        let saving = self.selection.is_saving();
        let mut footer = row![button(text(if saving { "Saving..." } else { "Save selection" }))
            .padding([8, 14])
            .on_press_maybe(self.selection.can_save().then_some(Message::Save))]
        .spacing(12)
        .align_items(Alignment::Center);
        if let Some(message) = self.selection.message() {
            footer = footer.push(match self.selection.save_state() {
                SaveState::Saved { .. } => text(message).style(style::GREEN_700),
                _ => style::error_text(message),
            });
        }

        column![
            header,
            summary,
            scrollable(list).height(Length::Fill),
            manual,
            footer
        ]
        .spacing(16)
        .into()
    }
}

fn candidate_row(candidate: &Candidate) -> Element<'_, Message> {
    let mark = if candidate.selected { "☑" } else { "☐" };
    let mut details = column![
        text(candidate.display_name()).size(16),
        style::muted(&candidate.sender),
    ]
    .spacing(2);
    if candidate.manual {
        details = details.push(style::muted("Added by you"));
    } else {
        details = details.push(style::muted(format!(
            "{} emails in the last 30 days",
            candidate.count_30d
        )));
    }

    let mut line = row![
        button(text(mark).size(18))
            .style(theme::Button::Text)
            .on_press(Message::Toggle(candidate.key().to_string())),
        details,
        Space::with_width(Length::Fill),
    ]
    .spacing(10)
    .align_items(Alignment::Center);

    if candidate.manual {
        line = line.push(
            button(text("Remove").size(13))
                .style(theme::Button::Destructive)
                .on_press(Message::Remove(candidate.key().to_string())),
        );
    }

    style::card(line).width(Length::Fill).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_entry_suggests_name() {
        let mut page = NewslettersPage::default();
        page.manual_sender = " hello@tech-weekly.com ".to_string();
        assert_eq!(
            page.manual_entry(),
            ("Tech Weekly".to_string(), "hello@tech-weekly.com".to_string())
        );

        page.manual_name = "TW".to_string();
        assert_eq!(page.manual_entry().0, "TW");
    }

    #[test]
    fn test_empty_manual_entry_is_rejected() {
        let client = ApiClient::new(&newsly_core::AppConfig::default()).unwrap();
        let mut page = NewslettersPage::default();
        let _ = page.update(Message::AddManual, &client);
        assert_eq!(page.selection().total(), 0);

        let _ = page.update(Message::ManualSenderChanged("news@brew.com".into()), &client);
        let _ = page.update(Message::AddManual, &client);
        assert_eq!(page.selection().total(), 1);
        assert_eq!(page.selection().candidates()[0].name, "Brew");
    }

    #[test]
    fn test_save_without_selection_sends_nothing() {
        let client = ApiClient::new(&newsly_core::AppConfig::default()).unwrap();
        let mut page = NewslettersPage::default();
        let _ = page.update(Message::Save, &client);
        assert!(!page.selection().is_saving());
    }
}
