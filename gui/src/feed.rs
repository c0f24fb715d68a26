use crate::report;
use crate::style;
use chrono::Local;
use iced::widget::{button, column, row, scrollable, text, text_input, Column, Space};
use iced::{theme, Alignment, Command, Element, Length};
use newsly_client::{ApiClient, FeedLoader, LoadGuard};
use newsly_core::{
    format_long_summary, BadgePalette, CalendarDay, CategoryFilter, FeaturedItem, FeedState,
    FeedStatus, LoadOutcome, SummaryBlock, SummaryBody,
};
use std::time::Duration;

/// How long the "subscribed" confirmation stays up before the panel closes.
pub const SUBSCRIBE_RESET_DELAY: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(LoadOutcome),
    Reload,
    FilterSelected(CategoryFilter),
    ToggleFilters,
    Open(FeaturedItem),
    Close,
    Subscribe(SubscribeMessage),
}

#[derive(Debug, Clone)]
pub enum SubscribeMessage {
    Toggle,
    EmailChanged(String),
    Submit,
    Finished(Result<(), String>),
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubscribeStatus {
    Idle,
    Sending,
    Subscribed,
    Failed(String),
}

/// The digest signup box on the feed page.
#[derive(Debug, Clone)]
pub struct SubscribePanel {
    open: bool,
    email: String,
    status: SubscribeStatus,
}

impl Default for SubscribePanel {
    fn default() -> Self {
        Self {
            open: false,
            email: String::new(),
            status: SubscribeStatus::Idle,
        }
    }
}

impl SubscribePanel {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn status(&self) -> &SubscribeStatus {
        &self.status
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn set_email(&mut self, email: String) {
        self.email = email;
    }

    /// Email to send, or `None` when empty or a request is outstanding.
    pub fn submit(&mut self) -> Option<String> {
        let email = self.email.trim();
        if email.is_empty() || self.status == SubscribeStatus::Sending {
            return None;
        }
        self.status = SubscribeStatus::Sending;
        Some(email.to_string())
    }

    /// Returns true when the caller should schedule the reset.
    pub fn finish(&mut self, result: Result<(), String>) -> bool {
        match result {
            Ok(()) => {
                self.status = SubscribeStatus::Subscribed;
                self.email.clear();
                true
            }
            Err(message) => {
                self.status = SubscribeStatus::Failed(message);
                false
            }
        }
    }

    pub fn reset(&mut self) {
        if self.status == SubscribeStatus::Subscribed {
            self.status = SubscribeStatus::Idle;
            self.open = false;
        }
    }

    fn update(&mut self, message: SubscribeMessage, client: &ApiClient) -> Command<SubscribeMessage> {
        match message {
            SubscribeMessage::Toggle => self.toggle(),
            SubscribeMessage::EmailChanged(email) => self.set_email(email),
            SubscribeMessage::Submit => {
                if let Some(email) = self.submit() {
                    let client = client.clone();
                    return Command::perform(
                        async move { client.subscribe(&email).await.map_err(report) },
                        SubscribeMessage::Finished,
                    );
                }
            }
            SubscribeMessage::Finished(result) => {
                if self.finish(result) {
                    return Command::perform(tokio::time::sleep(SUBSCRIBE_RESET_DELAY), |_| {
                        SubscribeMessage::Reset
                    });
                }
            }
            SubscribeMessage::Reset => self.reset(),
        }
        Command::none()
    }

    fn view(&self) -> Element<'_, SubscribeMessage> {
        if !self.open {
            return Space::with_height(Length::Fixed(0.0)).into();
        }

        let body: Element<'_, SubscribeMessage> = match &self.status {
            SubscribeStatus::Subscribed => text("You're subscribed! Check your inbox tonight.")
                .style(style::GREEN_700)
                .into(),
            status => {
                let sending = *status == SubscribeStatus::Sending;
                let mut content = column![
                    text("Get the daily digest").size(18),
                    style::muted("A summary of your newsletters every evening."),
                    row![
                        text_input("you@example.com", &self.email)
                            .on_input(SubscribeMessage::EmailChanged)
                            .on_submit(SubscribeMessage::Submit)
                            .padding(8),
                        button(text(if sending { "Subscribing..." } else { "Subscribe" }))
                            .on_press_maybe((!sending).then_some(SubscribeMessage::Submit)),
                    ]
                    .spacing(8)
                    .align_items(Alignment::Center),
                ]
                .spacing(8);
                if let SubscribeStatus::Failed(message) = status {
                    content = content.push(style::error_text(format!(
                        "Subscription failed: {}",
                        message
                    )));
                }
                content.into()
            }
        };

        style::card(body).width(Length::Fill).into()
    }
}

/// Main feed page. Dropping it aborts a fetch still in flight.
pub struct FeedPage {
    state: FeedState,
    guard: Option<LoadGuard>,
    subscribe: SubscribePanel,
}

impl FeedPage {
    pub fn new(loader: &FeedLoader) -> (Self, Command<Message>) {
        let mut page = Self {
            state: FeedState::new(),
            guard: None,
            subscribe: SubscribePanel::default(),
        };
        let command = page.load(loader);
        (page, command)
    }

    fn load(&mut self, loader: &FeedLoader) -> Command<Message> {
        self.state.begin_load();
        let (guard, fetch) = loader.start();
        // Replacing the guard aborts the previous fetch.
        self.guard = Some(guard);
        Command::perform(fetch, |result| Message::Loaded(LoadOutcome::from_result(result)))
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn fetch_in_flight(&self) -> bool {
        self.state.is_loading() && self.guard.as_ref().is_some_and(|guard| !guard.is_cancelled())
    }

    pub fn update(
        &mut self,
        message: Message,
        client: &ApiClient,
        loader: &FeedLoader,
    ) -> Command<Message> {
        match message {
            Message::Loaded(outcome) => {
                self.state.finish_load(outcome);
            }
            Message::Reload => return self.load(loader),
            Message::FilterSelected(filter) => self.state.select(filter),
            Message::ToggleFilters => self.state.toggle_filters(),
            Message::Open(item) => self.state.open(item),
            Message::Close => self.state.close(),
            Message::Subscribe(message) => {
                return self.subscribe.update(message, client).map(Message::Subscribe)
            }
        }
        Command::none()
    }

    pub fn view<'a>(&'a self, palette: &BadgePalette) -> Element<'a, Message> {
        let day = CalendarDay::local_now();

        let toolbar = row![
            text("Featured").size(24),
            Space::with_width(Length::Fill),
            button(text("Daily digest"))
                .style(theme::Button::Secondary)
                .on_press(Message::Subscribe(SubscribeMessage::Toggle)),
            button(text(if self.state.show_filters() { "Hide filters" } else { "Filters" }))
                .style(theme::Button::Secondary)
                .on_press(Message::ToggleFilters),
            button(text("Refresh"))
                .style(theme::Button::Secondary)
                .on_press_maybe((!self.fetch_in_flight()).then_some(Message::Reload)),
        ]
        .spacing(8)
        .align_items(Alignment::Center);

        let mut page = column![toolbar, self.subscribe.view().map(Message::Subscribe)].spacing(16);

        if self.state.show_filters() {
            page = page.push(self.filter_chips());
        }

        let body: Element<'a, Message> = match (self.state.open_item(), self.state.status()) {
            (Some(item), _) => detail_view(item, palette, &day),
            (None, FeedStatus::Loading) if self.state.items().is_empty() => {
                style::muted("Loading your newsletters...").into()
            }
            (None, FeedStatus::Failed(message)) => style::error_text(message).into(),
            (None, _) => self.sections_view(palette, &day),
        };

        page.push(scrollable(body).height(Length::Fill)).into()
    }

    fn filter_chips(&self) -> Element<'_, Message> {
        let chips = self.state.available_filters().into_iter().map(|filter| {
            let style = if &filter == self.state.selected() {
                theme::Button::Primary
            } else {
                theme::Button::Secondary
            };
            Element::from(
                button(text(filter.label().to_string()).size(13))
                    .style(style)
                    .on_press(Message::FilterSelected(filter)),
            )
        });
        iced::widget::Row::with_children(chips).spacing(6).into()
    }

    fn sections_view<'a>(&'a self, palette: &BadgePalette, day: &CalendarDay<Local>) -> Element<'a, Message> {
        let sections = self.state.sections(day);
        if sections.is_empty() {
            return style::muted("No newsletters to show yet.").into();
        }

        let mut content = Column::new().spacing(12);
        for (heading, items) in [("Today", &sections.today), ("Earlier", &sections.earlier)] {
            if items.is_empty() {
                continue;
            }
            content = content.push(text(heading).size(18));
            for item in items.iter().copied() {
                content = content.push(card_view(item, palette, day));
            }
        }
        content.into()
    }
}

fn meta_line<'a>(item: &FeaturedItem, day: &CalendarDay<Local>) -> Element<'a, Message> {
    let mut parts = vec![item.sender.clone(), item.read_time_label()];
    if let Some(label) = item.date.as_deref().and_then(|raw| day.date_label(raw)) {
        parts.push(label);
    }
    style::muted(parts.join(" · ")).into()
}

fn card_view<'a>(
    item: &'a FeaturedItem,
    palette: &BadgePalette,
    day: &CalendarDay<Local>,
) -> Element<'a, Message> {
    let mut content = column![
        row![
            style::badge(&item.topic, palette.classify(Some(item.topic.as_str()))),
            Space::with_width(Length::Fill),
            style::muted(item.category_or_default()),
        ]
        .align_items(Alignment::Center),
        text(&item.title).size(18),
        meta_line(item, day),
    ]
    .spacing(8);

    if !item.description.is_empty() {
        content = content.push(text(&item.description).size(14));
    }

    let (shown, hidden) = item.highlight_preview();
    for highlight in shown {
        content = content.push(text(format!("• {}", highlight)).size(13));
    }
    if hidden > 0 {
        content = content.push(style::muted(format!("+{} more", hidden)));
    }

    content = content.push(
        button(text("Read summary").size(13))
            .style(theme::Button::Text)
            .on_press(Message::Open(item.clone())),
    );

    style::card(content).width(Length::Fill).into()
}

fn detail_view<'a>(
    item: &'a FeaturedItem,
    palette: &BadgePalette,
    day: &CalendarDay<Local>,
) -> Element<'a, Message> {
    let mut content = column![
        button(text("← Back")).style(theme::Button::Text).on_press(Message::Close),
        style::badge(&item.topic, palette.classify(Some(item.topic.as_str()))),
        text(&item.title).size(26),
        meta_line(item, day),
    ]
    .spacing(10);

    content = match item.summary_body() {
        SummaryBody::Long(long) => {
            format_long_summary(long)
                .into_iter()
                .fold(content, |content, block| match block {
                    SummaryBlock::Lead(sentence) => content.push(text(sentence).size(17)),
                    SummaryBlock::Paragraph(sentence) => content.push(text(sentence).size(15)),
                    SummaryBlock::Bullet(point) => content.push(text(format!("• {}", point)).size(15)),
                })
        }
        SummaryBody::Points(points) => points
            .iter()
            .fold(content, |content, point| content.push(text(format!("• {}", point)).size(15))),
        SummaryBody::Description(description) => content.push(text(description).size(15)),
    };

    if let Some(highlights) = item.highlights.as_deref().filter(|h| !h.is_empty()) {
        content = content.push(text("Highlights").size(16));
        for highlight in highlights {
            content = content.push(text(format!("• {}", highlight)).size(14));
        }
    }

    style::card(content).width(Length::Fill).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_email_is_not_sent() {
        let mut panel = SubscribePanel::default();
        panel.toggle();
        panel.set_email("   ".to_string());
        assert_eq!(panel.submit(), None);
        assert_eq!(panel.status(), &SubscribeStatus::Idle);
    }

    #[test]
    fn test_one_request_at_a_time() {
        let mut panel = SubscribePanel::default();
        panel.set_email(" me@example.com ".to_string());
        assert_eq!(panel.submit().as_deref(), Some("me@example.com"));
        assert_eq!(panel.submit(), None);
    }

    #[test]
    fn test_success_then_reset_closes_panel() {
        let mut panel = SubscribePanel::default();
        panel.toggle();
        panel.set_email("me@example.com".to_string());
        panel.submit();
        assert!(panel.finish(Ok(())));
        assert_eq!(panel.status(), &SubscribeStatus::Subscribed);
        assert!(panel.is_open());

        panel.reset();
        assert_eq!(panel.status(), &SubscribeStatus::Idle);
        assert!(!panel.is_open());
    }

    #[test]
    fn test_failure_keeps_panel_open() {
        let mut panel = SubscribePanel::default();
        panel.toggle();
        panel.set_email("me@example.com".to_string());
        panel.submit();
        assert!(!panel.finish(Err("500 Internal Server Error".to_string())));
        panel.reset();
        assert!(panel.is_open());
        assert!(matches!(panel.status(), SubscribeStatus::Failed(_)));
        assert!(panel.submit().is_some());
    }
}
