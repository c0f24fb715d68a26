mod auth;
mod feed;
mod menu;
mod newsletters;
mod style;
mod summarize;

pub use menu::{DropdownMenu, MenuMessage};

use auth::{LoginForm, LoginMessage, SignupForm, SignupMessage};
use feed::FeedPage;
use iced::widget::{button, column, container, row, text, Column, Space};
use iced::{theme, Alignment, Command, Element, Length, Subscription, Theme};
use newsletters::NewslettersPage;
use newsly_client::{ApiClient, FeedLoader};
use newsly_core::{AppConfig, BadgePalette, CoreError, ErrorReporter};
use summarize::SummarizePage;
use tracing::{debug, info};

pub const APP_TITLE: &str = "Newsly.AI";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Feed,
    Newsletters,
    Summarize,
}

/// What a page asks the shell to do after handling a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    None,
    Navigate(Route),
    SignedIn(String),
}

#[derive(Debug, Clone)]
pub enum Message {
    Navigate(Route),
    Menu(MenuMessage),
    Login(LoginMessage),
    Signup(SignupMessage),
    Feed(feed::Message),
    Newsletters(newsletters::Message),
    Summarize(summarize::Message),
}

/// Logs a failed action and turns it into the text shown to the user.
pub(crate) fn report(error: CoreError) -> String {
    ErrorReporter::new().report_error(&error)
}

enum Page {
    Login(LoginForm),
    Signup(SignupForm),
    Feed(FeedPage),
    Newsletters(NewslettersPage),
    Summarize(SummarizePage),
}

impl Page {
    fn route(&self) -> Route {
        match self {
            Page::Login(_) => Route::Login,
            Page::Signup(_) => Route::Signup,
            Page::Feed(_) => Route::Feed,
            Page::Newsletters(_) => Route::Newsletters,
            Page::Summarize(_) => Route::Summarize,
        }
    }
}

pub struct App {
    client: ApiClient,
    loader: FeedLoader,
    palette: BadgePalette,
    session: Option<String>,
    menu: DropdownMenu,
    page: Page,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<(Self, Command<Message>), CoreError> {
        let client = ApiClient::new(config)?;
        let loader = FeedLoader::new(client.clone());
        let (feed, command) = FeedPage::new(&loader);

        let app = Self {
            client,
            loader,
            palette: BadgePalette::default(),
            session: None,
            menu: DropdownMenu::default(),
            page: Page::Feed(feed),
        };
        Ok((app, command.map(Message::Feed)))
    }

    pub fn title(&self) -> String {
        let page = match self.page.route() {
            Route::Login => "Sign in",
            Route::Signup => "Sign up",
            Route::Feed => "Featured",
            Route::Newsletters => "Newsletters",
            Route::Summarize => "Summarize",
        };
        format!("{} - {}", APP_TITLE, page)
    }

    pub fn route(&self) -> Route {
        self.page.route()
    }

    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn menu(&self) -> &DropdownMenu {
        &self.menu
    }

    /// Replaces the current page. Leaving the feed drops its load guard,
    /// which aborts a fetch still in flight.
    fn navigate(&mut self, route: Route) -> Command<Message> {
        self.menu.close();
        if route == self.page.route() {
            return Command::none();
        }
        info!("Navigating to {:?}", route);
        let (page, command) = match route {
            Route::Login => (Page::Login(LoginForm::default()), Command::none()),
            Route::Signup => (Page::Signup(SignupForm::default()), Command::none()),
            Route::Feed => {
                let (feed, command) = FeedPage::new(&self.loader);
                (Page::Feed(feed), command.map(Message::Feed))
            }
            Route::Newsletters => (Page::Newsletters(NewslettersPage::default()), Command::none()),
            Route::Summarize => (Page::Summarize(SummarizePage::default()), Command::none()),
        };
        self.page = page;
        command
    }

    fn apply(&mut self, outcome: Outcome) -> Command<Message> {
        match outcome {
            Outcome::None => Command::none(),
            Outcome::Navigate(route) => self.navigate(route),
            Outcome::SignedIn(email) => {
                self.session = Some(email);
                self.navigate(Route::Feed)
            }
        }
    }

    fn on_menu(&mut self, message: MenuMessage) -> Command<Message> {
        match message {
            MenuMessage::Toggle => self.menu.toggle(),
            MenuMessage::Dismiss => self.menu.close(),
            MenuMessage::Go(route) => return self.navigate(route),
            MenuMessage::Logout => {
                info!("Signing out {}", self.session.as_deref().unwrap_or("guest"));
                self.session = None;
                let client = self.client.clone();
                let summary = Command::perform(
                    async move {
                        let metrics = client.get_metrics().await;
                        info!(
                            "Session made {} request(s), {} failed",
                            metrics.total_requests, metrics.failed_requests
                        );
                        client.reset_metrics().await;
                    },
                    |()| Message::Menu(MenuMessage::Dismiss),
                );
                return Command::batch([self.navigate(Route::Login), summary]);
            }
        }
        Command::none()
    }

    pub fn update(&mut self, message: Message) -> Command<Message> {
        let message = match message {
            Message::Menu(message) => return self.on_menu(message),
            Message::Navigate(route) => return self.navigate(route),
            other => other,
        };
        // Any page action dismisses the dropdown.
        self.menu.close();

        let client = &self.client;
        let loader = &self.loader;
        let (command, outcome) = match (message, &mut self.page) {
            (Message::Login(message), Page::Login(form)) => {
                let (command, outcome) = form.update(message, client);
                (command.map(Message::Login), outcome)
            }
            (Message::Signup(message), Page::Signup(form)) => {
                let (command, outcome) = form.update(message, client);
                (command.map(Message::Signup), outcome)
            }
            (Message::Feed(message), Page::Feed(feed)) => (
                feed.update(message, client, loader).map(Message::Feed),
                Outcome::None,
            ),
            (Message::Newsletters(message), Page::Newsletters(page)) => (
                page.update(message, client).map(Message::Newsletters),
                Outcome::None,
            ),
            (Message::Summarize(message), Page::Summarize(page)) => (
                page.update(message, client).map(Message::Summarize),
                Outcome::None,
            ),
            (message, page) => {
                debug!("Dropping {:?} for inactive page {:?}", message, page.route());
                (Command::none(), Outcome::None)
            }
        };

        match outcome {
            Outcome::None => command,
            outcome => Command::batch([command, self.apply(outcome)]),
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        self.menu.subscription().map(Message::Menu)
    }

    pub fn view(&self) -> Element<'_, Message, Theme> {
        let body: Element<'_, Message, Theme> = match &self.page {
            Page::Login(form) => return form.view().map(Message::Login),
            Page::Signup(form) => return form.view().map(Message::Signup),
            Page::Feed(feed) => feed.view(&self.palette).map(Message::Feed),
            Page::Newsletters(page) => page.view().map(Message::Newsletters),
            Page::Summarize(page) => page.view().map(Message::Summarize),
        };

        let main_content: Element<'_, Message, Theme> =
            column![self.header(), container(body).padding([0, 20])]
                .spacing(20)
                .into();

        container(main_content)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(20)
            .into()
    }

    fn header(&self) -> Element<'_, Message, Theme> {
        let current = self.page.route();
        let nav = |label: &'static str, route: Route| {
            let style = if current == route {
                theme::Button::Primary
            } else {
                theme::Button::Text
            };
            button(text(label)).style(style).on_press(Message::Navigate(route))
        };

        let account = self.session.as_deref().unwrap_or("Guest");
        let bar = row![
            auth::brand(),
            Space::with_width(Length::Fill),
            nav("Featured", Route::Feed),
            nav("Get Email Scan", Route::Newsletters),
            nav("Summarize", Route::Summarize),
            button(text(format!("{} ▾", account)))
                .style(theme::Button::Secondary)
                .on_press(Message::Menu(MenuMessage::Toggle)),
        ]
        .spacing(8)
        .align_items(Alignment::Center);

        let mut header = Column::new().push(bar).spacing(6);
        if self.menu.is_open() {
            header = header.push(self.dropdown());
        }
        header.into()
    }

    fn dropdown(&self) -> Element<'_, Message, Theme> {
        let item = |label: &'static str, message: MenuMessage| {
            button(text(label).size(14))
                .style(theme::Button::Text)
                .width(Length::Fill)
                .on_press(Message::Menu(message))
        };

        let mut entries = Column::new().spacing(2).width(Length::Fixed(200.0));
        entries = entries
            .push(item("My newsletters", MenuMessage::Go(Route::Newsletters)))
            .push(item("Summarize tools", MenuMessage::Go(Route::Summarize)));
        entries = if self.session.is_some() {
            entries.push(item("Log out", MenuMessage::Logout))
        } else {
            entries
                .push(item("Sign in", MenuMessage::Go(Route::Login)))
                .push(item("Create account", MenuMessage::Go(Route::Signup)))
        };

        row![Space::with_width(Length::Fill), style::card(entries)].into()
    }
}
