use anyhow::Context;
use gui::App;
use iced::widget::{container, text};
use iced::{Application, Command, Element, Length, Settings, Subscription};
use newsly_core::AppConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "NEWSLY_CONFIG";

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("newsly=debug,newsly_client=debug,gui=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting Newsly.AI");

    let config_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())
        .with_context(|| format!("failed to load configuration (set {} to a TOML file)", CONFIG_ENV))?;
    tracing::debug!(
        "Backend at {}, subscriptions at {}",
        config.api_base_url,
        config.subscriptions_base_url
    );

    let settings = Settings {
        window: iced::window::Settings {
            size: iced::Size::new(1200.0, 800.0),
            min_size: Some(iced::Size::new(800.0, 600.0)),
            ..Default::default()
        },
        ..Settings::with_flags(config)
    };

    NewslyApp::run(settings).map_err(|e| {
        tracing::error!("Application error: {}", e);
        anyhow::anyhow!("GUI error: {e}")
    })
}

enum NewslyApp {
    Running(App),
    /// The client could not be built; only the reason is shown.
    Failed(String),
}

impl Application for NewslyApp {
    type Message = gui::Message;
    type Theme = iced::Theme;
    type Executor = iced::executor::Default;
    type Flags = AppConfig;

    fn new(config: Self::Flags) -> (Self, Command<Self::Message>) {
        tracing::info!("Initializing application");
        match App::new(&config) {
            Ok((app, command)) => (NewslyApp::Running(app), command),
            Err(e) => {
                tracing::error!("Failed to start: {}", e);
                (NewslyApp::Failed(e.to_string()), Command::none())
            }
        }
    }

    fn title(&self) -> String {
        match self {
            NewslyApp::Running(app) => app.title(),
            NewslyApp::Failed(_) => gui::APP_TITLE.to_string(),
        }
    }

    fn update(&mut self, message: Self::Message) -> Command<Self::Message> {
        match self {
            NewslyApp::Running(app) => app.update(message),
            NewslyApp::Failed(_) => Command::none(),
        }
    }

    fn view(&self) -> Element<Self::Message> {
        match self {
            NewslyApp::Running(app) => app.view(),
            NewslyApp::Failed(reason) => container(text(format!("Newsly.AI could not start: {reason}")))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x()
                .center_y()
                .into(),
        }
    }

    fn subscription(&self) -> Subscription<Self::Message> {
        match self {
            NewslyApp::Running(app) => app.subscription(),
            NewslyApp::Failed(_) => Subscription::none(),
        }
    }
}
