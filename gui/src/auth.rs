use crate::style;
use crate::{report, Outcome, Route};
use iced::widget::{button, column, container, row, text, text_input};
use iced::{Alignment, Command, Element, Length};
use newsly_client::ApiClient;
use tracing::info;

#[derive(Debug, Clone)]
pub enum LoginMessage {
    EmailChanged(String),
    PasswordChanged(String),
    TogglePassword,
    Submit,
    Finished(Result<String, String>),
    GoToSignup,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    email: String,
    password: String,
    show_password: bool,
    submitting: bool,
    message: Option<String>,
}

impl LoginForm {
    pub fn update(&mut self, message: LoginMessage, client: &ApiClient) -> (Command<LoginMessage>, Outcome) {
        match message {
            LoginMessage::EmailChanged(email) => self.email = email,
            LoginMessage::PasswordChanged(password) => self.password = password,
            LoginMessage::TogglePassword => self.show_password = !self.show_password,
            LoginMessage::Submit => {
                if self.submitting {
                    return (Command::none(), Outcome::None);
                }
                self.submitting = true;
                self.message = None;
                let client = client.clone();
                let email = self.email.trim().to_string();
                let password = self.password.clone();
                return (
                    Command::perform(
                        async move {
                            client
                                .login(&email, &password)
                                .await
                                .map(|_| email)
                                .map_err(report)
                        },
                        LoginMessage::Finished,
                    ),
                    Outcome::None,
                );
            }
            LoginMessage::Finished(result) => {
                self.submitting = false;
                match result {
                    Ok(email) => {
                        info!("Login successful");
                        self.password.clear();
                        return (Command::none(), Outcome::SignedIn(email));
                    }
                    Err(message) => self.message = Some(message),
                }
            }
            LoginMessage::GoToSignup => return (Command::none(), Outcome::Navigate(Route::Signup)),
        }
        (Command::none(), Outcome::None)
    }

    pub fn view(&self) -> Element<'_, LoginMessage> {
        let submit = button(text(if self.submitting { "Signing in..." } else { "Sign in" }))
            .padding([8, 16])
            .width(Length::Fill)
            .on_press_maybe((!self.submitting).then_some(LoginMessage::Submit));

        let mut form = column![
            brand(),
            text("Welcome back").size(22),
            text_input("you@example.com", &self.email)
                .on_input(LoginMessage::EmailChanged)
                .on_submit(LoginMessage::Submit)
                .padding(10),
            row![
                text_input("Password", &self.password)
                    .on_input(LoginMessage::PasswordChanged)
                    .on_submit(LoginMessage::Submit)
                    .secure(!self.show_password)
                    .padding(10),
                button(text(if self.show_password { "Hide" } else { "Show" }))
                    .style(iced::theme::Button::Text)
                    .on_press(LoginMessage::TogglePassword),
            ]
            .spacing(8)
            .align_items(Alignment::Center),
            submit,
        ]
        .spacing(14)
        .max_width(420);

        if let Some(message) = &self.message {
            form = form.push(style::error_text(message));
        }
        form = form.push(
            row![
                style::muted("Don't have an account?"),
                button(text("Sign up").size(13))
                    .style(iced::theme::Button::Text)
                    .on_press(LoginMessage::GoToSignup),
            ]
            .align_items(Alignment::Center),
        );

        centered(style::card(form).into())
    }
}

#[derive(Debug, Clone)]
pub enum SignupMessage {
    EmailChanged(String),
    PasswordChanged(String),
    ConfirmChanged(String),
    Submit,
    Finished(Result<(), String>),
    GoToLogin,
}

#[derive(Debug, Default)]
pub struct SignupForm {
    email: String,
    password: String,
    confirm: String,
    submitting: bool,
    message: Option<String>,
}

impl SignupForm {
    pub fn update(&mut self, message: SignupMessage, client: &ApiClient) -> (Command<SignupMessage>, Outcome) {
        match message {
            SignupMessage::EmailChanged(email) => self.email = email,
            SignupMessage::PasswordChanged(password) => self.password = password,
            SignupMessage::ConfirmChanged(confirm) => self.confirm = confirm,
            SignupMessage::Submit => {
                if self.submitting {
                    return (Command::none(), Outcome::None);
                }
                self.submitting = true;
                self.message = None;
                let client = client.clone();
                let email = self.email.trim().to_string();
                let password = self.password.clone();
                let confirm = self.confirm.clone();
                return (
                    Command::perform(
                        async move {
                            client
                                .signup(&email, &password, &confirm)
                                .await
                                .map(|_| ())
                                .map_err(report)
                        },
                        SignupMessage::Finished,
                    ),
                    Outcome::None,
                );
            }
            SignupMessage::Finished(result) => {
                self.submitting = false;
                match result {
                    Ok(()) => {
                        info!("Signup successful");
                        return (Command::none(), Outcome::Navigate(Route::Login));
                    }
                    Err(message) => self.message = Some(message),
                }
            }
            SignupMessage::GoToLogin => return (Command::none(), Outcome::Navigate(Route::Login)),
        }
        (Command::none(), Outcome::None)
    }

    pub fn view(&self) -> Element<'_, SignupMessage> {
        let mut form = column![
            brand(),
            text("Create your account").size(22),
            text_input("you@example.com", &self.email)
                .on_input(SignupMessage::EmailChanged)
                .padding(10),
            text_input("Password", &self.password)
                .on_input(SignupMessage::PasswordChanged)
                .secure(true)
                .padding(10),
            text_input("Confirm password", &self.confirm)
                .on_input(SignupMessage::ConfirmChanged)
                .on_submit(SignupMessage::Submit)
                .secure(true)
                .padding(10),
            button(text(if self.submitting { "Creating account..." } else { "Sign up" }))
                .padding([8, 16])
                .width(Length::Fill)
                .on_press_maybe((!self.submitting).then_some(SignupMessage::Submit)),
        ]
        .spacing(14)
        .max_width(420);

        if let Some(message) = &self.message {
            form = form.push(style::error_text(message));
        }
        form = form.push(
            row![
                style::muted("Already have an account?"),
                button(text("Sign in").size(13))
                    .style(iced::theme::Button::Text)
                    .on_press(SignupMessage::GoToLogin),
            ]
            .align_items(Alignment::Center),
        );

        centered(style::card(form).into())
    }
}

pub fn brand<'a, M: 'a>() -> Element<'a, M> {
    column![
        row![
            text("Newsly").size(28).style(style::SLATE_900),
            text(".AI").size(28).style(style::ORANGE_500),
        ],
        style::muted("AI-powered newsletter insights"),
    ]
    .spacing(2)
    .into()
}

fn centered<'a, M: 'a>(content: Element<'a, M>) -> Element<'a, M> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x()
        .center_y()
        .into()
}
