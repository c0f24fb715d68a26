use crate::report;
use crate::style;
use iced::widget::{button, column, row, scrollable, text, text_input, Column};
use iced::{Alignment, Command, Element, Length};
use newsly_client::ApiClient;
use newsly_core::{format_long_summary, CoreError, SummaryBlock};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone)]
pub enum Message {
    PathChanged(String),
    EmailChanged(String),
    UrlChanged(String),
    QuestionChanged(String),
    SummarizeFile,
    SummarizeUrl,
    Ask,
    Finished(Result<Reply, String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Summary(String),
    Answer(String),
}

/// Standalone tools: summarize a PDF or a link, or ask a PDF a question.
#[derive(Debug, Default)]
pub struct SummarizePage {
    pdf_path: String,
    email: String,
    url: String,
    question: String,
    busy: bool,
    reply: Option<Reply>,
    error: Option<String>,
}

async fn read_pdf(path: PathBuf) -> Result<(Vec<u8>, String), CoreError> {
    let bytes = tokio::fs::read(&path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok((bytes, file_name))
}

async fn summarize_pdf(
    client: ApiClient,
    path: PathBuf,
    email: Option<String>,
) -> Result<String, CoreError> {
    let (bytes, file_name) = read_pdf(path).await?;
    client
        .summarize_file(bytes, &file_name, email.as_deref())
        .await
}

async fn ask_pdf(client: ApiClient, path: PathBuf, question: String) -> Result<String, CoreError> {
    let (bytes, file_name) = read_pdf(path).await?;
    client.chat_with_pdf(bytes, &file_name, &question).await
}

impl SummarizePage {
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn reply(&self) -> Option<&Reply> {
        self.reply.as_ref()
    }

    fn start(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        self.error = None;
        true
    }

    fn pdf_path(&self) -> Option<PathBuf> {
        let path = self.pdf_path.trim();
        (!path.is_empty()).then(|| PathBuf::from(path))
    }

    pub fn update(&mut self, message: Message, client: &ApiClient) -> Command<Message> {
        match message {
            Message::PathChanged(path) => self.pdf_path = path,
            Message::EmailChanged(email) => self.email = email,
            Message::UrlChanged(url) => self.url = url,
            Message::QuestionChanged(question) => self.question = question,
            Message::SummarizeFile => {
                let Some(path) = self.pdf_path() else {
                    self.error = Some("Choose a PDF file first.".to_string());
                    return Command::none();
                };
                if self.start() {
                    let email = Some(self.email.trim().to_string()).filter(|e| !e.is_empty());
                    return Command::perform(
                        summarize_pdf(client.clone(), path, email),
                        |result| Message::Finished(result.map(Reply::Summary).map_err(report)),
                    );
                }
            }
            Message::SummarizeUrl => {
                if self.start() {
                    let client = client.clone();
                    let url = self.url.clone();
                    return Command::perform(
                        async move { client.summarize_url(&url).await },
                        |result| Message::Finished(result.map(Reply::Summary).map_err(report)),
                    );
                }
            }
            Message::Ask => {
                let Some(path) = self.pdf_path() else {
                    self.error = Some("Choose a PDF file first.".to_string());
                    return Command::none();
                };
                if self.start() {
                    return Command::perform(
                        ask_pdf(client.clone(), path, self.question.clone()),
                        |result| Message::Finished(result.map(Reply::Answer).map_err(report)),
                    );
                }
            }
            Message::Finished(result) => {
                self.busy = false;
                match result {
                    Ok(reply) => self.reply = Some(reply),
                    Err(message) => self.error = Some(message),
                }
            }
        }
        Command::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let idle = !self.busy;

        let pdf_tools = style::card(
            column![
                text("PDF").size(18),
                text_input("/path/to/newsletter.pdf", &self.pdf_path)
                    .on_input(Message::PathChanged)
                    .padding(8),
                row![
                    text_input("Also email the summary to (optional)", &self.email)
                        .on_input(Message::EmailChanged)
                        .padding(8),
                    button(text("Summarize PDF"))
                        .on_press_maybe(idle.then_some(Message::SummarizeFile)),
                ]
                .spacing(8)
                .align_items(Alignment::Center),
                row![
                    text_input("Ask something about this PDF", &self.question)
                        .on_input(Message::QuestionChanged)
                        .on_submit(Message::Ask)
                        .padding(8),
                    button(text("Ask")).on_press_maybe(idle.then_some(Message::Ask)),
                ]
                .spacing(8)
                .align_items(Alignment::Center),
            ]
            .spacing(10),
        )
        .width(Length::Fill);

        let url_tools = style::card(
            column![
                text("Link").size(18),
                row![
                    text_input("https://", &self.url)
                        .on_input(Message::UrlChanged)
                        .on_submit(Message::SummarizeUrl)
                        .padding(8),
                    button(text("Summarize link"))
                        .on_press_maybe(idle.then_some(Message::SummarizeUrl)),
                ]
                .spacing(8)
                .align_items(Alignment::Center),
            ]
            .spacing(10),
        )
        .width(Length::Fill);

        let mut page = column![text("Summarize").size(24), pdf_tools, url_tools].spacing(16);

        if self.busy {
            page = page.push(style::muted("Working on it..."));
        }
        if let Some(error) = &self.error {
            page = page.push(style::error_text(error));
        }
        if let Some(reply) = &self.reply {
            page = page.push(scrollable(reply_view(reply)).height(Length::Fill));
        }
        page.into()
    }
}

fn reply_view(reply: &Reply) -> Element<'_, Message> {
    let content = match reply {
        Reply::Summary(summary) => format_long_summary(summary).into_iter().fold(
            Column::new().spacing(8).push(text("Summary").size(18)),
            |content, block| match block {
                SummaryBlock::Lead(sentence) => content.push(text(sentence).size(16)),
                SummaryBlock::Paragraph(sentence) => content.push(text(sentence).size(14)),
                SummaryBlock::Bullet(point) => content.push(text(format!("• {}", point)).size(14)),
            },
        ),
        Reply::Answer(answer) => column![text("Answer").size(18), text(answer).size(14)].spacing(8),
    };
    style::card(content).width(Length::Fill).into()
}
