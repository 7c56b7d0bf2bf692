//! Core application state and Iced Application implementation
//!
//! Wires the location filter and the search session to the search backend.
//! Network calls run as tasks and come back as messages.

use iced::keyboard::{self, key::Named, Key};
use iced::task;
use iced::widget::{button, column, container, pick_list, row, scrollable, text, Space};
use iced::{Alignment, Background, Border, Color, Element, Length, Padding, Subscription, Task, Theme};

use crate::backend::api::BackendClient;
use crate::backend::types::{LocationDirectory, SearchResultItem};
use crate::format;
use crate::location::LocationFilter;
use crate::session::{RequestId, SearchSession, Submission, EMPTY_RESULT};
use crate::ui::search_bar;
use crate::ui::theme::DarkTheme;

pub const TITLE: &str = "대형폐기물 품목 검색";
const DESCRIPTION: &str = "버리려는 물건을 검색하면 유사한 대형폐기물 품목과 수수료를 안내합니다.";

// ============================================================================
// Application State
// ============================================================================

pub struct BulkWaste {
    backend: BackendClient,
    location: LocationFilter,
    session: SearchSession,
    /// Aborts the outstanding search when replaced or dropped
    search_handle: Option<task::Handle>,
}

#[derive(Debug, Clone)]
pub enum Message {
    LocationsLoaded(Result<LocationDirectory, String>),
    ProvinceSelected(String),
    ProvinceCleared,
    CitySelected(String),
    QueryChanged(String),
    Submit,
    SearchFinished(RequestId, Result<Vec<SearchResultItem>, String>),
    Cancel,
}

impl BulkWaste {
    /// Build the app and kick off the one-time location load
    pub fn new(backend: BackendClient) -> (Self, Task<Message>) {
        let client = backend.clone();
        let load = Task::perform(
            async move { client.locations().await.map_err(|e| e.to_string()) },
            Message::LocationsLoaded,
        );

        let app = Self {
            backend,
            location: LocationFilter::new(),
            session: SearchSession::new(),
            search_handle: None,
        };
        (app, load)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::LocationsLoaded(outcome) => {
                self.location.apply_loaded(outcome);
                Task::none()
            }

            Message::ProvinceSelected(name) => {
                self.location.select_province(name);
                Task::none()
            }

            Message::ProvinceCleared => {
                self.location.select_province(String::new());
                Task::none()
            }

            Message::CitySelected(name) => {
                self.location.select_city(name);
                Task::none()
            }

            Message::QueryChanged(text) => {
                self.session.set_query(text);
                Task::none()
            }

            Message::Submit => {
                let submission = self
                    .session
                    .submit(self.location.selected_sido(), self.location.selected_sigungu());

                match submission {
                    Submission::Dispatch { id, query } => {
                        let client = self.backend.clone();
                        let (search, handle) = Task::perform(
                            async move { client.search(&query).await.map_err(|e| e.to_string()) },
                            move |outcome| Message::SearchFinished(id, outcome),
                        )
                        .abortable();
                        self.search_handle = Some(handle.abort_on_drop());
                        search
                    }
                    Submission::Suppressed | Submission::Invalid => Task::none(),
                }
            }

            Message::SearchFinished(id, outcome) => {
                if self.session.complete(id, outcome) {
                    self.search_handle = None;
                }
                Task::none()
            }

            Message::Cancel => {
                if self.session.cancel().is_some() {
                    if let Some(handle) = self.search_handle.take() {
                        handle.abort();
                    }
                }
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let header = column![
            text(TITLE).size(26).color(DarkTheme::TEXT),
            text(DESCRIPTION).size(14).color(DarkTheme::TEXT_MUTED),
        ]
        .spacing(6);

        let content = column![
            header,
            self.view_filters(),
            self.view_search_row(),
        ]
        .push_maybe(self.location.load_error().map(error_text))
        .push_maybe(self.session.error().map(error_text))
        .push(self.view_results())
        .spacing(16);

        container(container(content).padding(24).width(Length::Fill).height(Length::Fill))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(Background::Color(DarkTheme::BACKGROUND)),
                ..Default::default()
            })
            .into()
    }

    fn view_filters(&self) -> Element<'_, Message> {
        let sido = self.location.selected_sido();
        let sigungu = self.location.selected_sigungu();

        let province = pick_list(
            self.location.provinces(),
            (!sido.is_empty()).then(|| sido.to_string()),
            Message::ProvinceSelected,
        )
        .placeholder("시도 선택")
        .width(Length::FillPortion(1));

        let city = pick_list(
            self.location.available_cities(),
            (!sigungu.is_empty()).then(|| sigungu.to_string()),
            Message::CitySelected,
        )
        .placeholder("시군구 선택")
        .width(Length::FillPortion(1));

        let clear = button(text("전체 지역").size(14))
            .on_press_maybe((!sido.is_empty()).then_some(Message::ProvinceCleared));

        row![province, city, clear]
            .spacing(8)
            .align_y(Alignment::Center)
            .into()
    }

    fn view_search_row(&self) -> Element<'_, Message> {
        let loading = self.session.is_loading();
        let submit = button(text(if loading { "검색 중..." } else { "검색" }).size(16))
            .padding(Padding::from([10.0, 18.0]))
            .on_press_maybe((!loading).then_some(Message::Submit));

        row![
            search_bar::view(self.session.query(), Message::QueryChanged, Message::Submit),
            submit,
        ]
        .push_maybe(loading.then(|| button(text("취소").size(16)).padding(Padding::from([10.0, 14.0])).on_press(Message::Cancel)))
        .spacing(8)
        .align_y(Alignment::Center)
        .into()
    }

    fn view_results(&self) -> Element<'_, Message> {
        if self.session.is_empty_result() {
            return container(text(EMPTY_RESULT).size(15).color(DarkTheme::TEXT_MUTED))
                .width(Length::Fill)
                .center_x(Length::Fill)
                .into();
        }

        let results = self.session.results();
        if results.is_empty() {
            return Space::with_height(Length::Shrink).into();
        }

        let items: Vec<Element<'_, Message>> = results.iter().map(result_card).collect();

        column![
            text("검색 결과").size(18).color(DarkTheme::TEXT),
            scrollable(column(items).spacing(8)).height(Length::Fill),
        ]
        .spacing(10)
        .height(Length::Fill)
        .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(|key, _modifiers| match key {
            Key::Named(Named::Escape) => Some(Message::Cancel),
            _ => None,
        })
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn error_text<'a>(message: &'static str) -> Element<'a, Message> {
    text(message).size(14).color(DarkTheme::ERROR).into()
}

fn result_card(item: &SearchResultItem) -> Element<'_, Message> {
    let header = row![
        text(&item.name).size(16).color(DarkTheme::TEXT),
        Space::with_width(Length::Fill),
        text(format::similarity(item.similarity)).size(13).color(DarkTheme::PRIMARY),
    ]
    .align_y(Alignment::Center);

    let details = row![text(&item.category).size(13).color(DarkTheme::TEXT_MUTED)]
        .push_maybe(item.spec().map(|spec| text(spec).size(13).color(DarkTheme::TEXT_MUTED)))
        .spacing(8);

    let footer = row![
        text(format::location(item)).size(13).color(DarkTheme::TEXT_MUTED),
        Space::with_width(Length::Fill),
        text(format::fee(item.fee)).size(15).color(DarkTheme::FEE),
    ]
    .align_y(Alignment::Center);

    container(column![header, details, footer].spacing(4))
        .padding(Padding::from([10.0, 14.0]))
        .width(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(Background::Color(DarkTheme::SURFACE)),
            border: Border {
                color: DarkTheme::BORDER,
                width: 1.0,
                radius: 8.0.into(),
            },
            text_color: Some(Color::WHITE),
            ..Default::default()
        })
        .into()
}
