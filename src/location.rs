//! Province/city filter state
//!
//! Holds the directory loaded once at startup and the current selection.
//! Selecting a province always clears the city.

use crate::backend::types::LocationDirectory;

pub const LOAD_FAILED: &str = "지역 정보를 불러오는데 실패했습니다.";

#[derive(Debug, Default)]
pub struct LocationFilter {
    directory: Option<LocationDirectory>,
    selected_sido: String,
    selected_sigungu: String,
    load_error: Option<&'static str>,
}

impl LocationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the result of the one-time directory load
    pub fn apply_loaded<E: std::fmt::Display>(&mut self, outcome: Result<LocationDirectory, E>) {
        match outcome {
            Ok(directory) => {
                tracing::info!("Loaded {} provinces", directory.sido.len());
                self.directory = Some(directory);
                self.load_error = None;
            }
            Err(e) => {
                tracing::warn!("Failed to load locations: {}", e);
                self.directory = None;
                self.load_error = Some(LOAD_FAILED);
            }
        }
    }

    pub fn select_province(&mut self, name: impl Into<String>) {
        self.selected_sido = name.into();
        self.selected_sigungu.clear();
    }

    pub fn select_city(&mut self, name: impl Into<String>) {
        self.selected_sigungu = name.into();
    }

    pub fn selected_sido(&self) -> &str {
        &self.selected_sido
    }

    pub fn selected_sigungu(&self) -> &str {
        &self.selected_sigungu
    }

    pub fn load_error(&self) -> Option<&'static str> {
        self.load_error
    }

    /// Province options, empty until the directory is loaded
    pub fn provinces(&self) -> &[String] {
        self.directory.as_ref().map(|d| d.sido.as_slice()).unwrap_or(&[])
    }

    pub fn available_cities(&self) -> &[String] {
        match &self.directory {
            Some(directory) if !self.selected_sido.is_empty() => directory.cities_of(&self.selected_sido),
            _ => &[],
        }
    }

    /// Selected city is empty or listed under the selected province
    pub fn city_is_listed(&self) -> bool {
        self.selected_sigungu.is_empty()
            || self.available_cities().iter().any(|c| *c == self.selected_sigungu)
    }
}
