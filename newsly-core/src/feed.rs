use crate::calendar::CalendarDay;
use crate::error::CoreError;
use crate::error_utils::ErrorExt;
use crate::partition::{partition_by_day, DayPartition};
use crate::types::FeaturedItem;
use chrono::TimeZone;
use std::fmt;
use tracing::{debug, info};

pub const LOAD_FAILED_MESSAGE: &str = "Content could not be loaded. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Today,
    Category(String),
}

impl CategoryFilter {
    pub fn from_label(label: &str) -> Self {
        match label {
            "All" => CategoryFilter::All,
            "Today" => CategoryFilter::Today,
            other => CategoryFilter::Category(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Today => "Today",
            CategoryFilter::Category(name) => name,
        }
    }

    pub fn matches<Tz: TimeZone>(&self, item: &FeaturedItem, day: &CalendarDay<Tz>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Today => day.is_today(item),
            CategoryFilter::Category(name) => item.category_or_default() == name.as_str(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for CategoryFilter {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

pub fn filter_items<'a, Tz: TimeZone>(
    items: &'a [FeaturedItem],
    filter: &CategoryFilter,
    day: &CalendarDay<Tz>,
) -> Vec<&'a FeaturedItem> {
    items.iter().filter(|item| filter.matches(item, day)).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Result of one featured fetch as the feed page sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(Vec<FeaturedItem>),
    Failed(String),
    Aborted,
}

impl LoadOutcome {
    pub fn from_result(result: Result<Vec<FeaturedItem>, CoreError>) -> Self {
        match result {
            Ok(items) => LoadOutcome::Loaded(items),
            Err(CoreError::Aborted) => LoadOutcome::Aborted,
            Err(e) => {
                e.log_error();
                LoadOutcome::Failed(LOAD_FAILED_MESSAGE.to_string())
            }
        }
    }
}

/// State behind the main feed page.
#[derive(Debug, Clone)]
pub struct FeedState {
    items: Vec<FeaturedItem>,
    selected: CategoryFilter,
    status: FeedStatus,
    open_item: Option<FeaturedItem>,
    show_filters: bool,
}

impl FeedState {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: CategoryFilter::All,
            status: FeedStatus::Loading,
            open_item: None,
            show_filters: false,
        }
    }

    pub fn begin_load(&mut self) {
        self.status = FeedStatus::Loading;
    }

    /// Applies a finished fetch. Aborted fetches are dropped and leave the
    /// state untouched; returns whether anything was applied.
    pub fn finish_load(&mut self, outcome: LoadOutcome) -> bool {
        match outcome {
            LoadOutcome::Loaded(items) => {
                info!("Loaded {} featured items", items.len());
                self.items = items;
                self.status = FeedStatus::Ready;
                true
            }
            LoadOutcome::Failed(message) => {
                self.status = FeedStatus::Failed(message);
                true
            }
            LoadOutcome::Aborted => {
                debug!("Discarding aborted featured fetch");
                false
            }
        }
    }

    pub fn items(&self) -> &[FeaturedItem] {
        &self.items
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == FeedStatus::Loading
    }

    pub fn selected(&self) -> &CategoryFilter {
        &self.selected
    }

    pub fn select(&mut self, filter: CategoryFilter) {
        debug!("Feed filter set to {}", filter);
        self.selected = filter;
    }

    pub fn visible<Tz: TimeZone>(&self, day: &CalendarDay<Tz>) -> Vec<&FeaturedItem> {
        filter_items(&self.items, &self.selected, day)
    }

    pub fn sections<Tz: TimeZone>(&self, day: &CalendarDay<Tz>) -> DayPartition<'_> {
        partition_by_day(self.visible(day), day)
    }

    /// Filter choices: "All", "Today", then categories in first-seen order.
    pub fn available_filters(&self) -> Vec<CategoryFilter> {
        let mut filters = vec![CategoryFilter::All, CategoryFilter::Today];
        for item in &self.items {
            let candidate = CategoryFilter::Category(item.category_or_default().to_string());
            if !filters.contains(&candidate) {
                filters.push(candidate);
            }
        }
        filters
    }

    /// Shows `item` in the detail view. Synthesized ids can repeat, so the
    /// clicked record itself is kept rather than looked up again.
    pub fn open(&mut self, item: FeaturedItem) {
        debug!("Opening item {}", item.id);
        self.open_item = Some(item);
    }

    pub fn close(&mut self) {
        self.open_item = None;
    }

    pub fn open_item(&self) -> Option<&FeaturedItem> {
        self.open_item.as_ref()
    }

    pub fn toggle_filters(&mut self) {
        self.show_filters = !self.show_filters;
    }

    pub fn show_filters(&self) -> bool {
        self.show_filters
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new()
    }
}
