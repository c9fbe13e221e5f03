//! Paid-live history page parsing
//!
//! Pure, synchronous extraction from the `/paid_live/hist` HTML. The parsed
//! document is not `Send`, so it never lives across an `.await`: callers fetch
//! the page, call [`parse_history_page`], then continue with the owned result.

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::types::FetchError;

const USER_NAME: &str = ".pc-header-mypage-name";
const USER_IMAGE: &str = ".pc-header-mypage-image";
const USER_LEVEL: &str = ".pc-header-mypage-level";
const SCHEDULE_ROW: &str = ".paid-live-schedule";
const ROW_TITLE_LINK: &str = ".paid-live-title a";
const ROW_PRICE: &str = ".paid-live-info-default-price .paid-live-info-item-value";

/// Currency suffix on price cells
const PRICE_SUFFIX: &str = " JPY";

/// One purchased paid live
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaidLiveEntry {
    pub title: String,
    pub link: String,
    /// Price in JPY
    pub price: i64,
}

/// Everything the summary needs from the history page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaidLiveHistoryPage {
    pub user_name: String,
    /// Avatar URL, `None` when the header has no image
    pub user_image: Option<String>,
    pub level: String,
    pub entries: Vec<PaidLiveEntry>,
}

impl PaidLiveHistoryPage {
    /// Sum of entry prices; a total that does not fit `i64` is a parse error
    pub fn total_jpy(&self) -> Result<i64, FetchError> {
        self.entries.iter().try_fold(0i64, |total, entry| {
            total
                .checked_add(entry.price)
                .ok_or_else(|| FetchError::Parse("paid-live price total overflows".to_string()))
        })
    }
}

struct HistorySelectors {
    user_name: Selector,
    user_image: Selector,
    user_level: Selector,
    row: Selector,
    title_link: Selector,
    price: Selector,
}

impl HistorySelectors {
    fn new() -> Result<Self, FetchError> {
        Ok(Self {
            user_name: selector(USER_NAME)?,
            user_image: selector(USER_IMAGE)?,
            user_level: selector(USER_LEVEL)?,
            row: selector(SCHEDULE_ROW)?,
            title_link: selector(ROW_TITLE_LINK)?,
            price: selector(ROW_PRICE)?,
        })
    }
}

fn selector(css: &str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|e| FetchError::Parse(format!("selector {}: {}", css, e)))
}

/// Concatenated text of every match, trimmed
fn joined_text<'a>(matches: impl Iterator<Item = ElementRef<'a>>) -> String {
    matches
        .flat_map(|el| el.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parse a price cell such as `"1,500 JPY"`
pub fn parse_price(text: &str) -> Result<i64, FetchError> {
    let trimmed = text.trim();
    let amount = trimmed.strip_suffix(PRICE_SUFFIX).unwrap_or(trimmed);
    let digits: String = amount.trim().chars().filter(|c| *c != ',').collect();

    digits
        .parse::<i64>()
        .map_err(|_| FetchError::Parse(format!("unreadable price {:?}", text)))
}

/// Extract user header and schedule rows from the history page
pub fn parse_history_page(html: &str) -> Result<PaidLiveHistoryPage, FetchError> {
    let selectors = HistorySelectors::new()?;
    let document = Html::parse_document(html);

    let user_name = joined_text(document.select(&selectors.user_name));
    let level = joined_text(document.select(&selectors.user_level));
    let user_image = document
        .select(&selectors.user_image)
        .next()
        .and_then(|el| el.value().attr("src"))
        .map(str::to_string);

    let mut entries = Vec::new();
    for row in document.select(&selectors.row) {
        let title = joined_text(row.select(&selectors.title_link));
        let link = row
            .select(&selectors.title_link)
            .next()
            .and_then(|el| el.value().attr("href"))
            .unwrap_or_default()
            .to_string();
        let price = parse_price(&joined_text(row.select(&selectors.price)))?;

        entries.push(PaidLiveEntry { title, link, price });
    }

    Ok(PaidLiveHistoryPage {
        user_name,
        user_image,
        level,
        entries,
    })
}
