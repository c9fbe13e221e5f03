//! Paid-live history summary
//!
//! Fetches the caller's paid-live history page, totals the spend, converts it
//! to Rupiah and ranks the reference theater shows by how many purchased
//! lives mention them.

use serde::Serialize;
use srw_common::config::CurrencyConfig;
use srw_common::currency::format_idr_total;
use srw_common::SetlistCatalog;
use std::sync::Arc;
use tracing::{debug, info};

use super::history_parser::{parse_history_page, PaidLiveEntry};
use crate::types::{FetchError, ImageEncoder, PaidLiveHistorySource};

/// Purchase count for one reference show
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowRanking {
    pub name: String,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub name: String,
    /// Inline `data:` URI, empty when the page carried no avatar
    pub image: String,
    pub level: String,
}

/// Response body of `POST /premium-lives`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumLiveSummary {
    pub user: UserInfo,
    pub total_paid_live: usize,
    #[serde(rename = "totalJPY")]
    pub total_jpy: i64,
    #[serde(rename = "totalIDR")]
    pub total_idr: String,
    pub top_setlist: String,
    pub show: Vec<ShowRanking>,
    pub results: Vec<PaidLiveEntry>,
}

/// Count entries whose title contains each show name, most purchased first
///
/// Ties keep the order of `shows`.
pub fn rank_shows(shows: &[String], entries: &[PaidLiveEntry]) -> Vec<ShowRanking> {
    let mut ranking: Vec<ShowRanking> = shows
        .iter()
        .map(|show| ShowRanking {
            name: show.clone(),
            total: entries
                .iter()
                .filter(|entry| entry.title.contains(show.as_str()))
                .count(),
        })
        .collect();
    ranking.sort_by(|a, b| b.total.cmp(&a.total));
    ranking
}

/// Builds [`PremiumLiveSummary`] values for a session token
pub struct LiveHistoryService {
    history: Arc<dyn PaidLiveHistorySource>,
    images: Arc<dyn ImageEncoder>,
    setlists: Arc<SetlistCatalog>,
    shows: Vec<String>,
    currency: CurrencyConfig,
}

impl LiveHistoryService {
    pub fn new(
        history: Arc<dyn PaidLiveHistorySource>,
        images: Arc<dyn ImageEncoder>,
        setlists: Arc<SetlistCatalog>,
        shows: Vec<String>,
        currency: CurrencyConfig,
    ) -> Self {
        Self {
            history,
            images,
            setlists,
            shows,
            currency,
        }
    }

    pub async fn summarize(&self, token: &str) -> Result<PremiumLiveSummary, FetchError> {
        let html = self.history.fetch_history_page(token).await?;
        let page = parse_history_page(&html)?;
        debug!(entries = page.entries.len(), "Parsed paid-live history");

        let image = match page.user_image.as_deref() {
            Some(url) if !url.trim().is_empty() => self.images.encode(url).await?,
            _ => String::new(),
        };

        let total_jpy = page.total_jpy()?;
        let total_idr = format_idr_total(
            total_jpy,
            self.currency.jpy_to_idr_rate,
            self.currency.legacy_trailing_zero,
        );

        let (top_setlist, show) = if page.entries.is_empty() {
            (self.setlists.default_image().to_string(), Vec::new())
        } else {
            let ranking = rank_shows(&self.shows, &page.entries);
            let top = ranking
                .first()
                .map(|top| self.setlists.image_for(&top.name))
                .unwrap_or_else(|| self.setlists.default_image())
                .to_string();
            (top, ranking)
        };

        info!(
            total_paid_live = page.entries.len(),
            total_jpy,
            "Paid-live summary built"
        );

        Ok(PremiumLiveSummary {
            user: UserInfo {
                name: page.user_name,
                image,
                level: page.level,
            },
            total_paid_live: page.entries.len(),
            total_jpy,
            total_idr,
            top_setlist,
            show,
            results: page.entries,
        })
    }
}
