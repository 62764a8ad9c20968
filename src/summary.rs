//! Summary Loader
//!
//! Fetches both summary resources at startup and derives their charts.
//! The two fetches run concurrently and fail independently: a broken
//! recent-trains endpoint never hides the daily chart, and vice versa.

use crate::api::SummaryClient;
use crate::charts::{daily_chart, recent_trains_chart, BarChart};
use crate::error::DashboardResult;
use crate::models::{DailySummaryPoint, RecentTrainPoint};

/// Rows fetched for a chart together with the chart drawn from them
#[derive(Debug, Clone)]
pub struct LoadedChart<T> {
    pub rows: Vec<T>,
    pub chart: BarChart,
}

/// Outcome of one load: each chart carries its own result
#[derive(Debug)]
pub struct SummaryCharts {
    pub daily: DashboardResult<LoadedChart<DailySummaryPoint>>,
    pub recent: DashboardResult<LoadedChart<RecentTrainPoint>>,
}

impl SummaryCharts {
    /// True if both charts loaded
    pub fn is_complete(&self) -> bool {
        self.daily.is_ok() && self.recent.is_ok()
    }
}

/// Loads the daily and recent-trains charts
#[derive(Debug, Clone)]
pub struct SummaryLoader {
    client: SummaryClient,
}

impl SummaryLoader {
    pub fn new(client: SummaryClient) -> Self {
        Self { client }
    }

    /// Fetch and derive both charts concurrently
    pub async fn load(&self) -> SummaryCharts {
        let (daily, recent) = tokio::join!(self.load_daily(), self.load_recent());
        SummaryCharts { daily, recent }
    }

    /// Daily trains/cars stacked chart
    pub async fn load_daily(&self) -> DashboardResult<LoadedChart<DailySummaryPoint>> {
        let rows = self.client.fetch_daily_summary().await.map_err(|e| {
            tracing::warn!(error = %e, "Daily summary unavailable");
            e
        })?;

        let chart = daily_chart(&rows);
        tracing::info!(days = rows.len(), "Daily summary loaded");
        Ok(LoadedChart { rows, chart })
    }

    /// Cars-per-train chart
    pub async fn load_recent(&self) -> DashboardResult<LoadedChart<RecentTrainPoint>> {
        let rows = self.client.fetch_recent_trains().await.map_err(|e| {
            tracing::warn!(error = %e, "Recent trains unavailable");
            e
        })?;

        let chart = recent_trains_chart(&rows);
        tracing::info!(trains = rows.len(), "Recent trains loaded");
        Ok(LoadedChart { rows, chart })
    }
}
