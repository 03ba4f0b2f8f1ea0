//! Data source abstraction used by the metric assemblers

use async_trait::async_trait;

use crate::api::fmp::FmpClient;
use crate::api::models::{EarningsSurprise, EsgScores, FinancialGrowth, KeyMetricsTtm, RatiosTtm};
use crate::error::Result;
use crate::table::Ticker;

/// Source of the raw records behind each metric group
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn ratios_ttm(&self, ticker: &Ticker) -> Result<RatiosTtm>;

    async fn key_metrics_ttm(&self, ticker: &Ticker) -> Result<KeyMetricsTtm>;

    async fn financial_growth(&self, ticker: &Ticker) -> Result<FinancialGrowth>;

    async fn esg_scores(&self, ticker: &Ticker) -> Result<EsgScores>;

    async fn earnings_surprises(&self, ticker: &Ticker) -> Result<Vec<EarningsSurprise>>;
}

#[async_trait]
impl MarketDataSource for FmpClient {
    async fn ratios_ttm(&self, ticker: &Ticker) -> Result<RatiosTtm> {
        FmpClient::ratios_ttm(self, ticker).await
    }

    async fn key_metrics_ttm(&self, ticker: &Ticker) -> Result<KeyMetricsTtm> {
        FmpClient::key_metrics_ttm(self, ticker).await
    }

    async fn financial_growth(&self, ticker: &Ticker) -> Result<FinancialGrowth> {
        FmpClient::financial_growth(self, ticker).await
    }

    async fn esg_scores(&self, ticker: &Ticker) -> Result<EsgScores> {
        FmpClient::esg_scores(self, ticker).await
    }

    async fn earnings_surprises(&self, ticker: &Ticker) -> Result<Vec<EarningsSurprise>> {
        FmpClient::earnings_surprises(self, ticker).await
    }
}
