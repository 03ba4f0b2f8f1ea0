//! API client for the Financial Modeling Prep data provider

pub mod fmp;
pub mod models;
pub mod source;

pub use fmp::{Endpoint, FmpClient};
pub use models::{EarningsSurprise, EsgScores, FinancialGrowth, KeyMetricsTtm, RatiosTtm};
pub use source::MarketDataSource;

#[cfg(test)]
pub use source::MockMarketDataSource;
