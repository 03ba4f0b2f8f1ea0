//! Financial Modeling Prep response records
//!
//! Only the fields the screener scores are modelled. Every numeric field is
//! optional because the provider returns `null` for companies it lacks data on.

use serde::{Deserialize, Serialize};

/// `/api/v3/ratios-ttm/{symbol}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatiosTtm {
    #[serde(rename = "operatingProfitMarginTTM", default)]
    pub operating_profit_margin: Option<f64>,
    #[serde(rename = "netProfitMarginTTM", default)]
    pub net_profit_margin: Option<f64>,
    #[serde(rename = "returnOnAssetsTTM", default)]
    pub return_on_assets: Option<f64>,
    #[serde(rename = "returnOnEquityTTM", default)]
    pub return_on_equity: Option<f64>,
    #[serde(rename = "returnOnCapitalEmployedTTM", default)]
    pub return_on_capital_employed: Option<f64>,
}

/// `/api/v3/key-metrics-ttm/{symbol}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyMetricsTtm {
    #[serde(rename = "currentRatioTTM", default)]
    pub current_ratio: Option<f64>,
    #[serde(rename = "debtToEquityTTM", default)]
    pub debt_to_equity: Option<f64>,
    #[serde(rename = "debtToAssetsTTM", default)]
    pub debt_to_assets: Option<f64>,
    #[serde(rename = "freeCashFlowYieldTTM", default)]
    pub free_cash_flow_yield: Option<f64>,
}

/// `/api/v3/financial-growth/{symbol}`, most recent fiscal year first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialGrowth {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "fiveYRevenueGrowthPerShare", default)]
    pub five_y_revenue_growth_per_share: Option<f64>,
    #[serde(rename = "fiveYOperatingCFGrowthPerShare", default)]
    pub five_y_operating_cf_growth_per_share: Option<f64>,
    #[serde(rename = "fiveYNetIncomeGrowthPerShare", default)]
    pub five_y_net_income_growth_per_share: Option<f64>,
}

/// `/api/v4/esg-environmental-social-governance-data?symbol={symbol}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsgScores {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub environmental_score: Option<f64>,
    #[serde(default)]
    pub social_score: Option<f64>,
    #[serde(default)]
    pub governance_score: Option<f64>,
}

/// One quarter from `/api/v3/earnings-surprises/{symbol}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsSurprise {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub actual_earning_result: Option<f64>,
    #[serde(default)]
    pub estimated_earning: Option<f64>,
}
