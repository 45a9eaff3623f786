//! Chart-ready output shapes handed to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::taxonomy::ResourceType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub label: ResourceType,
    pub data: Vec<u64>,
    pub background_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualChart {
    /// Ascending publication years
    pub labels: Vec<String>,
    pub datasets: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPoint {
    pub x: usize,
    pub y: u64,
    pub label: String,
    pub is_user: bool,
    pub radius: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterSeries {
    pub label: ResourceType,
    pub data: Vec<ScatterPoint>,
    pub background_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bin {
    pub start: u64,
    pub end: u64,
    pub count: u64,
    pub is_user_bin: bool,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramSeries {
    pub label: ResourceType,
    pub bins: Vec<Bin>,
    pub user_contribution: u64,
    pub max_contribution: u64,
    pub background_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramChart {
    pub datasets: Vec<HistogramSeries>,
}
