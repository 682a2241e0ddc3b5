use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::DashboardError;
use crate::domain::{StateBundle, UsState};

/// One `{year, price, sales}` entry as the viewer script reads it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub price: f64,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatePayload {
    pub historical: Vec<SeriesPoint>,
    pub forecast: Vec<SeriesPoint>,
}

/// The data blob embedded in the dashboard, keyed by state name.
///
/// Serializes as a plain object; keys come out in state-name order so a
/// fixed seed always yields byte-identical JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DashboardPayload(BTreeMap<UsState, StatePayload>);

impl DashboardPayload {
    pub fn from_bundles(bundles: &[StateBundle]) -> Self {
        let states = bundles
            .iter()
            .map(|b| {
                let historical = b
                    .historical
                    .records()
                    .iter()
                    .map(|r| SeriesPoint {
                        year: r.year,
                        price: r.avg_price_cents_per_kwh,
                        sales: r.total_sales_mwh,
                    })
                    .collect();
                let forecast = b
                    .forecast
                    .iter()
                    .map(|p| SeriesPoint {
                        year: p.year,
                        price: p.predicted_price,
                        sales: p.predicted_sales,
                    })
                    .collect();
                (b.state, StatePayload { historical, forecast })
            })
            .collect();
        Self(states)
    }

    pub fn states(&self) -> impl Iterator<Item = UsState> + '_ {
        self.0.keys().copied()
    }

    /// Serialize for embedding inside a `<script>` element.
    ///
    /// `<`, `>` and `&` are written as unicode escapes; the result is still
    /// valid JSON but can never terminate the surrounding element.
    pub fn to_json(&self) -> Result<String, DashboardError> {
        let raw = serde_json::to_string(&self.0)?;
        Ok(raw
            .replace('<', "\\u003c")
            .replace('>', "\\u003e")
            .replace('&', "\\u0026"))
    }

    pub fn from_json(json: &str) -> Result<Self, DashboardError> {
        Ok(serde_json::from_str(json)?)
    }
}
