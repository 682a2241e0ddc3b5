use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

/// U.S. state used as the partition key for every series.
///
/// The state code is the full state name, which is also the key used in the
/// embedded dashboard payload. Variants are declared alphabetically so the
/// derived `Ord` matches name order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
    EnumCount,
)]
#[strum(ascii_case_insensitive)]
pub enum UsState {
    Alabama,
    Alaska,
    Arizona,
    Arkansas,
    California,
    Colorado,
    Connecticut,
    Delaware,
    Florida,
    Georgia,
    Hawaii,
    Idaho,
    Illinois,
    Indiana,
    Iowa,
    Kansas,
    Kentucky,
    Louisiana,
    Maine,
    Maryland,
    Massachusetts,
    Michigan,
    Minnesota,
    Mississippi,
    Missouri,
    Montana,
    Nebraska,
    Nevada,
    #[serde(rename = "New Hampshire")]
    #[strum(serialize = "New Hampshire")]
    NewHampshire,
    #[serde(rename = "New Jersey")]
    #[strum(serialize = "New Jersey")]
    NewJersey,
    #[serde(rename = "New Mexico")]
    #[strum(serialize = "New Mexico")]
    NewMexico,
    #[serde(rename = "New York")]
    #[strum(serialize = "New York")]
    NewYork,
    #[serde(rename = "North Carolina")]
    #[strum(serialize = "North Carolina")]
    NorthCarolina,
    #[serde(rename = "North Dakota")]
    #[strum(serialize = "North Dakota")]
    NorthDakota,
    Ohio,
    Oklahoma,
    Oregon,
    Pennsylvania,
    #[serde(rename = "Rhode Island")]
    #[strum(serialize = "Rhode Island")]
    RhodeIsland,
    #[serde(rename = "South Carolina")]
    #[strum(serialize = "South Carolina")]
    SouthCarolina,
    #[serde(rename = "South Dakota")]
    #[strum(serialize = "South Dakota")]
    SouthDakota,
    Tennessee,
    Texas,
    Utah,
    Vermont,
    Virginia,
    Washington,
    #[serde(rename = "West Virginia")]
    #[strum(serialize = "West Virginia")]
    WestVirginia,
    Wisconsin,
    Wyoming,
}

impl UsState {
    /// All states in name order.
    pub fn all() -> impl Iterator<Item = UsState> {
        Self::iter()
    }

    /// Full state name, e.g. `"New Hampshire"`.
    pub fn name(&self) -> &str {
        self.as_ref()
    }
}
