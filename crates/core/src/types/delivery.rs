//! Delivery charges by destination.

use serde::{Deserialize, Serialize};

use super::price::Price;

/// Where an order is shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeliveryArea {
    #[default]
    InsideDhaka,
    OutsideDhaka,
}

impl DeliveryArea {
    /// Form/wire value for this area.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InsideDhaka => "insideDhaka",
            Self::OutsideDhaka => "outsideDhaka",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::InsideDhaka => "Inside Dhaka",
            Self::OutsideDhaka => "Outside Dhaka",
        }
    }
}

/// Flat delivery charges, in whole Taka.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryCharge {
    pub inside_dhaka: u32,
    pub outside_dhaka: u32,
}

impl DeliveryCharge {
    /// Default charge inside Dhaka.
    pub const DEFAULT_INSIDE_DHAKA: u32 = 70;
    /// Default charge outside Dhaka.
    pub const DEFAULT_OUTSIDE_DHAKA: u32 = 150;

    /// The charge for shipping to `area`.
    #[must_use]
    pub fn charge_for(&self, area: DeliveryArea) -> Price {
        match area {
            DeliveryArea::InsideDhaka => Price::from_taka(self.inside_dhaka),
            DeliveryArea::OutsideDhaka => Price::from_taka(self.outside_dhaka),
        }
    }
}

impl Default for DeliveryCharge {
    fn default() -> Self {
        Self {
            inside_dhaka: Self::DEFAULT_INSIDE_DHAKA,
            outside_dhaka: Self::DEFAULT_OUTSIDE_DHAKA,
        }
    }
}
