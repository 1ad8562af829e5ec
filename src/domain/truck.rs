use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(from = "String", into = "String")]
pub enum ProductCategory {
    Lpg,
    Pol,
    #[default]
    Chemical,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Lpg => "LPG",
            ProductCategory::Pol => "POL",
            ProductCategory::Chemical => "CHEMICAL",
        }
    }
}

// Anything the booking system does not classify as LPG or POL is handled
// in the chemical bays.
impl From<String> for ProductCategory {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "LPG" => ProductCategory::Lpg,
            "POL" => ProductCategory::Pol,
            _ => ProductCategory::Chemical,
        }
    }
}

impl From<ProductCategory> for String {
    fn from(value: ProductCategory) -> Self {
        value.as_str().to_string()
    }
}

/// A truck booked for today, as supplied by the booking subsystem.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScheduledTruck {
    pub booking_id: String,
    /// Minutes from the forecast "now" when the slot opens. Negative when
    /// the slot has already started.
    pub slot_start_minutes_from_now: f64,
    pub slot_end_minutes_from_now: f64,
    /// Already past the gate and therefore counted in the current state.
    #[serde(default)]
    pub is_already_in_terminal: bool,
    #[serde(default)]
    pub product_category: ProductCategory,
}

impl ScheduledTruck {
    pub fn has_valid_slot(&self) -> bool {
        self.slot_start_minutes_from_now.is_finite()
            && self.slot_end_minutes_from_now.is_finite()
            && self.slot_end_minutes_from_now >= self.slot_start_minutes_from_now
    }

    pub fn is_expected_to_arrive(&self) -> bool {
        !self.is_already_in_terminal
    }
}
