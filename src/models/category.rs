//! Expense categories and payment sources
//!
//! Both are closed enumerations: unknown labels are rejected rather than
//! stored, which is what the import validation relies on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Generates the category enum together with its label table
macro_rules! define_categories {
    ($($variant:ident => $label:literal),+ $(,)?) => {
        /// Spending category of an expense entry
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum Category {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl Category {
            /// Every category, in display order
            pub const ALL: &'static [Category] = &[$(Category::$variant),+];

            /// The user-facing label, also used in CSV and JSON
            pub const fn label(&self) -> &'static str {
                match self {
                    $(Category::$variant => $label,)+
                }
            }
        }
    };
}

define_categories! {
    FoodShopping => "Food shopping",
    Lunch => "Lunch",
    Bills => "Bills",
    Gas => "Gas",
    GasService => "Gas Service",
    InternetPhoneTv => "Internet, phone, TV",
    Security => "Security",
    Electricity => "Electricity",
    Water => "Water",
    Subscriptions => "Subscriptions",
    Petrol => "Petrol",
    Transport => "Transport",
    Holiday => "Holiday",
    Entertainment => "Entertainment",
    Home => "Home",
    Car => "Car",
    Oskar => "Oskar",
    Mia => "Mia",
    Mortgage => "Mortgage",
    Sports => "Sports",
    Beauty => "Beauty",
    Gifts => "Gifts",
    Clothes => "Clothes",
    Miscellaneous => "Miscellaneous",
    Health => "Health",
    Alcohol => "Alcohol",
    EatingOut => "Eating out",
    Takeaway => "Takeaway",
}

impl Category {
    /// Look up a category by its exact label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label)
    }

    /// Membership test for the closed category set
    pub fn is_known(label: &str) -> bool {
        Self::from_label(label).is_some()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| UnknownValue {
            kind: "category",
            value: s.to_string(),
        })
    }
}

/// Which household account paid for an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSource {
    CreditCard,
    JointAccount,
}

impl PaymentSource {
    pub const ALL: &'static [PaymentSource] =
        &[PaymentSource::CreditCard, PaymentSource::JointAccount];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::JointAccount => "joint_account",
        }
    }

    /// Human-readable name for terminal output
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::CreditCard => "Credit card",
            Self::JointAccount => "Joint account",
        }
    }

    pub fn is_known(value: &str) -> bool {
        value.parse::<Self>().is_ok()
    }
}

impl fmt::Display for PaymentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentSource {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownValue {
                kind: "payment source",
                value: s.to_string(),
            })
    }
}

/// A label outside one of the closed enumerations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown {}: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownValue {}
