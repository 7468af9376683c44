use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One of the four tracked nutrient dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Nutrient {
    Calories,
    Protein,
    Fat,
    Carbs,
}

impl Nutrient {
    pub const ALL: [Nutrient; 4] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Fat,
        Nutrient::Carbs,
    ];

    /// Wire key, also used for slot ids and form field names.
    pub fn key(self) -> &'static str {
        match self {
            Nutrient::Calories => "Calories",
            Nutrient::Protein => "Protein",
            Nutrient::Fat => "Fat",
            Nutrient::Carbs => "Carbs",
        }
    }

    /// Display suffix. Calories are unit-less.
    pub fn unit(self) -> &'static str {
        match self {
            Nutrient::Calories => "",
            _ => "g",
        }
    }
}

/// The four-key record shared by targets, totals and per-food values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Macros {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

impl Macros {
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Fat => self.fat,
            Nutrient::Carbs => self.carbs,
        }
    }

    pub fn set(&mut self, nutrient: Nutrient, value: f64) {
        match nutrient {
            Nutrient::Calories => self.calories = value,
            Nutrient::Protein => self.protein = value,
            Nutrient::Fat => self.fat = value,
            Nutrient::Carbs => self.carbs = value,
        }
    }
}

pub type Targets = Macros;
pub type SummaryTotals = Macros;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FoodItem {
    pub standard_amount: f64,
    pub standard_unit: String,
    #[serde(flatten)]
    pub per_standard: Macros,
}

/// Food name to item, ordered by name.
pub type Catalog = BTreeMap<String, FoodItem>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogEntry {
    pub food: String,
    pub amount: f64,
    pub unit: String,
    pub time: String,
    pub calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub totals: SummaryTotals,
    pub targets: Targets,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogMealRequest {
    pub food_name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: String,
}
