use crate::models::{Catalog, FoodItem, Targets};
use crate::navigator::Navigator;
use crate::views::format::number;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Shared handle for the UI shell's handlers.
#[derive(Clone)]
pub struct AppState {
    pub navigator: Arc<Navigator>,
}

impl AppState {
    pub fn new(navigator: Navigator) -> Self {
        Self {
            navigator: Arc::new(navigator),
        }
    }
}

/// The food picked in the LogMeal view, paired with the pending amount input.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub name: String,
    pub item: FoodItem,
    pub amount: String,
}

/// In-memory snapshot of what the backend last told us, plus the user's
/// pending form input.
///
/// Fetched fields are replaced wholesale when a fetch succeeds, never merged.
#[derive(Debug, Default)]
pub struct Session {
    pub foods: Catalog,
    pub targets: Option<Targets>,
    pub selection: Option<Selection>,
    /// Raw SetTargets inputs from the last submit, keyed by nutrient.
    pub target_inputs: BTreeMap<String, String>,
    pub submitting: bool,
}

impl Session {
    pub fn replace_foods(&mut self, foods: Catalog) {
        self.foods = foods;
        self.selection = None;
    }

    /// Select a catalog entry and pre-fill its standard amount. Unknown names
    /// leave the current selection untouched.
    pub fn select_food(&mut self, name: &str) -> Option<&Selection> {
        let item = self.foods.get(name)?.clone();
        self.selection = Some(Selection {
            name: name.to_string(),
            amount: number(item.standard_amount),
            item,
        });
        self.selection.as_ref()
    }

    /// Forget pending input; called whenever a view is installed.
    pub fn clear_drafts(&mut self) {
        self.selection = None;
        self.target_inputs.clear();
    }
}
