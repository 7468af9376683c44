use super::format::number;
use super::{Action, Binding, Element, ViewDescriptor, ViewId};
use crate::errors::ClientError;
use crate::models::{Catalog, Nutrient};
use crate::state::Selection;

pub const FORM_ID: &str = "log-meal-form";
pub const AMOUNT_FIELD: &str = "amount";
pub const SELECT_FIRST: &str = "Please select a food first!";
pub const INVALID_AMOUNT: &str = "Please enter a valid amount!";

pub fn build(catalog: &Catalog, selection: Option<&Selection>, submitting: bool) -> ViewDescriptor {
    let selected = selection.map(|s| s.name.as_str());
    let mut grid = Element::new("div")
        .with_id("log-food-grid")
        .with_class("food-grid");
    let mut bindings = Vec::with_capacity(catalog.len() + 1);

    for (index, (name, item)) in catalog.iter().enumerate() {
        let id = format!("food-{index}");
        let mut button = Element::new("button")
            .with_id(id.clone())
            .with_class("food-button")
            .with_attr("data-food", name.as_str());
        if selected == Some(name.as_str()) {
            button = button.with_class("selected");
        }
        grid = grid.with_child(
            button
                .with_child(Element::new("div").with_class("food-name").with_text(name.as_str()))
                .with_child(Element::new("div").with_class("food-portion").with_text(format!(
                    "{} {}",
                    number(item.standard_amount),
                    item.standard_unit
                ))),
        );
        bindings.push(Binding::click(id, Action::SelectFood(name.clone())));
    }

    bindings.push(Binding::submit(FORM_ID, Action::SubmitMeal));

    ViewDescriptor {
        view: ViewId::Log,
        root: Element::new("div")
            .with_id("view-log")
            .with_child(grid)
            .with_child(form(selection, submitting)),
        bindings,
    }
}

fn form(selection: Option<&Selection>, submitting: bool) -> Element {
    let (name, unit, amount) = match selection {
        Some(s) => (s.name.as_str(), s.item.standard_unit.as_str(), s.amount.as_str()),
        None => ("", "", ""),
    };

    let mut info = Element::new("div").with_id("log-food-info");
    if let Some(selection) = selection {
        for nutrient in Nutrient::ALL {
            info = info.with_child(Element::new("div").with_text(format!(
                "{}: {}{}",
                nutrient.key(),
                number(selection.item.per_standard.get(nutrient)),
                nutrient.unit()
            )));
        }
    }

    Element::new("form")
        .with_id(FORM_ID)
        .with_flag("hidden", selection.is_none())
        .with_child(Element::new("h3").with_id("log-food-name").with_text(name))
        .with_child(
            Element::new("label")
                .with_child(
                    Element::new("input")
                        .with_id("log-food-amount")
                        .with_attr("type", "number")
                        .with_attr("step", "any")
                        .with_attr("name", AMOUNT_FIELD)
                        .with_attr("value", amount)
                        .with_attr("placeholder", format!("Amount in {unit}")),
                )
                .with_child(Element::new("span").with_id("log-food-unit").with_text(unit)),
        )
        .with_child(info)
        .with_child(
            Element::new("button")
                .with_id("log-submit")
                .with_attr("type", "submit")
                .with_flag("disabled", submitting)
                .with_text("Log Meal"),
        )
}

/// Parse the amount input; only finite positive numbers pass.
pub fn parse_amount(raw: &str) -> Result<f64, ClientError> {
    match raw.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(ClientError::validation(INVALID_AMOUNT)),
    }
}
