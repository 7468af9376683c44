use super::format::number;
use super::{Action, Binding, Element, ViewDescriptor, ViewId};
use crate::errors::ClientError;
use crate::models::{Nutrient, Targets};
use std::collections::BTreeMap;

pub const FORM_ID: &str = "set-targets-form";

/// Inputs are pre-filled from `targets`; entries in `inputs` (the user's last
/// submitted text) take precedence.
pub fn build(
    targets: &Targets,
    inputs: &BTreeMap<String, String>,
    submitting: bool,
) -> ViewDescriptor {
    let mut form = Element::new("form").with_id(FORM_ID);
    for nutrient in Nutrient::ALL {
        let key = nutrient.key();
        let label = match nutrient.unit() {
            "" => key.to_string(),
            unit => format!("{key} ({unit})"),
        };
        let value = inputs
            .get(key)
            .cloned()
            .unwrap_or_else(|| number(targets.get(nutrient)));
        form = form.with_child(
            Element::new("label")
                .with_class("field")
                .with_child(Element::new("span").with_class("label").with_text(label))
                .with_child(
                    Element::new("input")
                        .with_id(format!("target-{key}"))
                        .with_attr("type", "number")
                        .with_attr("step", "any")
                        .with_attr("name", key)
                        .with_attr("value", value),
                ),
        );
    }
    form = form.with_child(
        Element::new("button")
            .with_id("targets-submit")
            .with_attr("type", "submit")
            .with_flag("disabled", submitting)
            .with_text("Save Targets"),
    );

    ViewDescriptor {
        view: ViewId::Targets,
        root: Element::new("div").with_id("view-targets").with_child(form),
        bindings: vec![Binding::submit(FORM_ID, Action::SubmitTargets)],
    }
}

/// Read all four fields. A missing field keeps its pre-filled value; any
/// field that is present must parse as a finite number.
pub fn parse_targets(
    fields: &BTreeMap<String, String>,
    prefill: Option<&Targets>,
) -> Result<Targets, ClientError> {
    let mut targets = Targets::default();
    for nutrient in Nutrient::ALL {
        let key = nutrient.key();
        let value = match fields.get(key) {
            Some(raw) => raw.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            None => prefill.map(|t| t.get(nutrient)),
        };
        let value = value.ok_or_else(|| {
            ClientError::validation(format!("Please enter a valid number for {key}!"))
        })?;
        targets.set(nutrient, value);
    }
    Ok(targets)
}
