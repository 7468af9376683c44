use super::format::{number, whole, with_unit};
use super::{Action, Binding, Element, ViewDescriptor, ViewId};
use crate::models::{Nutrient, Summary};

const NAV: [(ViewId, &str); 3] = [
    (ViewId::Log, "Log a Meal"),
    (ViewId::Summary, "Today's Summary"),
    (ViewId::Targets, "Set Targets"),
];

pub fn build(summary: &Summary) -> ViewDescriptor {
    let mut panel = Element::new("section").with_class("panel");
    for nutrient in Nutrient::ALL {
        let key = nutrient.key();
        panel = panel.with_child(
            Element::new("div")
                .with_class("stat")
                .with_child(Element::new("span").with_class("label").with_text(key))
                .with_child(
                    Element::new("span")
                        .with_id(format!("home-total-{key}"))
                        .with_class("value")
                        .with_text(with_unit(whole(summary.totals.get(nutrient)), nutrient)),
                )
                .with_child(
                    Element::new("span")
                        .with_id(format!("home-target-{key}"))
                        .with_class("target")
                        .with_text(format!(
                            "of {}",
                            with_unit(number(summary.targets.get(nutrient)), nutrient)
                        )),
                ),
        );
    }

    let mut actions = Element::new("section").with_class("actions");
    let mut bindings = Vec::with_capacity(NAV.len());
    for (view, label) in NAV {
        let id = format!("nav-{}", view.as_str());
        actions = actions.with_child(
            Element::new("button")
                .with_id(id.clone())
                .with_class("nav-button")
                .with_attr("data-view", view.as_str())
                .with_text(label),
        );
        bindings.push(Binding::click(id, Action::Navigate(view)));
    }

    ViewDescriptor {
        view: ViewId::Home,
        root: Element::new("div")
            .with_id("view-home")
            .with_child(panel)
            .with_child(actions),
        bindings,
    }
}
