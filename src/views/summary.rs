use super::format::{number, progress_percent, whole, with_unit};
use super::{Element, ViewDescriptor, ViewId};
use crate::models::{LogEntry, Nutrient, Summary};

pub const EMPTY_LOG: &str = "No meals logged yet today.";

pub fn build(summary: &Summary) -> ViewDescriptor {
    let mut bars = Element::new("div").with_id("summary-progress-bars");
    for nutrient in Nutrient::ALL {
        bars = bars.with_child(progress(
            nutrient,
            summary.totals.get(nutrient),
            summary.targets.get(nutrient),
        ));
    }

    let mut list = Element::new("div").with_id("summary-log-list");
    if summary.logs.is_empty() {
        list = list.with_child(
            Element::new("div")
                .with_id("summary-log-empty")
                .with_class("hint")
                .with_text(EMPTY_LOG),
        );
    } else {
        // server order, not re-sorted
        for (index, entry) in summary.logs.iter().enumerate() {
            list = list.with_child(log_row(index, entry));
        }
    }

    ViewDescriptor {
        view: ViewId::Summary,
        root: Element::new("div")
            .with_id("view-summary")
            .with_child(bars)
            .with_child(list),
        bindings: Vec::new(),
    }
}

fn progress(nutrient: Nutrient, current: f64, target: f64) -> Element {
    let key = nutrient.key();
    let percent = number(progress_percent(current, target));
    let label = format!(
        "{} / {}",
        with_unit(whole(current), nutrient),
        with_unit(number(target), nutrient)
    );

    Element::new("div")
        .with_id(format!("progress-{key}"))
        .with_class("progress")
        .with_child(
            Element::new("div")
                .with_class("progress-header")
                .with_child(Element::new("span").with_class("label").with_text(key))
                .with_child(
                    Element::new("span")
                        .with_id(format!("progress-{key}-label"))
                        .with_text(label),
                ),
        )
        .with_child(
            Element::new("div").with_class("track").with_child(
                Element::new("div")
                    .with_id(format!("progress-{key}-bar"))
                    .with_class("fill")
                    .with_attr("data-percent", percent.as_str())
                    .with_attr("style", format!("width: {percent}%")),
            ),
        )
}

fn log_row(index: usize, entry: &LogEntry) -> Element {
    Element::new("div")
        .with_id(format!("log-entry-{index}"))
        .with_class("log-entry")
        .with_child(
            Element::new("div")
                .with_child(Element::new("div").with_class("food-name").with_text(entry.food.as_str()))
                .with_child(Element::new("div").with_class("food-portion").with_text(format!(
                    "{} {} • {}",
                    number(entry.amount),
                    entry.unit,
                    entry.time
                ))),
        )
        .with_child(
            Element::new("div")
                .with_class("kcal")
                .with_text(format!("{} kcal", whole(entry.calories))),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Macros;

    fn summary(logs: Vec<LogEntry>) -> Summary {
        Summary {
            totals: Macros {
                calories: 1200.0,
                protein: 50.0,
                fat: 80.0,
                carbs: 120.0,
            },
            targets: Macros {
                calories: 2000.0,
                protein: 100.0,
                fat: 70.0,
                carbs: 0.0,
            },
            logs,
        }
    }

    fn bar_width(view: &ViewDescriptor, key: &str) -> String {
        view.find(&format!("progress-{key}-bar"))
            .and_then(|bar| bar.attr("style"))
            .unwrap()
            .to_string()
    }

    #[test]
    fn bars_are_sized_and_clamped() {
        let view = build(&summary(Vec::new()));
        assert_eq!(bar_width(&view, "Calories"), "width: 60%");
        assert_eq!(bar_width(&view, "Protein"), "width: 50%");
        assert_eq!(bar_width(&view, "Fat"), "width: 100%");
        assert_eq!(bar_width(&view, "Carbs"), "width: 0%");
    }

    #[test]
    fn labels_show_rounded_current_and_raw_target() {
        let view = build(&summary(Vec::new()));
        assert_eq!(view.text("progress-Calories-label").unwrap(), "1200 / 2000");
        assert_eq!(view.text("progress-Protein-label").unwrap(), "50g / 100g");
    }

    #[test]
    fn empty_log_shows_single_line() {
        let view = build(&summary(Vec::new()));
        let list = view.find("summary-log-list").unwrap();
        assert_eq!(list.children.len(), 1);
        assert_eq!(view.text("summary-log-empty").unwrap(), EMPTY_LOG);
    }

    #[test]
    fn log_rows_keep_server_order() {
        let entry = |food: &str, time: &str| LogEntry {
            food: food.to_string(),
            amount: 2.5,
            unit: "cup".to_string(),
            time: time.to_string(),
            calories: 374.6,
        };
        let view = build(&summary(vec![entry("Oats", "09:00:00"), entry("Milk", "08:00:00")]));
        assert!(view.find("summary-log-empty").is_none());
        assert_eq!(
            view.text("log-entry-0").unwrap(),
            "Oats2.5 cup • 09:00:00375 kcal"
        );
        assert!(view.text("log-entry-1").unwrap().starts_with("Milk"));
    }
}
