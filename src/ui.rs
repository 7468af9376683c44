use crate::navigator::{BACK_BUTTON_ID, Snapshot};
use crate::views::{Element, EventKind, Node, ViewDescriptor};

const CLICK_FORM_ID: &str = "ui-click";

pub fn render_index(date: &str, snapshot: &Snapshot) -> String {
    let view = snapshot
        .view
        .as_ref()
        .map(render_view)
        .unwrap_or_else(|| r#"<p class="hint">Nothing to show yet.</p>"#.to_string());

    fill_template(INDEX_HTML, |slot| match slot {
        "DATE" => Some(escape(date)),
        "BACK" => Some(back_button(snapshot.back_visible)),
        "MESSAGE" => Some(escape(&snapshot.message)),
        "VIEW" => Some(view.clone()),
        _ => None,
    })
}

/// Substitute `{{NAME}}` slots in one pass; substituted text is never rescanned.
fn fill_template(template: &str, slot: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let filled = after
            .find("}}")
            .and_then(|end| slot(&after[..end]).map(|value| (end, value)));
        match filled {
            Some((end, value)) => {
                out.push_str(&value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn render_view(view: &ViewDescriptor) -> String {
    let mut out = String::new();
    render_element(&view.root, view, &mut out);
    out
}

fn back_button(visible: bool) -> String {
    let hidden = if visible { "" } else { " hidden" };
    format!(
        r#"<button id="{BACK_BUTTON_ID}" class="btn-back" type="submit" form="{CLICK_FORM_ID}" name="target" value="{BACK_BUTTON_ID}"{hidden}>&larr; Back</button>"#
    )
}

fn render_element(element: &Element, view: &ViewDescriptor, out: &mut String) {
    out.push('<');
    out.push_str(element.tag);
    if let Some(id) = &element.id {
        push_attr(out, "id", id);
    }
    if !element.classes.is_empty() {
        push_attr(out, "class", &element.classes.join(" "));
    }
    for (name, value) in &element.attrs {
        push_attr(out, name, value);
    }

    let id = element.id.as_deref().unwrap_or_default();
    let clickable = view.binding_for(id, EventKind::Click).is_some();
    let submittable = view.binding_for(id, EventKind::Submit).is_some();
    if clickable {
        push_attr(out, "type", "submit");
        push_attr(out, "form", CLICK_FORM_ID);
        push_attr(out, "name", "target");
        push_attr(out, "value", id);
    }
    if submittable {
        push_attr(out, "method", "post");
        push_attr(out, "action", "/events/submit");
    }
    out.push('>');

    if is_void(element.tag) {
        return;
    }
    if submittable {
        out.push_str(r#"<input type="hidden" name="target""#);
        push_attr(out, "value", id);
        out.push('>');
    }
    for child in &element.children {
        match child {
            Node::Element(child) => render_element(child, view, out),
            Node::Text { text } => out.push_str(&escape(text)),
        }
    }
    out.push_str("</");
    out.push_str(element.tag);
    out.push('>');
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    if !value.is_empty() {
        out.push_str("=\"");
        out.push_str(&escape(value));
        out.push('"');
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "input" | "br" | "hr" | "img")
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>PANDA Nutrition Tracker</title>
  <style>
    :root {
      --bg-1: #eef6ec;
      --bg-2: #cfe8c9;
      --ink: #22302a;
      --accent: #2f9e5b;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #f4fbf2 60%, #ffffff 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    h1 {
      font-family: "Georgia", serif;
      margin: 0;
    }

    .subtitle, .hint {
      margin: 0;
      color: #5f6b63;
    }

    .status {
      padding: 12px 16px;
      border-radius: 16px;
      background: white;
      min-height: 1.2em;
    }

    .panel, .actions, .food-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 14px;
    }

    .stat, .progress, .log-entry {
      background: white;
      border-radius: 18px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 6px;
    }

    .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #7b857d;
    }

    .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 14px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button[disabled] {
      opacity: 0.5;
      cursor: wait;
    }

    .btn-back {
      background: var(--accent-2);
    }

    .food-button {
      background: white;
      color: var(--ink);
      border: 2px solid #e2e8e4;
      border-radius: 14px;
      text-align: left;
    }

    .food-button.selected {
      border-color: var(--accent);
      background: #eef9f1;
    }

    .food-portion {
      font-size: 0.8rem;
      color: #6b756f;
    }

    form {
      display: grid;
      gap: 12px;
    }

    input {
      padding: 10px 12px;
      border-radius: 10px;
      border: 1px solid #cfd8d2;
      font-size: 1rem;
    }

    .progress-header, .log-entry {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    .track {
      width: 100%;
      height: 12px;
      border-radius: 999px;
      background: #e4ebe6;
    }

    .fill {
      height: 12px;
      border-radius: 999px;
      background: var(--accent);
    }

    .kcal {
      font-weight: 700;
      color: var(--accent);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <div>
        <h1>PANDA</h1>
        <p class="subtitle">{{DATE}}</p>
      </div>
      {{BACK}}
    </header>
    <p id="panda-message" class="status">{{MESSAGE}}</p>
    <form id="ui-click" method="post" action="/events/click"></form>
    <section id="main-content">{{VIEW}}</section>
  </main>
</body>
</html>
"#;
