//! Declarative view construction.
//!
//! Every renderer is a pure function from fetched data to a [`ViewDescriptor`]:
//! an element tree plus the table of events it reacts to. Nothing in here
//! knows about HTTP or HTML.

pub mod format;
pub mod home;
pub mod log_meal;
pub mod summary;
pub mod targets;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewId {
    Home,
    Log,
    Summary,
    Targets,
}

impl ViewId {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewId::Home => "home",
            ViewId::Log => "log",
            ViewId::Summary => "summary",
            ViewId::Targets => "targets",
        }
    }
}

/// Unknown names fall back to home.
impl From<&str> for ViewId {
    fn from(name: &str) -> Self {
        match name {
            "log" => ViewId::Log,
            "summary" => ViewId::Summary,
            "targets" => ViewId::Targets,
            _ => ViewId::Home,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Element(Element),
    Text { text: String },
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text { text } => out.push_str(text),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            id: None,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Boolean attribute such as `hidden` or `disabled`.
    pub fn with_flag(self, name: &str, on: bool) -> Self {
        if on { self.with_attr(name, "") } else { self }
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::text(text))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    pub fn find(&self, id: &str) -> Option<&Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            Node::Element(element) => element.find(id),
            Node::Text { .. } => None,
        })
    }

    pub fn find_by_class<'a>(&'a self, class: &str, out: &mut Vec<&'a Element>) {
        if self.has_class(class) {
            out.push(self);
        }
        for child in &self.children {
            if let Node::Element(element) = child {
                element.find_by_class(class, out);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Click,
    Submit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Action {
    Navigate(ViewId),
    SelectFood(String),
    SubmitMeal,
    SubmitTargets,
}

/// One row of a view's event table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binding {
    pub target: String,
    pub event: EventKind,
    pub action: Action,
}

impl Binding {
    pub fn click(target: impl Into<String>, action: Action) -> Self {
        Self {
            target: target.into(),
            event: EventKind::Click,
            action,
        }
    }

    pub fn submit(target: impl Into<String>, action: Action) -> Self {
        Self {
            target: target.into(),
            event: EventKind::Submit,
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewDescriptor {
    pub view: ViewId,
    pub root: Element,
    pub bindings: Vec<Binding>,
}

impl ViewDescriptor {
    pub fn binding_for(&self, target: &str, event: EventKind) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|binding| binding.target == target && binding.event == event)
    }

    pub fn find(&self, id: &str) -> Option<&Element> {
        self.root.find(id)
    }

    /// Text content of the slot with the given id.
    pub fn text(&self, id: &str) -> Option<String> {
        self.find(id).map(Element::text_content)
    }

    pub fn elements_with_class(&self, class: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        self.root.find_by_class(class, &mut out);
        out
    }
}

/// A user interaction reported by whatever is presenting the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiEvent {
    pub target: String,
    pub kind: EventKind,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl UiEvent {
    pub fn click(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            kind: EventKind::Click,
            fields: BTreeMap::new(),
        }
    }

    pub fn submit<K, V>(target: impl Into<String>, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            target: target.into(),
            kind: EventKind::Submit,
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
