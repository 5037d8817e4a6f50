//! Render target for the view layer
//!
//! Views never touch the terminal directly. Each one owns a `Node`
//! fragment cloned from a named template and mutates it through a small
//! capability set: text, attributes, visibility, enablement, children.
//! The renderer (see `ui`) walks the finished tree; swapping it out or
//! running the views headlessly in tests needs nothing else.
//!
//! Missing templates and missing required elements are construction-time
//! errors. Views verify every key they will ever touch up front and
//! fail fast; render-time lookups cannot miss afterwards.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

pub type ViewResult<T> = std::result::Result<T, ViewError>;

/// Fatal view-construction failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Missing template: '{0}'")]
    MissingTemplate(String),

    #[error("Missing element '{key}' in template '{template}'")]
    MissingElement { template: String, key: String },
}

/// One element of a view fragment
///
/// `key` is the lookup hook (the analog of a selector); `tag` is a
/// rendering hint for the terminal renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    tag: String,
    key: Option<String>,
    text: String,
    attrs: BTreeMap<String, String>,
    hidden: bool,
    disabled: bool,
    children: Vec<Node>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            key: None,
            text: String::new(),
            attrs: BTreeMap::new(),
            hidden: false,
            disabled: false,
            children: Vec::new(),
        }
    }

    pub fn keyed(tag: impl Into<String>, key: impl Into<String>) -> Self {
        let mut node = Self::new(tag);
        node.key = Some(key.into());
        node
    }

    // Builder helpers for template construction

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    // Capability set used by views at render time

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.remove(name);
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn replace_children(&mut self, children: Vec<Node>) {
        self.children = children;
    }

    /// Depth-first lookup by key
    pub fn find(&self, key: &str) -> Option<&Node> {
        if self.key.as_deref() == Some(key) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(key))
    }

    /// Depth-first mutable lookup by key
    pub fn find_mut(&mut self, key: &str) -> Option<&mut Node> {
        if self.key.as_deref() == Some(key) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(key))
    }
}

/// A view-owned fragment with infallible render-time accessors
///
/// Constructed through `TemplateRegistry::fragment`, which verifies all
/// required keys; after that, a miss in the setters below is unreachable
/// and silently ignored.
#[derive(Debug, Clone)]
pub struct Fragment {
    template: String,
    root: Node,
}

impl Fragment {
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn set_text(&mut self, key: &str, text: impl Into<String>) {
        if let Some(node) = self.root.find_mut(key) {
            node.set_text(text);
        }
    }

    pub fn set_attr(&mut self, key: &str, name: &str, value: impl Into<String>) {
        if let Some(node) = self.root.find_mut(key) {
            node.set_attr(name, value);
        }
    }

    pub fn remove_attr(&mut self, key: &str, name: &str) {
        if let Some(node) = self.root.find_mut(key) {
            node.remove_attr(name);
        }
    }

    pub fn set_hidden(&mut self, key: &str, hidden: bool) {
        if let Some(node) = self.root.find_mut(key) {
            node.set_hidden(hidden);
        }
    }

    pub fn set_disabled(&mut self, key: &str, disabled: bool) {
        if let Some(node) = self.root.find_mut(key) {
            node.set_disabled(disabled);
        }
    }

    pub fn replace_children(&mut self, key: &str, children: Vec<Node>) {
        if let Some(node) = self.root.find_mut(key) {
            node.replace_children(children);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.root.find(key)
    }
}

/// Named template fragments the views are instantiated from
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Node>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, template: Node) {
        self.templates.insert(name.into(), template);
    }

    /// Clone a template by name
    ///
    /// # Errors
    ///
    /// `MissingTemplate` if no template of that name is registered.
    pub fn clone_template(&self, name: &str) -> ViewResult<Node> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| ViewError::MissingTemplate(name.to_string()))
    }

    /// Instantiate a fragment, verifying every key the view requires
    ///
    /// # Errors
    ///
    /// `MissingTemplate` if the template does not exist;
    /// `MissingElement` for the first required key absent from it.
    /// Either is fatal to the component's construction.
    pub fn fragment(&self, name: &str, required: &[&str]) -> ViewResult<Fragment> {
        let root = self.clone_template(name)?;
        for key in required {
            if root.find(key).is_none() {
                return Err(ViewError::MissingElement {
                    template: name.to_string(),
                    key: (*key).to_string(),
                });
            }
        }
        Ok(Fragment {
            template: name.to_string(),
            root,
        })
    }
}

/// The storefront's built-in template set
pub fn builtin_templates() -> TemplateRegistry {
    let mut registry = TemplateRegistry::new();

    registry.register(
        "gallery-card",
        Node::keyed("article", "card")
            .with_child(Node::keyed("span", "card.category"))
            .with_child(Node::keyed("h2", "card.title"))
            .with_child(Node::keyed("img", "card.image"))
            .with_child(Node::keyed("span", "card.price")),
    );

    registry.register(
        "preview-card",
        Node::keyed("article", "card")
            .with_child(Node::keyed("img", "card.image"))
            .with_child(Node::keyed("span", "card.category"))
            .with_child(Node::keyed("h2", "card.title"))
            .with_child(Node::keyed("p", "card.description"))
            .with_child(Node::keyed("button", "card.button"))
            .with_child(Node::keyed("span", "card.price")),
    );

    registry.register(
        "basket",
        Node::keyed("div", "basket")
            .with_child(Node::keyed("h2", "basket.title").with_text("Basket"))
            .with_child(Node::keyed("ul", "basket.list"))
            .with_child(Node::keyed("button", "basket.button").with_text("Place order"))
            .with_child(Node::keyed("span", "basket.total")),
    );

    registry.register(
        "basket-row",
        Node::keyed("li", "row")
            .with_child(Node::keyed("span", "row.index"))
            .with_child(Node::keyed("span", "row.title"))
            .with_child(Node::keyed("span", "row.price"))
            .with_child(Node::keyed("button", "row.delete").with_text("Delete")),
    );

    registry.register(
        "order-form",
        Node::keyed("form", "order")
            .with_child(Node::keyed("button", "order.payment-card").with_text("Card"))
            .with_child(Node::keyed("button", "order.payment-cash").with_text("Cash"))
            .with_child(Node::keyed("input", "order.address").with_attr("label", "Address"))
            .with_child(Node::keyed("span", "order.errors"))
            .with_child(Node::keyed("button", "order.submit").with_text("Next")),
    );

    registry.register(
        "contacts-form",
        Node::keyed("form", "contacts")
            .with_child(Node::keyed("input", "contacts.email").with_attr("label", "Email"))
            .with_child(Node::keyed("input", "contacts.phone").with_attr("label", "Phone"))
            .with_child(Node::keyed("span", "contacts.errors"))
            .with_child(Node::keyed("button", "contacts.submit").with_text("Pay")),
    );

    registry.register(
        "success",
        Node::keyed("div", "success")
            .with_child(Node::keyed("h2", "success.title").with_text("Order placed"))
            .with_child(Node::keyed("p", "success.description"))
            .with_child(Node::keyed("button", "success.close").with_text("Back to shopping")),
    );

    registry.register(
        "page",
        Node::keyed("div", "page")
            .with_child(
                Node::keyed("header", "page.header")
                    .with_child(Node::keyed("h1", "page.title").with_text("Storefront"))
                    .with_child(Node::keyed("span", "page.basket-counter").with_text("0")),
            )
            .with_child(Node::keyed("main", "page.gallery")),
    );

    registry.register(
        "modal",
        Node::keyed("div", "modal").with_child(Node::keyed("div", "modal.content")),
    );

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_is_depth_first() {
        let tree = Node::keyed("div", "root")
            .with_child(Node::keyed("div", "inner").with_child(Node::keyed("span", "leaf")))
            .with_child(Node::keyed("span", "sibling"));

        assert!(tree.find("leaf").is_some());
        assert!(tree.find("sibling").is_some());
        assert!(tree.find("absent").is_none());
    }

    #[test]
    fn test_fragment_requires_all_keys() {
        let registry = builtin_templates();

        let ok = registry.fragment("basket", &["basket.list", "basket.total"]);
        assert!(ok.is_ok());

        let missing = registry.fragment("basket", &["basket.list", "basket.discount"]);
        assert_eq!(
            missing.unwrap_err(),
            ViewError::MissingElement {
                template: "basket".to_string(),
                key: "basket.discount".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_template_is_fatal() {
        let registry = builtin_templates();
        assert_eq!(
            registry.fragment("wishlist", &[]).unwrap_err(),
            ViewError::MissingTemplate("wishlist".to_string())
        );
    }

    #[test]
    fn test_fragment_mutation_does_not_touch_template() {
        let registry = builtin_templates();
        let mut fragment = registry.fragment("basket", &["basket.total"]).unwrap();

        fragment.set_text("basket.total", "300 synapses");
        assert_eq!(
            fragment.get("basket.total").unwrap().text(),
            "300 synapses"
        );

        // A second clone starts clean.
        let fresh = registry.fragment("basket", &["basket.total"]).unwrap();
        assert_eq!(fresh.get("basket.total").unwrap().text(), "");
    }

    #[test]
    fn test_replace_children() {
        let registry = builtin_templates();
        let mut fragment = registry.fragment("basket", &["basket.list"]).unwrap();

        let rows = vec![Node::new("li").with_text("row 1"), Node::new("li").with_text("row 2")];
        fragment.replace_children("basket.list", rows);

        assert_eq!(fragment.get("basket.list").unwrap().children().len(), 2);
    }

    #[test]
    fn test_builtin_templates_complete() {
        let registry = builtin_templates();
        for name in [
            "gallery-card",
            "preview-card",
            "basket",
            "basket-row",
            "order-form",
            "contacts-form",
            "success",
            "page",
            "modal",
        ] {
            assert!(registry.clone_template(name).is_ok(), "missing: {}", name);
        }
    }
}
