//! Order confirmation view

use libstorefront::AppEvent;

use crate::dom::{Fragment, Node, TemplateRegistry, ViewResult};
use crate::views::View;

/// Snapshot the success view renders from
#[derive(Debug, Clone, Copy, Default)]
pub struct SuccessData {
    pub total: u64,
}

pub struct SuccessView {
    fragment: Fragment,
}

impl SuccessView {
    /// # Errors
    ///
    /// Fails if the success template is missing any element the view
    /// writes to.
    pub fn new(templates: &TemplateRegistry) -> ViewResult<Self> {
        let fragment =
            templates.fragment("success", &["success.description", "success.close"])?;
        Ok(Self { fragment })
    }

    /// The dismissal event
    pub fn dismiss(&self) -> AppEvent {
        AppEvent::SuccessDismissed
    }
}

impl View for SuccessView {
    type Data = SuccessData;

    fn render(&mut self, data: &Self::Data) {
        self.fragment.set_text(
            "success.description",
            format!("Debited {} synapses", data.total),
        );
    }

    fn root(&self) -> &Node {
        self.fragment.root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::builtin_templates;

    #[test]
    fn test_renders_debited_total() {
        let mut success = SuccessView::new(&builtin_templates()).unwrap();
        success.render(&SuccessData { total: 1450 });
        assert_eq!(
            success.root().find("success.description").unwrap().text(),
            "Debited 1450 synapses"
        );
        assert_eq!(success.dismiss(), AppEvent::SuccessDismissed);
    }
}
