//! Built-in node templates offered by the editor's "Add Nodes" palette.

use crate::models::NodeKind;

/// A reusable starting point for a new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeTemplate {
    pub kind: NodeKind,
    pub title: &'static str,
    pub description: &'static str,
}

impl NodeTemplate {
    /// Port counts for a node created from this template.
    ///
    /// Triggers start a flow and therefore take no input.
    pub fn default_ports(&self) -> (u32, u32) {
        match self.kind {
            NodeKind::Trigger => (0, 1),
            _ => (1, 1),
        }
    }

    /// Case-insensitive lookup by title.
    pub fn find(title: &str) -> Option<&'static NodeTemplate> {
        TEMPLATES.iter().find(|t| t.title.eq_ignore_ascii_case(title))
    }
}

pub const TEMPLATES: &[NodeTemplate] = &[
    NodeTemplate {
        kind: NodeKind::Trigger,
        title: "Webhook",
        description: "Receives data via HTTP",
    },
    NodeTemplate {
        kind: NodeKind::Trigger,
        title: "Timer",
        description: "Executes at intervals",
    },
    NodeTemplate {
        kind: NodeKind::Action,
        title: "Send Email",
        description: "Sends email notifications",
    },
    NodeTemplate {
        kind: NodeKind::Action,
        title: "Save to Database",
        description: "Stores data in database",
    },
    NodeTemplate {
        kind: NodeKind::Condition,
        title: "Filter",
        description: "Filters data based on conditions",
    },
    NodeTemplate {
        kind: NodeKind::Action,
        title: "Execute Code",
        description: "Executes custom code",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_have_no_input_port() {
        let webhook = NodeTemplate::find("webhook").expect("built-in template");
        assert_eq!(webhook.default_ports(), (0, 1));

        let filter = NodeTemplate::find("Filter").expect("built-in template");
        assert_eq!(filter.kind, NodeKind::Condition);
        assert_eq!(filter.default_ports(), (1, 1));
    }

    #[test]
    fn unknown_title_is_none() {
        assert!(NodeTemplate::find("Teleport").is_none());
    }
}
