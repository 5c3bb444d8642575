use eframe::egui::{self, RichText, Ui};

use crate::markdown::MarkdownConverter;
use crate::taxonomy::{Component, NodeRecord};

use super::{FrameClick, ViewModel};

/// Documentation panel state machine. The panel owns its state explicitly;
/// there are no ambient document listeners. Close suppression for anchor
/// clicks is carried by the click target itself rather than a shared flag.
#[derive(Default)]
pub(super) struct DocPanel {
    state: PanelState,
}

#[derive(Default)]
enum PanelState {
    #[default]
    Closed,
    Open {
        node_id: String,
        markup: String,
        badges: Vec<Badge>,
    },
}

pub(super) struct Badge {
    pub(super) name: String,
    pub(super) url: String,
}

/// What a primary click landed on, classified once per click by the view.
pub(super) enum ClickTarget<'a> {
    Node(&'a NodeRecord),
    /// An anchor inside the open panel. The link opens in a new viewing
    /// context elsewhere; the panel ignores this click only.
    Anchor,
    Elsewhere,
}

impl DocPanel {
    pub(super) fn is_open(&self) -> bool {
        matches!(self.state, PanelState::Open { .. })
    }

    pub(super) fn open_node_id(&self) -> Option<&str> {
        match &self.state {
            PanelState::Open { node_id, .. } => Some(node_id),
            PanelState::Closed => None,
        }
    }

    pub(super) fn handle_click(&mut self, target: ClickTarget<'_>, markdown: &dyn MarkdownConverter) {
        match target {
            ClickTarget::Node(node) => {
                // A node with documentation opens (or switches) the panel; a
                // node without behaves like any other click and closes it.
                if !self.open_for(node, markdown) {
                    self.close();
                }
            }
            ClickTarget::Anchor => {}
            ClickTarget::Elsewhere => self.close(),
        }
    }

    fn open_for(&mut self, node: &NodeRecord, markdown: &dyn MarkdownConverter) -> bool {
        let Some(component) = &node.component else {
            return false;
        };

        let badges = component
            .badges()
            .map(|(name, url)| Badge {
                name: name.to_owned(),
                url: url.to_owned(),
            })
            .collect();

        self.state = PanelState::Open {
            node_id: node.id.clone(),
            markup: markdown.convert(&compose_doc(component)),
            badges,
        };
        true
    }

    pub(super) fn close(&mut self) {
        self.state = PanelState::Closed;
    }
}

/// Badge line for the head of the composed documentation.
fn format_badge(name: &str, link: &str) -> String {
    format!("[![{name}](https://img.shields.io/badge/{name}-{link}-blue.svg)]({link})\n")
}

/// Composes the panel source string: badge lines are prepended one by one
/// (so they end up in reverse declaration order) and the `content` body is
/// appended after a newline. Badges always precede the body.
fn compose_doc(component: &Component) -> String {
    let mut content = String::new();

    for (name, url) in component.badges() {
        content = format_badge(name, url) + &content;
    }

    if let Some(body) = component.body() {
        content.push('\n');
        content.push_str(body);
    }

    content
}

impl ViewModel {
    pub(super) fn draw_doc_panel(&mut self, ui: &mut Ui) {
        let PanelState::Open {
            node_id,
            markup,
            badges,
        } = &self.panel.state
        else {
            return;
        };

        let heading = self
            .graph
            .node(node_id)
            .map(NodeRecord::display_label)
            .unwrap_or(node_id.as_str());
        ui.heading(heading);
        ui.small(node_id.as_str());
        ui.add_space(6.0);

        let mut anchor_clicked = false;
        for badge in badges {
            let response = ui.link(&badge.name).on_hover_text(&badge.url);
            if response.clicked() {
                ui.ctx().open_url(egui::OpenUrl::new_tab(&badge.url));
                anchor_clicked = true;
            }
        }

        if !badges.is_empty() {
            ui.separator();
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new(markup.as_str()).monospace());
            });

        if anchor_clicked {
            self.frame_click = Some(FrameClick::Anchor);
        }
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;

    /// Converter stub that wraps its input, so tests can see exactly what
    /// string the panel handed over.
    struct Tagging;

    impl MarkdownConverter for Tagging {
        fn convert(&self, text: &str) -> String {
            format!("<md>{text}</md>")
        }
    }

    fn node(id: &str, entries: &[(&str, &str)]) -> NodeRecord {
        let component = if entries.is_empty() {
            None
        } else {
            Some(Component {
                entries: entries
                    .iter()
                    .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                    .collect::<IndexMap<_, _>>(),
            })
        };

        NodeRecord {
            id: id.to_owned(),
            level: 1,
            label: None,
            icon: None,
            component,
        }
    }

    #[test]
    fn badge_precedes_body_in_the_composed_string() {
        let documented = node("api", &[("content", "hello"), ("docs", "http://x")]);
        let composed = compose_doc(documented.component.as_ref().unwrap());

        assert_eq!(
            composed,
            "[![docs](https://img.shields.io/badge/docs-http://x-blue.svg)](http://x)\n\nhello"
        );
    }

    #[test]
    fn later_badges_are_prepended() {
        let documented = node("api", &[("first", "http://1"), ("second", "http://2")]);
        let composed = compose_doc(documented.component.as_ref().unwrap());

        let first_at = composed.find("badge/first").unwrap();
        let second_at = composed.find("badge/second").unwrap();
        assert!(second_at < first_at);
    }

    #[test]
    fn click_on_undocumented_node_is_a_no_op_while_closed() {
        let mut panel = DocPanel::default();
        panel.handle_click(ClickTarget::Node(&node("bare", &[])), &Tagging);
        assert!(!panel.is_open());
    }

    #[test]
    fn click_on_documented_node_opens_with_converted_markup() {
        let mut panel = DocPanel::default();
        panel.handle_click(
            ClickTarget::Node(&node("api", &[("content", "hello")])),
            &Tagging,
        );

        assert_eq!(panel.open_node_id(), Some("api"));
        match &panel.state {
            PanelState::Open { markup, .. } => assert_eq!(markup, "<md>\nhello</md>"),
            PanelState::Closed => panic!("panel should be open"),
        }
    }

    #[test]
    fn anchor_click_suppresses_close_once() {
        let mut panel = DocPanel::default();
        panel.handle_click(
            ClickTarget::Node(&node("api", &[("content", "hello")])),
            &Tagging,
        );

        panel.handle_click(ClickTarget::Anchor, &Tagging);
        assert!(panel.is_open());

        // The next unrelated click closes as usual.
        panel.handle_click(ClickTarget::Elsewhere, &Tagging);
        assert!(!panel.is_open());
    }

    #[test]
    fn clicking_a_second_documented_node_switches_the_panel() {
        let mut panel = DocPanel::default();
        panel.handle_click(
            ClickTarget::Node(&node("first", &[("content", "a")])),
            &Tagging,
        );
        panel.handle_click(
            ClickTarget::Node(&node("second", &[("content", "b")])),
            &Tagging,
        );

        assert_eq!(panel.open_node_id(), Some("second"));
    }

    #[test]
    fn clicking_an_undocumented_node_closes_an_open_panel() {
        let mut panel = DocPanel::default();
        panel.handle_click(
            ClickTarget::Node(&node("api", &[("content", "a")])),
            &Tagging,
        );
        panel.handle_click(ClickTarget::Node(&node("bare", &[])), &Tagging);

        assert!(!panel.is_open());
    }

    #[test]
    fn badges_are_exposed_for_rendering() {
        let mut panel = DocPanel::default();
        panel.handle_click(
            ClickTarget::Node(&node("api", &[("docs", "http://x"), ("content", "body")])),
            &Tagging,
        );

        match &panel.state {
            PanelState::Open { badges, .. } => {
                assert_eq!(badges.len(), 1);
                assert_eq!(badges[0].name, "docs");
                assert_eq!(badges[0].url, "http://x");
            }
            PanelState::Closed => panic!("panel should be open"),
        }
    }
}
