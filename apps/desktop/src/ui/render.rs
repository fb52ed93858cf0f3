//! Roster snapshot to view tree.
//!
//! `render` is a pure function of the roster: every call builds the cards and
//! the activity options from nothing, so rendering the same roster twice
//! yields identical trees.

use shared::domain::{Activity, Roster};

use crate::ui::{
    sanitize::escape,
    view::{Element, Node},
};

pub const SELECT_PLACEHOLDER: &str = "-- Select an activity --";
pub const NO_PARTICIPANTS: &str = "No participants yet";
pub const LOADING: &str = "Loading activities...";
pub const LOAD_FAILED: &str = "Failed to load activities. Please try again later.";

const REMOVE_CLASS: &str = "participant-remove";

/// Children for the roster container and for the activity selection control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterView {
    pub cards: Vec<Node>,
    pub options: Vec<Node>,
}

/// Identifies one removal control: the row of `email` at `position` within
/// the participants of `activity`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemovalTarget {
    pub activity: String,
    pub email: String,
    pub position: usize,
}

impl RemovalTarget {
    pub fn new(activity: impl Into<String>, email: impl Into<String>, position: usize) -> Self {
        Self {
            activity: activity.into(),
            email: email.into(),
            position,
        }
    }

    pub fn from_control(control: &Element) -> Option<Self> {
        if !is_removal_control(control) {
            return None;
        }
        Some(Self {
            activity: control.get_attr("data-activity")?.to_string(),
            email: control.get_attr("data-email")?.to_string(),
            position: control.get_attr("data-position")?.parse().ok()?,
        })
    }

    pub fn matches(&self, control: &Element) -> bool {
        is_removal_control(control)
            && control.get_attr("data-activity") == Some(self.activity.as_str())
            && control.get_attr("data-email") == Some(self.email.as_str())
            && control.get_attr("data-position") == Some(self.position.to_string().as_str())
    }

    pub fn confirmation_prompt(&self) -> String {
        format!("Unregister {} from {}?", self.email, self.activity)
    }
}

pub fn is_removal_control(element: &Element) -> bool {
    element.tag == "button" && element.has_class(REMOVE_CLASS)
}

pub fn render(roster: &Roster) -> RosterView {
    let mut view = RosterView {
        cards: Vec::with_capacity(roster.len()),
        options: placeholder_options(),
    };

    for (name, activity) in roster.iter() {
        view.cards.push(render_card(name, activity));
        view.options.push(
            Element::new("option")
                .attr("value", name)
                .text(name)
                .into(),
        );
    }

    view
}

fn render_card(name: &str, activity: &Activity) -> Node {
    Element::new("div")
        .class("activity-card")
        .child(Element::new("h4").text(name))
        .child(Element::new("p").text(activity.description.as_str()))
        .child(Element::new("p").markup(format!(
            "<strong>Schedule:</strong> {}",
            escape(activity.schedule.as_str())
        )))
        .child(Element::new("p").markup(format!(
            "<strong>Availability:</strong> {} spots left",
            activity.spots_left()
        )))
        .child(render_participants(name, &activity.participants))
        .into()
}

fn render_participants(name: &str, participants: &[String]) -> Element {
    let section = Element::new("div")
        .class("participants")
        .child(Element::new("h5").text("Participants"));

    if participants.is_empty() {
        return section.child(Element::new("p").class("no-participants").text(NO_PARTICIPANTS));
    }

    let list = participants
        .iter()
        .enumerate()
        .fold(Element::new("ul").class("participants-list"), |list, (position, email)| {
            list.child(
                Element::new("li")
                    .child(Element::new("span").class("participant-badge").text(email.as_str()))
                    .child(removal_control(name, email, position)),
            )
        });
    section.child(list)
}

/// The `×` button next to a participant badge.
pub fn removal_control(activity: &str, email: &str, position: usize) -> Element {
    Element::new("button")
        .class(REMOVE_CLASS)
        .attr("type", "button")
        .attr("title", format!("Unregister {email}"))
        .attr("aria-label", format!("Unregister {email} from {activity}"))
        .attr("data-activity", activity)
        .attr("data-email", email)
        .attr("data-position", position.to_string())
        .text("\u{d7}")
}

pub fn loading_view() -> Vec<Node> {
    vec![Element::new("p").text(LOADING).into()]
}

pub fn load_failed_view() -> Vec<Node> {
    vec![Element::new("p").text(LOAD_FAILED).into()]
}

pub fn placeholder_options() -> Vec<Node> {
    vec![Element::new("option")
        .attr("value", "")
        .text(SELECT_PLACEHOLDER)
        .into()]
}

/// Every removal control under `nodes`, in document order.
pub fn removal_controls(nodes: &[Node]) -> Vec<&Element> {
    nodes
        .iter()
        .flat_map(|node| node.find_all(&is_removal_control))
        .collect()
}

pub fn find_removal_control_mut<'a>(
    nodes: &'a mut [Node],
    target: &RemovalTarget,
) -> Option<&'a mut Element> {
    nodes
        .iter_mut()
        .find_map(|node| node.find_mut(&|element: &Element| target.matches(element)))
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
