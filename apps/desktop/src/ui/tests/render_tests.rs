use super::*;
use crate::ui::view::{text_content, to_html};

fn activity(max_participants: u32, participants: &[&str]) -> Activity {
    Activity {
        description: "d".into(),
        schedule: "Mon 3pm".into(),
        max_participants,
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}

fn chess_club() -> Roster {
    [("Chess Club".to_string(), activity(2, &["a@x.com"]))]
        .into_iter()
        .collect()
}

fn badges(view: &RosterView) -> Vec<String> {
    view.cards
        .iter()
        .flat_map(|card| card.find_all(&|el: &Element| el.has_class("participant-badge")))
        .map(|el| Node::from(el.clone()).text_content())
        .collect()
}

#[test]
fn chess_club_card_shows_spots_left_and_one_badge() {
    let view = render(&chess_club());

    assert_eq!(view.cards.len(), 1);
    let text = view.cards[0].text_content();
    assert!(text.contains("Chess Club"));
    assert!(text.contains("Schedule: Mon 3pm"));
    assert!(text.contains("1 spots left"), "card text was {text:?}");
    assert_eq!(badges(&view), vec!["a@x.com"]);
    assert_eq!(removal_controls(&view.cards).len(), 1);
}

#[test]
fn cards_and_options_follow_roster_order() {
    let roster: Roster = [
        ("Zumba".to_string(), activity(3, &[])),
        ("Art Club".to_string(), activity(5, &[])),
    ]
    .into_iter()
    .collect();

    let view = render(&roster);

    let titles: Vec<String> = view
        .cards
        .iter()
        .map(|card| card.find_all(&|el: &Element| el.tag == "h4")[0].clone())
        .map(|el| Node::from(el).text_content())
        .collect();
    assert_eq!(titles, vec!["Zumba", "Art Club"]);

    let options: Vec<(Option<String>, String)> = view
        .options
        .iter()
        .filter_map(Node::as_element)
        .map(|el| {
            (
                el.get_attr("value").map(str::to_string),
                Node::from(el.clone()).text_content(),
            )
        })
        .collect();
    assert_eq!(
        options,
        vec![
            (Some(String::new()), SELECT_PLACEHOLDER.to_string()),
            (Some("Zumba".to_string()), "Zumba".to_string()),
            (Some("Art Club".to_string()), "Art Club".to_string()),
        ]
    );
}

#[test]
fn rendering_twice_produces_the_same_view() {
    let roster = chess_club();
    let first = render(&roster);
    let second = render(&roster);

    assert_eq!(first, second);
    assert_eq!(text_content(&first.cards), text_content(&second.cards));
    assert_eq!(
        removal_controls(&first.cards).len(),
        removal_controls(&second.cards).len()
    );
    assert_eq!(first.options.len(), 2);
}

#[test]
fn spots_left_is_recomputed_for_each_roster() {
    let before = render(&chess_club());
    let after: Roster = [("Chess Club".to_string(), activity(2, &["a@x.com", "b@x.com"]))]
        .into_iter()
        .collect();
    let after = render(&after);

    assert!(text_content(&before.cards).contains("1 spots left"));
    assert!(text_content(&after.cards).contains("0 spots left"));
}

#[test]
fn overbooked_activity_shows_negative_spots() {
    let roster: Roster = [("Chess Club".to_string(), activity(1, &["a@x.com", "b@x.com"]))]
        .into_iter()
        .collect();
    assert!(text_content(&render(&roster).cards).contains("-1 spots left"));
}

#[test]
fn empty_participants_render_placeholder_instead_of_list() {
    let roster: Roster = [("Chess Club".to_string(), activity(2, &[]))]
        .into_iter()
        .collect();
    let view = render(&roster);
    let card = &view.cards[0];

    assert!(card.text_content().contains(NO_PARTICIPANTS));
    assert!(card.find_all(&|el: &Element| el.tag == "ul").is_empty());
    assert!(card
        .find_all(&|el: &Element| el.tag == "p" && el.has_class("no-participants"))
        .len()
        == 1);
    assert!(removal_controls(&view.cards).is_empty());
}

#[test]
fn schedule_is_escaped_but_name_and_description_stay_text() {
    let roster: Roster = [(
        "<Chess & Co>".to_string(),
        Activity {
            description: "Kings & <queens>".into(),
            schedule: "<script>alert('x')</script>".into(),
            max_participants: 1,
            participants: vec![],
        },
    )]
    .into_iter()
    .collect();

    let view = render(&roster);
    let html = to_html(&view.cards);

    assert!(!html.contains("<script>"));
    assert!(html.contains(
        "<strong>Schedule:</strong> &lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;"
    ));
    assert!(html.contains("<h4>&lt;Chess &amp; Co&gt;</h4>"));
    assert!(html.contains("<p>Kings &amp; &lt;queens&gt;</p>"));

    let text = text_content(&view.cards);
    assert!(text.contains("Schedule: <script>alert('x')</script>"));
    assert!(text.contains("<Chess & Co>"));
}

#[test]
fn removal_control_labels_name_participant_and_activity() {
    let view = render(&chess_club());
    let controls = removal_controls(&view.cards);
    let control = controls[0];

    assert_eq!(control.get_attr("type"), Some("button"));
    assert_eq!(control.get_attr("title"), Some("Unregister a@x.com"));
    assert_eq!(
        control.get_attr("aria-label"),
        Some("Unregister a@x.com from Chess Club")
    );
    assert!(!control.is_disabled());
    assert_eq!(
        RemovalTarget::from_control(control),
        Some(RemovalTarget::new("Chess Club", "a@x.com", 0))
    );
}

#[test]
fn duplicate_participants_get_distinct_controls() {
    let roster: Roster = [("Chess Club".to_string(), activity(3, &["a@x.com", "a@x.com"]))]
        .into_iter()
        .collect();
    let mut view = render(&roster);

    assert_eq!(badges(&view), vec!["a@x.com", "a@x.com"]);

    let second = RemovalTarget::new("Chess Club", "a@x.com", 1);
    find_removal_control_mut(&mut view.cards, &second)
        .expect("second control")
        .set_disabled(true);

    let disabled: Vec<bool> = removal_controls(&view.cards)
        .into_iter()
        .map(Element::is_disabled)
        .collect();
    assert_eq!(disabled, vec![false, true]);
}

#[test]
fn confirmation_prompt_names_email_and_activity() {
    assert_eq!(
        RemovalTarget::new("Chess Club", "a@x.com", 0).confirmation_prompt(),
        "Unregister a@x.com from Chess Club?"
    );
}

#[test]
fn empty_roster_keeps_only_the_placeholder_option() {
    let view = render(&Roster::default());
    assert!(view.cards.is_empty());
    assert_eq!(view.options, placeholder_options());
}
