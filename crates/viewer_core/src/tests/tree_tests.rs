use super::*;

#[test]
fn direct_click_toggles_on_the_collapsed_edge() {
    // Collapsed node, direct click: expand.
    assert!(accepts_toggle(ClickTarget::NodeOrPrefix, true, false));
    // Now expanded, second direct click: collapse again.
    assert!(accepts_toggle(ClickTarget::NodeOrPrefix, false, false));
}

#[test]
fn any_click_inside_a_collapsed_node_counts_as_the_node() {
    assert!(accepts_toggle(ClickTarget::Descendant, true, false));
}

#[test]
fn clicks_inside_an_expanded_body_do_not_toggle() {
    assert!(!accepts_toggle(ClickTarget::Descendant, false, false));
}

#[test]
fn collapsed_ancestor_swallows_descendant_clicks() {
    assert!(!accepts_toggle(ClickTarget::NodeOrPrefix, true, true));
    assert!(!accepts_toggle(ClickTarget::NodeOrPrefix, false, true));
    assert!(!accepts_toggle(ClickTarget::Descendant, true, true));
    assert!(!accepts_toggle(ClickTarget::Descendant, false, true));
}
