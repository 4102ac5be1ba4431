//! Integration tests for selector matching: compound tests, the right-to-left
//! chain walk, and indexed candidate lookup.

use wombat_style::selector::{
    CompoundSelector, MatchRecord, MatchingContext, SelectorChain, SelectorPart, find_matches,
    match_right_to_left, matches_chain, matches_selector,
};
use wombat_style::sheet::StyleSheet;
use wombat_tree::{ElementData, ElementId, ElementTree, PseudoStates};

fn element(
    tree: &mut ElementTree,
    parent: Option<ElementId>,
    type_name: &str,
    name: &str,
    classes: &[&str],
) -> ElementId {
    let mut data = ElementData::new(type_name);
    data.name = name.to_string();
    data.classes = classes.iter().map(ToString::to_string).collect();
    let id = tree.alloc(data);
    if let Some(parent) = parent {
        tree.append_child(parent, id);
    }
    id
}

fn compound(parts: Vec<SelectorPart>) -> CompoundSelector {
    CompoundSelector::new(parts)
}

fn chain(parts: Vec<CompoundSelector>) -> SelectorChain {
    SelectorChain::new(parts, 0)
}

// ========== matches_selector ==========

#[test]
fn test_structural_parts_all_must_hold() {
    let data = ElementData {
        type_name: "button".to_string(),
        name: "save".to_string(),
        classes: vec!["primary".to_string(), "wide".to_string()],
        pseudo_states: PseudoStates::NONE,
    };

    let matching = compound(vec![
        SelectorPart::Type("button".to_string()),
        SelectorPart::Id("save".to_string()),
        SelectorPart::Class("primary".to_string()),
    ]);
    assert!(matches_selector(&data, &matching).success);

    let wrong_class = compound(vec![
        SelectorPart::Type("button".to_string()),
        SelectorPart::Class("secondary".to_string()),
    ]);
    assert!(!matches_selector(&data, &wrong_class).success);
}

#[test]
fn test_wildcard_and_pseudo_class_parts_are_structural_no_ops() {
    let data = ElementData::new("label");
    let selector = compound(vec![
        SelectorPart::Wildcard,
        SelectorPart::PseudoClass("hover".to_string()),
    ]);
    // The :hover name alone imposes nothing; the requirement lives in the
    // state masks.
    assert!(matches_selector(&data, &selector).success);
}

#[test]
fn test_predicate_part_invokes_callable() {
    let mut data = ElementData::new("row");
    data.classes = vec!["odd".to_string()];
    let odd = compound(vec![SelectorPart::Predicate(|data| data.has_class("odd"))]);
    let even = compound(vec![SelectorPart::Predicate(|data| data.has_class("even"))]);
    assert!(matches_selector(&data, &odd).success);
    assert!(!matches_selector(&data, &even).success);
}

#[test]
fn test_required_pseudo_states() {
    let mut data = ElementData::new("button");
    let selector = compound(vec![SelectorPart::Type("button".to_string())])
        .with_states(PseudoStates::HOVER, PseudoStates::NONE);

    let info = matches_selector(&data, &selector);
    assert!(!info.success);
    assert_eq!(info.dependent_on_present, PseudoStates::HOVER);

    data.pseudo_states = PseudoStates::HOVER | PseudoStates::FOCUS;
    let info = matches_selector(&data, &selector);
    assert!(info.success);
    assert_eq!(info.dependent_on_present, PseudoStates::HOVER);
    assert_eq!(info.dependent_on_absent, PseudoStates::NONE);
}

#[test]
fn test_negated_pseudo_states() {
    let mut data = ElementData::new("button");
    let selector = compound(vec![SelectorPart::Type("button".to_string())])
        .with_states(PseudoStates::NONE, PseudoStates::DISABLED);

    assert!(matches_selector(&data, &selector).success);

    data.pseudo_states = PseudoStates::DISABLED;
    let info = matches_selector(&data, &selector);
    assert!(!info.success);
    assert_eq!(info.dependent_on_absent, PseudoStates::DISABLED);
}

#[test]
fn test_structural_failure_reports_no_state_dependencies() {
    let data = ElementData::new("label");
    let selector = compound(vec![SelectorPart::Type("button".to_string())])
        .with_states(PseudoStates::HOVER, PseudoStates::DISABLED);
    let info = matches_selector(&data, &selector);
    assert!(!info.success);
    assert!(info.dependent_on_present.is_empty());
    assert!(info.dependent_on_absent.is_empty());
}

// ========== match_right_to_left ==========

#[test]
fn test_single_compound_matches_element_itself() {
    let mut tree = ElementTree::new();
    let root = element(&mut tree, None, "panel", "", &[]);
    let child = element(&mut tree, Some(root), "button", "", &[]);

    let selector = chain(vec![compound(vec![SelectorPart::Type("button".to_string())])]);
    assert!(matches_chain(&tree, child, &selector));
    assert!(!matches_chain(&tree, root, &selector));
}

#[test]
fn test_descendant_combinator_skips_intermediate_elements() {
    // panel .a against panel > row > list.a: the intermediate row must not
    // break the match.
    let mut tree = ElementTree::new();
    let panel = element(&mut tree, None, "panel", "", &[]);
    let row = element(&mut tree, Some(panel), "row", "", &[]);
    let list = element(&mut tree, Some(row), "list", "", &["a"]);

    let selector = chain(vec![
        compound(vec![SelectorPart::Type("panel".to_string())]),
        compound(vec![SelectorPart::Class("a".to_string())]).descendant_of_previous(),
    ]);
    assert!(matches_chain(&tree, list, &selector));
    assert!(!matches_chain(&tree, row, &selector));
}

#[test]
fn test_direct_relationship_requires_immediate_parent() {
    // A compound joined without a descendant relationship pins the previous
    // compound to the exact parent.
    let mut tree = ElementTree::new();
    let outer = element(&mut tree, None, "panel", "", &["a"]);
    let spacer = element(&mut tree, Some(outer), "spacer", "", &[]);
    let direct = element(&mut tree, Some(outer), "label", "", &["b"]);
    let nested = element(&mut tree, Some(spacer), "label", "", &["b"]);

    let selector = chain(vec![
        compound(vec![SelectorPart::Class("a".to_string())]),
        compound(vec![SelectorPart::Class("b".to_string())]),
    ]);
    assert!(matches_chain(&tree, direct, &selector));
    assert!(!matches_chain(&tree, nested, &selector));
}

#[test]
fn test_checkpoint_resumes_descendant_search() {
    // Chain: .a  >joined-direct<  .b  >joined-descendant<  .c
    // Tree: a > b_outer > q > b_inner > c
    // The walk first matches .b at b_inner, fails .a at q, and must fall
    // back to re-searching .b from q upward to find b_outer (whose parent
    // is a).
    let mut tree = ElementTree::new();
    let a = element(&mut tree, None, "panel", "", &["a"]);
    let b_outer = element(&mut tree, Some(a), "panel", "", &["b"]);
    let q = element(&mut tree, Some(b_outer), "panel", "", &[]);
    let b_inner = element(&mut tree, Some(q), "panel", "", &["b"]);
    let c = element(&mut tree, Some(b_inner), "panel", "", &["c"]);

    let selector = chain(vec![
        compound(vec![SelectorPart::Class("a".to_string())]),
        compound(vec![SelectorPart::Class("b".to_string())]),
        compound(vec![SelectorPart::Class("c".to_string())]).descendant_of_previous(),
    ]);
    assert!(matches_chain(&tree, c, &selector));
}

#[test]
fn test_chain_fails_when_ancestors_run_out() {
    let mut tree = ElementTree::new();
    let root = element(&mut tree, None, "panel", "", &[]);
    let child = element(&mut tree, Some(root), "button", "", &[]);

    let selector = chain(vec![
        compound(vec![SelectorPart::Class("missing".to_string())]),
        compound(vec![SelectorPart::Type("button".to_string())]).descendant_of_previous(),
    ]);
    assert!(!matches_chain(&tree, child, &selector));
}

#[test]
fn test_observer_sees_every_tested_pair() {
    let mut tree = ElementTree::new();
    let panel = element(&mut tree, None, "panel", "", &[]);
    let row = element(&mut tree, Some(panel), "row", "", &[]);
    let button = element(&mut tree, Some(row), "button", "", &[]);

    let selector = chain(vec![
        compound(vec![SelectorPart::Type("panel".to_string())]),
        compound(vec![SelectorPart::Type("button".to_string())]).descendant_of_previous(),
    ]);

    let mut tested = Vec::new();
    let matched = match_right_to_left(&tree, button, &selector, |id, info| {
        tested.push((id, info.success));
    });
    assert!(matched);
    // button matches the key selector, row fails the left compound, panel
    // matches it on retry.
    assert_eq!(tested, vec![(button, true), (row, false), (panel, true)]);
}

#[test]
fn test_observer_collects_state_dependencies() {
    let mut tree = ElementTree::new();
    let panel = element(&mut tree, None, "panel", "", &[]);
    let button = element(&mut tree, Some(panel), "button", "", &[]);
    tree.set_pseudo_states(button, PseudoStates::HOVER);

    let selector = chain(vec![
        compound(vec![SelectorPart::Type("panel".to_string())]),
        compound(vec![SelectorPart::Type("button".to_string())])
            .with_states(PseudoStates::HOVER, PseudoStates::DISABLED)
            .descendant_of_previous(),
    ]);

    let mut present = PseudoStates::NONE;
    let mut absent = PseudoStates::NONE;
    let matched = match_right_to_left(&tree, button, &selector, |_, info| {
        present |= info.dependent_on_present;
        absent |= info.dependent_on_absent;
    });
    assert!(matched);
    assert_eq!(present, PseudoStates::HOVER);
    assert_eq!(absent, PseudoStates::DISABLED);
}

#[test]
fn test_empty_chain_never_matches() {
    let mut tree = ElementTree::new();
    let root = element(&mut tree, None, "panel", "", &[]);
    assert!(!matches_chain(&tree, root, &chain(Vec::new())));
}

// ========== find_matches ==========

/// Brute-force reference: test every chain of every sheet directly.
fn brute_force(
    tree: &ElementTree,
    target: ElementId,
    sheets: &[&StyleSheet],
) -> Vec<MatchRecord> {
    let mut records = Vec::new();
    for (sheet_index, sheet) in sheets.iter().enumerate() {
        for (chain_index, selector) in sheet.chains().iter().enumerate() {
            if matches_chain(tree, target, selector) {
                records.push(MatchRecord {
                    sheet_index,
                    chain_index,
                });
            }
        }
    }
    records
}

fn build_sheet() -> StyleSheet {
    let mut sheet = StyleSheet::new();
    // button { .. }
    let _ = sheet.add_chain(chain(vec![compound(vec![SelectorPart::Type(
        "button".to_string(),
    )])]));
    // .primary { .. }
    let _ = sheet.add_chain(chain(vec![compound(vec![SelectorPart::Class(
        "primary".to_string(),
    )])]));
    // #save { .. }
    let _ = sheet.add_chain(chain(vec![compound(vec![SelectorPart::Id(
        "save".to_string(),
    )])]));
    // * { .. }
    let _ = sheet.add_chain(chain(vec![compound(vec![SelectorPart::Wildcard])]));
    // panel .primary { .. }
    let _ = sheet.add_chain(chain(vec![
        compound(vec![SelectorPart::Type("panel".to_string())]),
        compound(vec![SelectorPart::Class("primary".to_string())]).descendant_of_previous(),
    ]));
    // row button { .. } — never matches the fixture tree below.
    let _ = sheet.add_chain(chain(vec![
        compound(vec![SelectorPart::Type("row".to_string())]),
        compound(vec![SelectorPart::Type("button".to_string())]).descendant_of_previous(),
    ]));
    sheet
}

#[test]
fn test_find_matches_equals_brute_force() {
    let mut tree = ElementTree::new();
    let panel = element(&mut tree, None, "panel", "", &[]);
    let button = element(&mut tree, Some(panel), "button", "save", &["primary", "wide"]);
    let label = element(&mut tree, Some(panel), "label", "", &[]);

    let first = build_sheet();
    let mut second = StyleSheet::new();
    let _ = second.add_chain(chain(vec![compound(vec![SelectorPart::Class(
        "wide".to_string(),
    )])]));
    let sheets: Vec<&StyleSheet> = vec![&first, &second];

    for target in [panel, button, label] {
        let mut indexed = Vec::new();
        find_matches(
            &MatchingContext {
                tree: &tree,
                element: target,
                sheets: &sheets,
            },
            &mut indexed,
        );
        assert_eq!(indexed, brute_force(&tree, target, &sheets));
    }
}

#[test]
fn test_find_matches_expected_records() {
    let mut tree = ElementTree::new();
    let panel = element(&mut tree, None, "panel", "", &[]);
    let button = element(&mut tree, Some(panel), "button", "save", &["primary", "wide"]);

    let sheet = build_sheet();
    let sheets: Vec<&StyleSheet> = vec![&sheet];
    let mut records = Vec::new();
    find_matches(
        &MatchingContext {
            tree: &tree,
            element: button,
            sheets: &sheets,
        },
        &mut records,
    );

    // button, .primary, #save, *, and panel .primary all match; row button
    // does not.
    let matched: Vec<usize> = records.iter().map(|record| record.chain_index).collect();
    assert_eq!(matched, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_unnamed_element_misses_id_bucket() {
    let mut tree = ElementTree::new();
    let unnamed = element(&mut tree, None, "button", "", &[]);

    let mut sheet = StyleSheet::new();
    let _ = sheet.add_chain(chain(vec![compound(vec![SelectorPart::Id(
        "save".to_string(),
    )])]));
    let sheets: Vec<&StyleSheet> = vec![&sheet];

    let mut records = Vec::new();
    find_matches(
        &MatchingContext {
            tree: &tree,
            element: unnamed,
            sheets: &sheets,
        },
        &mut records,
    );
    assert!(records.is_empty());
}

#[test]
fn test_state_change_between_passes() {
    // The canonical re-match flow: a :hover chain stops matching once the
    // state bit clears.
    let mut tree = ElementTree::new();
    let button = element(&mut tree, None, "button", "", &[]);

    let mut sheet = StyleSheet::new();
    let hover_chain = sheet.add_chain(chain(vec![
        compound(vec![SelectorPart::Type("button".to_string())])
            .with_states(PseudoStates::HOVER, PseudoStates::NONE),
    ]));
    let sheets: Vec<&StyleSheet> = vec![&sheet];

    let mut records = Vec::new();
    find_matches(
        &MatchingContext { tree: &tree, element: button, sheets: &sheets },
        &mut records,
    );
    assert!(records.is_empty());

    tree.set_pseudo_states(button, PseudoStates::HOVER);
    records.clear();
    find_matches(
        &MatchingContext { tree: &tree, element: button, sheets: &sheets },
        &mut records,
    );
    assert_eq!(
        records,
        vec![MatchRecord { sheet_index: 0, chain_index: hover_chain }]
    );
}
