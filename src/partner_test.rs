#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

// --- from_names ---

#[test]
fn from_names_preserves_first_seen_order() {
    let registry = PartnerRegistry::from_names(["Seller", "Buyer", "Witness"]);
    assert_eq!(registry.names(), ["Seller", "Buyer", "Witness"]);
}

#[test]
fn from_names_drops_empty_and_whitespace_entries() {
    let registry = PartnerRegistry::from_names(["Seller", "", "   ", "Buyer"]);
    assert_eq!(registry.names(), ["Seller", "Buyer"]);
}

#[test]
fn from_names_drops_duplicates() {
    let registry = PartnerRegistry::from_names(["Seller", "Buyer", "Seller"]);
    assert_eq!(registry.names(), ["Seller", "Buyer"]);
}

#[test]
fn from_names_sets_current_to_first() {
    let registry = PartnerRegistry::from_names(["Seller", "Buyer"]);
    assert_eq!(registry.current(), Some("Seller"));
}

#[test]
fn from_names_empty_has_no_current() {
    let registry = PartnerRegistry::from_names(Vec::<String>::new());
    assert!(registry.is_empty());
    assert!(registry.current().is_none());
}

#[test]
fn fallback_is_single_default_partner() {
    let registry = PartnerRegistry::fallback();
    assert_eq!(registry.names(), [DEFAULT_PARTNER]);
    assert_eq!(registry.current(), Some(DEFAULT_PARTNER));
}

// --- add ---

#[test]
fn add_explicit_name() {
    let mut registry = PartnerRegistry::fallback();
    let added = registry.add(Some("Buyer")).unwrap();
    assert_eq!(added, "Buyer");
    assert_eq!(registry.names(), [DEFAULT_PARTNER, "Buyer"]);
}

#[test]
fn add_trims_whitespace() {
    let mut registry = PartnerRegistry::fallback();
    let added = registry.add(Some("  Buyer  ")).unwrap();
    assert_eq!(added, "Buyer");
}

#[test]
fn add_empty_name_rejected() {
    let mut registry = PartnerRegistry::fallback();
    assert_eq!(registry.add(Some("   ")), Err(PartnerError::EmptyName));
}

#[test]
fn add_duplicate_rejected() {
    let mut registry = PartnerRegistry::fallback();
    let result = registry.add(Some(DEFAULT_PARTNER));
    assert_eq!(result, Err(PartnerError::DuplicateName(DEFAULT_PARTNER.to_owned())));
}

#[test]
fn add_without_name_generates_ordinal() {
    let mut registry = PartnerRegistry::fallback();
    assert_eq!(registry.add(None).unwrap(), "Party 2");
    assert_eq!(registry.add(None).unwrap(), "Party 3");
}

#[test]
fn add_ordinal_skips_taken_names() {
    let mut registry = PartnerRegistry::from_names(["Party 2"]);
    // Roster has one entry, so the generator starts at "Party 2" and must
    // skip past the collision.
    assert_eq!(registry.add(None).unwrap(), "Party 3");
}

#[test]
fn add_to_empty_roster_sets_current() {
    let mut registry = PartnerRegistry::default();
    registry.add(Some("Buyer")).unwrap();
    assert_eq!(registry.current(), Some("Buyer"));
}

// --- rename ---

#[test]
fn rename_preserves_position() {
    let mut registry = PartnerRegistry::from_names(["Seller", "Buyer", "Witness"]);
    registry.rename("Buyer", "Purchaser").unwrap();
    assert_eq!(registry.names(), ["Seller", "Purchaser", "Witness"]);
}

#[test]
fn rename_updates_current_selection() {
    let mut registry = PartnerRegistry::from_names(["Seller", "Buyer"]);
    registry.set_current("Buyer");
    registry.rename("Buyer", "Purchaser").unwrap();
    assert_eq!(registry.current(), Some("Purchaser"));
}

#[test]
fn rename_unknown_rejected() {
    let mut registry = PartnerRegistry::fallback();
    let result = registry.rename("Ghost", "Anything");
    assert_eq!(result, Err(PartnerError::UnknownPartner("Ghost".to_owned())));
}

#[test]
fn rename_to_existing_name_rejected() {
    let mut registry = PartnerRegistry::from_names(["Seller", "Buyer"]);
    let result = registry.rename("Seller", "Buyer");
    assert_eq!(result, Err(PartnerError::DuplicateName("Buyer".to_owned())));
}

#[test]
fn rename_to_empty_rejected() {
    let mut registry = PartnerRegistry::fallback();
    assert_eq!(registry.rename(DEFAULT_PARTNER, "  "), Err(PartnerError::EmptyName));
}

// --- remove ---

#[test]
fn remove_drops_entry() {
    let mut registry = PartnerRegistry::from_names(["Seller", "Buyer"]);
    registry.remove("Buyer").unwrap();
    assert_eq!(registry.names(), ["Seller"]);
}

#[test]
fn remove_current_falls_back_to_first_entry() {
    let mut registry = PartnerRegistry::from_names(["Seller", "Buyer"]);
    registry.set_current("Buyer");
    registry.remove("Buyer").unwrap();
    assert_eq!(registry.current(), Some("Seller"));
}

#[test]
fn remove_last_entry_clears_current() {
    let mut registry = PartnerRegistry::fallback();
    registry.remove(DEFAULT_PARTNER).unwrap();
    assert!(registry.is_empty());
    assert!(registry.current().is_none());
}

#[test]
fn remove_unknown_rejected() {
    let mut registry = PartnerRegistry::fallback();
    let result = registry.remove("Ghost");
    assert_eq!(result, Err(PartnerError::UnknownPartner("Ghost".to_owned())));
}

// --- selection and colors ---

#[test]
fn set_current_unknown_returns_false() {
    let mut registry = PartnerRegistry::fallback();
    assert!(!registry.set_current("Ghost"));
    assert_eq!(registry.current(), Some(DEFAULT_PARTNER));
}

#[test]
fn colors_are_stable_per_position() {
    let registry = PartnerRegistry::from_names(["Seller", "Buyer"]);
    assert_eq!(registry.color_for("Seller"), registry.color_for("Seller"));
    assert_ne!(registry.color_for("Seller"), registry.color_for("Buyer"));
}

#[test]
fn colors_cycle_past_palette_length() {
    let names: Vec<String> = (0..10).map(|n| format!("P{n}")).collect();
    let registry = PartnerRegistry::from_names(names);
    assert_eq!(registry.color_for("P8"), registry.color_for("P0"));
}

#[test]
fn unknown_partner_gets_first_color() {
    let registry = PartnerRegistry::from_names(["Seller"]);
    assert_eq!(registry.color_for("Ghost"), registry.color_for("Seller"));
}
