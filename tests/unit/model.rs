use super::*;

fn catalyst() -> CardRecord {
    CardRecord::Card(CardFace {
        name: "Catalyst of Anima".to_string(),
        category: Category::Anima,
        valence: Some(3),
        text: "Draw a card.".to_string(),
        palette: PaletteMode::Dark,
        art: None,
    })
}

fn ritual(active: ActiveSide) -> RitualCard {
    RitualCard {
        challenge: RitualSide {
            name: "Trial by Fire".to_string(),
            text: "Discard two cards.".to_string(),
            art: None,
            difficulty: Some("hard".to_string()),
        },
        reward: RitualSide {
            name: "Ember Crown".to_string(),
            text: "Gain 3 sol.".to_string(),
            art: None,
            difficulty: None,
        },
        foresight: Some(1),
        category: Category::Sol,
        active,
    }
}

#[test]
fn card_slug_and_badge() {
    let c = catalyst();
    assert_eq!(c.slug(), "catalyst_of_anima");
    assert_eq!(c.badge_value(), Some(3));
    assert_eq!(c.badge_icon(), BadgeIcon::Category(Category::Anima));
    assert_eq!(c.face_layout(), FaceLayout::Standard);
    assert!(matches!(c.shape(), CardShape::Single(_)));
}

#[test]
fn ritual_slug_follows_active_side() {
    let challenge = CardRecord::Ritual(ritual(ActiveSide::Challenge));
    let reward = CardRecord::Ritual(ritual(ActiveSide::Reward));
    assert_eq!(challenge.slug(), "trial_by_fire");
    assert_eq!(reward.slug(), "ember_crown");
    assert!(matches!(challenge.shape(), CardShape::TwoSided(_)));
}

#[test]
fn ritual_side_label_carries_difficulty() {
    let r = ritual(ActiveSide::Challenge);
    assert_eq!(r.challenge.label(), "Trial by Fire (hard)");
    assert_eq!(r.reward.label(), "Ember Crown");

    let blank = RitualSide {
        difficulty: Some("  ".to_string()),
        ..r.reward.clone()
    };
    assert_eq!(blank.label(), "Ember Crown");

    let parsed: RitualSide =
        serde_json::from_str(r#"{"name": "Long Night", "difficulty": "easy"}"#).unwrap();
    assert_eq!(parsed.label(), "Long Night (easy)");
}

#[test]
fn only_consumables_get_side_labels() {
    let fate = FateCard {
        name: "Old Lantern".to_string(),
        category: Category::None,
        foresight: Some(2),
        text: String::new(),
        palette: PaletteMode::Dark,
        art: None,
    };
    let consumable = CardRecord::Consumable(fate.clone());
    let event = CardRecord::Event(fate);
    assert_eq!(consumable.side_label(), Some("Old Lantern"));
    assert_eq!(event.side_label(), None);
    assert_eq!(event.badge_icon(), BadgeIcon::View);
    assert_eq!(event.face_layout(), FaceLayout::Fate);
}

#[test]
fn records_parse_from_tagged_json() {
    let json = r#"[
        { "kind": "card", "name": "Catalyst of Anima", "category": "anima", "valence": 3, "text": "Draw a card." },
        { "kind": "ritual", "foresight": 2,
          "challenge": { "name": "Trial by Fire", "text": "x" },
          "reward": { "name": "Ember Crown" } },
        { "kind": "aspect", "name": "Stillness", "palette": "light" }
    ]"#;
    let deck: Vec<CardRecord> = serde_json::from_str(json).unwrap();
    assert_eq!(deck.len(), 3);
    assert_eq!(deck[0], catalyst());
    assert_eq!(deck[1].slug(), "trial_by_fire");
    assert_eq!(deck[2].palette(), PaletteMode::Light);
}

#[test]
fn unknown_kind_is_rejected() {
    let res = serde_json::from_str::<CardRecord>(r#"{ "kind": "spell", "name": "x" }"#);
    assert!(res.is_err());
}

#[test]
fn validate_rejects_blank_names() {
    let mut r = ritual(ActiveSide::Challenge);
    r.reward.name = "  ".to_string();
    assert!(CardRecord::Ritual(r).validate().is_err());
    assert!(catalyst().validate().is_ok());
}

#[test]
fn load_deck_reads_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.json");
    std::fs::write(
        &path,
        serde_json::to_vec(&vec![catalyst(), CardRecord::Ritual(ritual(ActiveSide::Reward))])
            .unwrap(),
    )
    .unwrap();
    let deck = load_deck(&path).unwrap();
    assert_eq!(deck.len(), 2);
    assert_eq!(deck[1].slug(), "ember_crown");
}
