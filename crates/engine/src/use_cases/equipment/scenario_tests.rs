//! End-to-end equipment scenarios over the in-memory item source.

use std::sync::Arc;

use outfitter_domain::{
    CategoryKind, CollectOptions, ControlKind, CurrencyGrant, EntryId, EntryKind, ItemRef,
    RawEntry, SelectionContext, SelectionForm, SelectionRef, SourceType,
};

use crate::app::{App, Ports};
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::dice_roller::DiceRoller;
use crate::infrastructure::random::FixedRandom;
use crate::test_fixtures::{class_doc, standard_source, InMemoryItemSource};

fn app_over(source: InMemoryItemSource) -> App {
    let mut ports = Ports::standard(Arc::new(source));
    ports.roller = Arc::new(DiceRoller::new(Arc::new(FixedRandom(2))));
    App::new(ports, &EngineConfig::default())
}

fn fighter_and_acolyte() -> SelectionContext {
    SelectionContext::default()
        .with_class(SelectionRef::new(
            "fighter",
            "fighter",
            "Compendium.classes.fighter",
        ))
        .with_background(SelectionRef::new(
            "acolyte",
            "acolyte",
            "Compendium.backgrounds.acolyte",
        ))
}

async fn fighter_form(app: &App) -> SelectionForm {
    let data = app
        .fetch_equipment_data(&fighter_and_acolyte())
        .await
        .unwrap();
    app.build_form(&data)
}

fn names(entries: &[outfitter_domain::SelectionEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

#[tokio::test]
async fn test_clearing_the_catalog_is_idempotent() {
    let app = app_over(standard_source());
    let before = app
        .get_category_options(CategoryKind::Weapon, Some("sim"))
        .await;

    app.clear_catalog(false).await;
    app.clear_catalog(false).await;
    assert!(app.catalog.is_initialized().await);

    app.clear_catalog(true).await;
    app.clear_catalog(true).await;
    assert!(!app.catalog.is_initialized().await);

    let after = app
        .get_category_options(CategoryKind::Weapon, Some("sim"))
        .await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_weapon_alias_is_the_sorted_union_of_its_buckets() {
    let app = app_over(standard_source());

    let mut expected = app
        .get_category_options(CategoryKind::Weapon, Some("simpleM"))
        .await;
    expected.extend(
        app.get_category_options(CategoryKind::Weapon, Some("simpleR"))
            .await,
    );
    outfitter_domain::sort_by_name(&mut expected);

    let alias = app
        .get_category_options(CategoryKind::Weapon, Some("sim"))
        .await;

    assert_eq!(alias, expected);
}

#[tokio::test]
async fn test_self_referencing_group_is_rejected() {
    let entries = vec![
        RawEntry::new("A", EntryKind::And),
        RawEntry::new("B", EntryKind::Or).in_group("B"),
    ];
    let app = app_over(standard_source().with_item(
        "classes",
        class_doc("Compendium.classes.ouroboros", "Ouroboros", &entries, None),
    ));
    let ctx = SelectionContext::default().with_class(SelectionRef::new(
        "ouroboros",
        "ouroboros",
        "Compendium.classes.ouroboros",
    ));

    let err = app.fetch_equipment_data(&ctx).await.unwrap_err();

    assert!(err.is_authoring_error());
}

#[tokio::test]
async fn test_wealth_and_equipment_are_mutually_exclusive() {
    let app = app_over(standard_source());
    let mut form = fighter_form(&app).await;
    let class_only = CollectOptions {
        include_class: true,
        include_background: false,
    };

    form.set_wealth_active(SourceType::Class, true).unwrap();

    let panel = form.panel(SourceType::Class);
    assert!(panel.controls().iter().all(|c| c.is_disabled()));
    assert_eq!(panel.wealth_display(), Some("5d4*10"));
    assert!(app.collect_selections(&form, class_only).await.is_empty());
    assert!(app.collect_currency(&form, class_only).is_empty());
    let wealth = app.collect_wealth(&form).await;
    assert_eq!(wealth.len(), 1);
    assert_eq!(wealth[0].amount, 100);

    form.set_wealth_active(SourceType::Class, false).unwrap();

    let panel = form.panel(SourceType::Class);
    assert!(panel.controls().iter().all(|c| !c.is_disabled()));
    assert_eq!(panel.wealth_display(), None);
    assert!(!app.collect_selections(&form, class_only).await.is_empty());
    assert!(app.collect_wealth(&form).await.is_empty());
}

#[tokio::test]
async fn test_only_the_selected_or_branch_contributes() {
    let app = app_over(standard_source());
    let mut form = fighter_form(&app).await;
    let class_only = CollectOptions {
        include_class: true,
        include_background: false,
    };

    let initial = app.collect_selections(&form, class_only).await;
    assert_eq!(names(&initial), vec!["Chain Mail", "Torch"]);

    form.select_branch(SourceType::Class, &EntryId::new("B"), &EntryId::new("D"))
        .unwrap();

    let chain = form.panel(SourceType::Class).find(&EntryId::new("C")).unwrap();
    assert!(chain.is_disabled() && chain.is_hidden());
    let leather = form.panel(SourceType::Class).find(&EntryId::new("D1")).unwrap();
    assert!(leather.is_active());

    let switched = app.collect_selections(&form, class_only).await;
    assert_eq!(names(&switched), vec!["Leather Armor", "Longbow", "Torch"]);
}

#[tokio::test]
async fn test_unusable_weapons_are_never_offered() {
    let app = app_over(standard_source());

    let weapons = app
        .get_category_options(CategoryKind::Weapon, None)
        .await;

    let offered: Vec<&str> = weapons.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(
        offered,
        vec![
            "Club",
            "Dagger",
            "Light Crossbow",
            "Longbow",
            "Longsword",
            "Shortbow"
        ]
    );
}

#[tokio::test]
async fn test_fighter_and_acolyte_collect_in_declaration_order() {
    let app = app_over(standard_source());
    let mut form = fighter_form(&app).await;

    let martial = form.panel(SourceType::Class).find(&EntryId::new("E")).unwrap();
    let ControlKind::Picker { options, .. } = martial.kind() else {
        panic!("expected a picker");
    };
    assert_eq!(options.len(), 2);

    form.choose_option(
        SourceType::Class,
        &EntryId::new("E"),
        Some(ItemRef::new("Compendium.weapons.longsword")),
    )
    .unwrap();
    form.choose_option(
        SourceType::Background,
        &EntryId::new("I"),
        Some(ItemRef::new("Compendium.tools.lute")),
    )
    .unwrap();
    form.set_favorite(SourceType::Class, &EntryId::new("E"), true)
        .unwrap();

    let entries = app
        .collect_selections(&form, CollectOptions::default())
        .await;

    assert_eq!(
        names(&entries),
        vec!["Longsword", "Chain Mail", "Torch", "Lute", "Rope"]
    );
    assert_eq!(entries[0].favorite, Some(true));
    assert_eq!(entries[0].kind, "weapon");
    assert_eq!(entries[2].quantity, 5);
    assert_eq!(entries[3].source, SourceType::Background);

    assert_eq!(
        app.collect_currency(&form, CollectOptions::default()),
        vec![CurrencyGrant {
            denomination: "gp".to_string(),
            amount: 25,
        }]
    );
}

#[tokio::test]
async fn test_unchecked_optional_item_is_left_out() {
    let app = app_over(standard_source());
    let mut form = fighter_form(&app).await;
    let background_only = CollectOptions {
        include_class: false,
        include_background: true,
    };

    assert_eq!(
        names(&app.collect_selections(&form, background_only).await),
        vec!["Rope"]
    );

    form.set_checked(SourceType::Background, &EntryId::new("H"), false)
        .unwrap();

    assert!(app
        .collect_selections(&form, background_only)
        .await
        .is_empty());
}

#[tokio::test]
async fn test_user_roll_is_used_for_the_wealth_grant() {
    let app = app_over(standard_source());
    let mut form = fighter_form(&app).await;
    form.set_wealth_active(SourceType::Background, true).unwrap();

    let outcome = app
        .roll_wealth(&mut form, SourceType::Background)
        .await
        .unwrap();
    let wealth = app.collect_wealth(&form).await;

    assert_eq!(outcome.total, 50);
    assert_eq!(wealth.len(), 1);
    assert_eq!(wealth[0].source_type, SourceType::Background);
    assert_eq!(wealth[0].amount, 50);
    assert_eq!(wealth[0].formula, "50");
    assert_eq!(wealth[0].currency_kind, "gp");
}

#[tokio::test]
async fn test_oversized_wealth_formula_skips_only_its_source() {
    let app = app_over(standard_source().with_item(
        "classes",
        class_doc(
            "Compendium.classes.tycoon",
            "Tycoon",
            &[RawEntry::new("A", EntryKind::And)],
            Some("5d4*1000000000"),
        ),
    ));
    let ctx = fighter_and_acolyte().with_class(SelectionRef::new(
        "tycoon",
        "tycoon",
        "Compendium.classes.tycoon",
    ));
    let data = app.fetch_equipment_data(&ctx).await.unwrap();
    let mut form = app.build_form(&data);
    form.set_wealth_active(SourceType::Class, true).unwrap();
    form.set_wealth_active(SourceType::Background, true).unwrap();

    let wealth = app.collect_wealth(&form).await;

    assert_eq!(wealth.len(), 1);
    assert_eq!(wealth[0].source_type, SourceType::Background);
    assert!(app.roll_wealth(&mut form, SourceType::Class).await.is_err());
}
