use fluxstyle_cssom::memory::{MemoryCssom, MemoryStyleSheet};
use fluxstyle_interface::cssom::{CssRuleContainer, CssStyleRule};
use fluxstyle_rules::{ManagerConfig, RuleScope, StyleSheetManager, StyleValue};
use fluxstyle_shared::errors::CssomError;

fn manager() -> StyleSheetManager<MemoryCssom> {
    StyleSheetManager::new("test", MemoryStyleSheet::new(), ManagerConfig::default())
}

fn unverified_manager() -> StyleSheetManager<MemoryCssom> {
    let config = ManagerConfig {
        verify_indices: false,
        ..ManagerConfig::default()
    };
    StyleSheetManager::new("test", MemoryStyleSheet::new(), config)
}

#[test]
fn same_selector_same_rule() {
    let manager = manager();
    let first = manager.get_or_insert_rule(".btn").unwrap();
    let second = manager.get_or_insert_rule(".btn").unwrap();

    assert_eq!(manager.rule_count(), 1);
    assert_eq!(first.index(), second.index());

    let native = manager.style_sheet().item(0).unwrap();
    assert!(first.native().is_same_rule(&native));
    assert!(second.native().is_same_rule(&native));
}

#[test]
fn same_query_same_block() {
    let manager = manager();
    let first = manager.get_or_insert_media_block("(max-width: 600px)").unwrap();
    let inner = first.get_or_insert_rule(".a").unwrap();

    let second = manager.get_or_insert_media_block("(max-width: 600px)").unwrap();
    let again = second.get_or_insert_rule(".a").unwrap();

    assert_eq!(manager.rule_count(), 1);
    assert_eq!(manager.media_block_count(), 1);
    assert_eq!(second.rule_count(), 1);
    assert_eq!(*again.scope(), RuleScope::Media("(max-width: 600px)".into()));

    let nested = second.native().item(0).unwrap();
    assert!(inner.native().is_same_rule(&nested));
    assert!(again.native().is_same_rule(&nested));
}

#[test]
fn media_and_top_level_rules_are_separate() {
    let manager = manager();
    let top = manager.get_or_insert_rule(".a").unwrap();
    let block = manager.get_or_insert_media_block("print").unwrap();
    let nested = block.get_or_insert_rule(".a").unwrap();

    top.set_declaration("color", "red").unwrap();
    nested.set_declaration("color", "black").unwrap();

    assert_eq!(
        manager.css_text(),
        ".a { color: red; }\n@media print {\n  .a { color: black; }\n}"
    );
}

#[test]
fn declaration_round_trip() {
    let manager = manager();
    let rule = manager.get_or_insert_rule(".box").unwrap();

    manager.set_declaration(&rule, "backgroundColor", "red").unwrap();
    assert_eq!(rule.declaration("backgroundColor"), Some("red".to_string()));
    assert_eq!(rule.declaration("background-color"), Some("red".to_string()));
    assert_eq!(rule.css_text(), ".box { background-color: red; }");

    manager.set_declaration(&rule, "backgroundColor", StyleValue::Unset).unwrap();
    assert_eq!(rule.declaration("backgroundColor"), None);
    assert_eq!(rule.css_text(), ".box { }");
}

#[test]
fn numbers_get_units_where_needed() {
    let manager = manager();
    let rule = manager.get_or_insert_rule(".box").unwrap();

    rule.set_declaration("width", 10).unwrap();
    rule.set_declaration("opacity", 0.5).unwrap();
    rule.set_declaration("zIndex", 2).unwrap();

    assert_eq!(rule.declaration("width"), Some("10px".to_string()));
    assert_eq!(rule.declaration("opacity"), Some("0.5".to_string()));
    assert_eq!(rule.declaration("z-index"), Some("2".to_string()));
}

#[test]
fn configured_length_unit() {
    let config = ManagerConfig {
        length_unit: "rem".into(),
        ..ManagerConfig::default()
    };
    let manager: StyleSheetManager<MemoryCssom> = StyleSheetManager::new("test", MemoryStyleSheet::new(), config);
    let rule = manager.get_or_insert_rule(".box").unwrap();

    rule.set_declarations([("marginTop", 1.5), ("lineHeight", 1.2)]).unwrap();
    assert_eq!(rule.css_text(), ".box { margin-top: 1.5rem; line-height: 1.2; }");
}

#[test]
fn deleted_rule_comes_back_fresh() {
    let manager = manager();
    let old = manager.get_or_insert_rule(".a").unwrap();
    old.set_declaration("color", "red").unwrap();
    manager.delete_rule(&old).unwrap();

    let fresh = manager.get_or_insert_rule(".a").unwrap();
    assert!(!old.is_attached());
    assert!(fresh.is_attached());
    assert!(!old.native().is_same_rule(&manager.style_sheet().item(0).unwrap()));
    assert!(fresh.native().is_same_rule(&manager.style_sheet().item(0).unwrap()));
    assert_eq!(fresh.css_text(), ".a { }");
}

#[test]
fn deleting_twice_is_harmless() {
    testing_logger::setup();

    let manager = manager();
    let rule = manager.get_or_insert_rule(".a").unwrap();
    manager.get_or_insert_rule(".b").unwrap();

    manager.delete_rule(&rule).unwrap();
    manager.delete_rule(&rule).unwrap();
    rule.delete().unwrap();

    assert_eq!(manager.rule_count(), 1);
    assert_eq!(manager.css_text(), ".b { }");

    testing_logger::validate(|captured_logs| {
        let redundant = captured_logs
            .iter()
            .filter(|log| log.level == log::Level::Debug && log.body.contains("already removed"))
            .count();
        assert_eq!(redundant, 2);
    });
}

#[test]
fn detached_rule_ignores_declarations() {
    let manager = manager();
    let rule = manager.get_or_insert_rule(".a").unwrap();
    rule.delete().unwrap();

    assert!(rule.set_declaration("color", "red").is_ok());
    assert_eq!(rule.declaration("color"), None);
    assert_eq!(manager.rule_count(), 0);
}

#[test]
fn extend_concatenates_selectors() {
    let manager = manager();
    let rule = manager.get_or_insert_rule(".box").unwrap();

    let hover = manager.extend_selector(&rule, ":hover").unwrap();
    let child = rule.extend(" > span").unwrap();

    assert_eq!(hover.selector(), ".box:hover");
    assert_eq!(hover.native().selector_text(), ".box:hover");
    assert_eq!(child.selector(), ".box > span");
    assert_eq!(manager.rule_count(), 3);

    let again = rule.hover().unwrap();
    assert!(again.native().is_same_rule(&manager.style_sheet().item(1).unwrap()));
    assert_eq!(manager.rule_count(), 3);
}

#[test]
fn pseudo_class_sugar() {
    let manager = manager();
    let rule = manager.get_or_insert_rule(".btn").unwrap();

    assert_eq!(rule.hover().unwrap().selector(), ".btn:hover");
    assert_eq!(rule.focus().unwrap().selector(), ".btn:focus");
    assert_eq!(rule.active().unwrap().selector(), ".btn:active");
    assert_eq!(rule.disabled().unwrap().selector(), ".btn:disabled");
}

#[test]
fn extending_a_deleted_rule_fails() {
    let manager = manager();
    let rule = manager.get_or_insert_rule(".box").unwrap();
    rule.delete().unwrap();

    let err = manager.extend_selector(&rule, ":hover").unwrap_err();
    assert_eq!(
        err,
        CssomError::DetachedSelectorExtension {
            selector: ".box".into()
        }
    );
    assert!(err.to_string().contains(".box"));
    assert_eq!(manager.rule_count(), 0);
}

#[test]
fn button_with_hover() {
    let manager = manager();
    let button = manager.get_or_insert_rule(".btn").unwrap();
    button.set_declaration("color", "blue").unwrap();
    button.hover().unwrap().set_declaration("color", "navy").unwrap();

    assert_eq!(manager.rule_count(), 2);
    assert_eq!(manager.css_text(), ".btn { color: blue; }\n.btn:hover { color: navy; }");
}

#[test]
fn reinserted_rule_goes_to_the_end() {
    let manager = manager();
    let a = manager.get_or_insert_rule(".a").unwrap();
    let b = manager.get_or_insert_rule(".b").unwrap();

    a.delete().unwrap();
    assert_eq!(manager.rule_count(), 1);

    let a = manager.get_or_insert_rule(".a").unwrap();
    assert_eq!(a.index(), 1);
    assert_eq!(manager.css_text(), ".b { }\n.a { }");

    // .b moved from index 1 to 0; deleting it must not hit .a
    b.delete().unwrap();
    assert_eq!(manager.css_text(), ".a { }");
    assert!(a.is_attached());
}

#[test]
fn deleting_in_the_middle_keeps_other_rules_reachable() {
    for manager in [manager(), unverified_manager()] {
        let a = manager.get_or_insert_rule(".a").unwrap();
        let b = manager.get_or_insert_rule(".b").unwrap();
        let c = manager.get_or_insert_rule(".c").unwrap();
        let d = manager.get_or_insert_rule(".d").unwrap();

        b.delete().unwrap();
        d.delete().unwrap();
        a.delete().unwrap();

        assert_eq!(manager.css_text(), ".c { }");
        assert!(c.is_attached());

        c.hover().unwrap();
        assert_eq!(manager.css_text(), ".c { }\n.c:hover { }");
    }
}

#[test]
fn stale_handle_leaves_new_rule_alone() {
    let manager = manager();
    manager.get_or_insert_rule(".x").unwrap();
    let old = manager.get_or_insert_rule(".a").unwrap();
    old.delete().unwrap();

    let fresh = manager.get_or_insert_rule(".a").unwrap();
    old.delete().unwrap();

    assert!(fresh.is_attached());
    assert_eq!(manager.css_text(), ".x { }\n.a { }");
}

#[test]
fn removing_a_media_block() {
    let manager = manager();
    manager.get_or_insert_rule(".a").unwrap();
    let block = manager.get_or_insert_media_block("print").unwrap();
    let nested = block.get_or_insert_rule(".a").unwrap();
    let b = manager.get_or_insert_rule(".b").unwrap();

    manager.delete_media_block(&block).unwrap();
    block.remove().unwrap();

    assert!(!block.is_attached());
    assert!(!nested.is_attached());
    assert_eq!(manager.css_text(), ".a { }\n.b { }");

    assert!(matches!(
        block.get_or_insert_rule(".c"),
        Err(CssomError::DetachedSelectorExtension { .. })
    ));
    assert_eq!(
        nested.hover().unwrap_err(),
        CssomError::DetachedSelectorExtension { selector: ".a".into() }
    );

    b.delete().unwrap();
    assert_eq!(manager.css_text(), ".a { }");

    let again = manager.get_or_insert_media_block("print").unwrap();
    assert!(again.is_attached());
    assert_eq!(again.rule_count(), 0);
    assert_eq!(manager.css_text(), ".a { }\n@media print {\n}");
}

#[test]
fn nested_rules_are_renumbered_within_their_block() {
    let manager = manager();
    let block = manager.get_or_insert_media_block("screen").unwrap();
    let a = block.get_or_insert_rule(".a").unwrap();
    let b = block.get_or_insert_rule(".b").unwrap();
    let c = block.get_or_insert_rule(".c").unwrap();

    a.delete().unwrap();
    c.delete().unwrap();

    assert_eq!(block.rule_count(), 1);
    assert!(b.is_attached());
    assert_eq!(block.css_text(), "@media screen {\n  .b { }\n}");
}

#[test]
fn top_level_deletes_shift_media_blocks() {
    let manager = unverified_manager();
    let a = manager.get_or_insert_rule(".a").unwrap();
    let block = manager.get_or_insert_media_block("print").unwrap();
    manager.get_or_insert_rule(".b").unwrap();

    a.delete().unwrap();
    block.remove().unwrap();

    assert_eq!(manager.css_text(), ".b { }");
    assert_eq!(manager.media_block_count(), 0);
}

#[test]
fn attribute_selector_with_brace() {
    let manager = manager();
    let rule = manager.get_or_insert_rule(".box").unwrap();

    let attr = rule.extend(r#"[data-x="{"]"#).unwrap();
    attr.set_declaration("color", "red").unwrap();

    assert_eq!(attr.native().selector_text(), r#".box[data-x="{"]"#);
    assert_eq!(manager.css_text(), ".box { }\n.box[data-x=\"{\"] { color: red; }");
}

#[test]
fn platform_float_name() {
    let manager = manager();
    let rule = manager.get_or_insert_rule(".left").unwrap();

    rule.set_declaration("cssFloat", "left").unwrap();
    assert_eq!(rule.declaration("float"), Some("left".to_string()));
    assert_eq!(rule.css_text(), ".left { float: left; }");
}
