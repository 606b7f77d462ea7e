use super::*;
use crate::GamelistStore;

fn first_record(xml: &str) -> GameRecord {
    let store = GamelistStore::parse(xml).unwrap();
    store.records().next().unwrap().clone()
}

const ONE_GAME: &str = "<gameList>\n\t<game id=\"42\">\n\t\t<path>./Foo (Disc 1).chd</path>\n\t\t<name>Foo</name>\n\t\t<image>./Imgs/Foo (Disc 1).png</image>\n\t\t<rating>0.8</rating>\n\t</game>\n</gameList>";

#[test]
fn typed_accessors() {
    let rec = first_record(ONE_GAME);
    assert_eq!(rec.path(), Some("./Foo (Disc 1).chd"));
    assert_eq!(rec.name(), Some("Foo"));
    assert_eq!(rec.image(), Some("./Imgs/Foo (Disc 1).png"));
    assert_eq!(rec.marquee(), None);
    assert_eq!(rec.get("rating"), Some("0.8"));
}

#[test]
fn untouched_record_renders_source() {
    let rec = first_record(ONE_GAME);
    let start = ONE_GAME.find("<game ").unwrap();
    let end = ONE_GAME.find("</game>").unwrap() + "</game>".len();
    assert_eq!(rec.to_xml(), &ONE_GAME[start..end]);
}

#[test]
fn upsert_existing_keeps_position() {
    let mut rec = first_record(ONE_GAME);
    assert!(rec.upsert("path", "./Foo.m3u"));
    let xml = rec.to_xml();
    assert_eq!(
        xml,
        "<game id=\"42\">\n\t\t<path>./Foo.m3u</path>\n\t\t<name>Foo</name>\n\t\t<image>./Imgs/Foo (Disc 1).png</image>\n\t\t<rating>0.8</rating>\n\t</game>"
    );
}

#[test]
fn upsert_same_value_is_noop() {
    let mut rec = first_record(ONE_GAME);
    assert!(!rec.upsert("name", "Foo"));
}

#[test]
fn upsert_new_field_uses_record_indentation() {
    let mut rec = first_record(ONE_GAME);
    assert!(rec.upsert("marquee", "./marquees/Foo.png"));
    assert!(rec.to_xml().ends_with(
        "<rating>0.8</rating>\n\t\t<marquee>./marquees/Foo.png</marquee>\n\t</game>"
    ));
    assert_eq!(rec.marquee(), Some("./marquees/Foo.png"));
}

#[test]
fn upsert_on_self_closing_record() {
    let mut rec = first_record("<gameList><game source=\"x\" /></gameList>");
    assert!(rec.upsert("path", "./a.zip"));
    assert_eq!(
        rec.to_xml(),
        "<game source=\"x\">\n\t\t<path>./a.zip</path>\n\t</game>"
    );
}

#[test]
fn new_values_are_escaped() {
    let mut rec = GameRecord::new();
    rec.upsert("name", "Tom & Jerry <Disc>");
    assert!(rec.to_xml().contains("<name>Tom &amp; Jerry &lt;Disc&gt;</name>"));
    assert_eq!(rec.name(), Some("Tom & Jerry <Disc>"));
}

#[test]
fn escaped_source_values_are_unescaped() {
    let rec = first_record("<gameList><game><name>Tom &amp; Jerry</name></game></gameList>");
    assert_eq!(rec.name(), Some("Tom & Jerry"));
}

#[test]
fn test_escape_xml() {
    assert_eq!(escape_xml("Tom & Jerry"), "Tom &amp; Jerry");
    assert_eq!(escape_xml("a < b"), "a &lt; b");
}
