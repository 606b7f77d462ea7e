use super::*;

#[test]
fn extracts_prefix_payload_and_suffix() {
    let text = "<?xml version=\"1.0\"?>\n<gameList>\n\t<game/>\n</gameList>\n<!-- tail -->\n";
    let p = extract_payload(text).unwrap();
    assert_eq!(p.prefix, "<?xml version=\"1.0\"?>\n");
    assert_eq!(p.payload, "<gameList>\n\t<game/>\n</gameList>");
    assert_eq!(p.suffix, "\n<!-- tail -->\n");
    assert_eq!(p.inner(), "\n\t<game/>\n");
}

#[test]
fn embedded_in_larger_document() {
    let text = "<root><other/><gameList></gameList><after/></root>";
    let p = extract_payload(text).unwrap();
    assert_eq!(p.prefix, "<root><other/>");
    assert_eq!(p.inner(), "");
    assert_eq!(p.suffix, "<after/></root>");
}

#[test]
fn missing_open_marker() {
    assert!(matches!(
        extract_payload("<games></games>"),
        Err(GamelistError::MissingMarkers)
    ));
}

#[test]
fn close_marker_before_open_is_missing() {
    assert!(matches!(
        extract_payload("</gameList><gameList>"),
        Err(GamelistError::MissingMarkers)
    ));
}
