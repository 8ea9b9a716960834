use super::*;

#[test]
fn absent_keys_are_no_change() {
    let update = parse_contact_update("first=Jane");
    assert_eq!(update.first.as_deref(), Some("Jane"));
    assert!(update.last.is_none());
    assert!(update.email.is_none());
}

#[test]
fn empty_value_is_distinct_from_absent() {
    let update = parse_contact_update("last=");
    assert_eq!(update.last.as_deref(), Some(""));
    assert!(update.first.is_none());

    let bare = parse_contact_update("email");
    assert_eq!(bare.email.as_deref(), Some(""));
}

#[test]
fn values_are_percent_decoded() {
    let update = parse_contact_update("first=Mary+Ann&email=m%40example.com&last=O%27Neil");
    assert_eq!(update.first.as_deref(), Some("Mary Ann"));
    assert_eq!(update.email.as_deref(), Some("m@example.com"));
    assert_eq!(update.last.as_deref(), Some("O'Neil"));
}

#[test]
fn unknown_keys_are_ignored() {
    let update = parse_contact_update("phone=555&first=A");
    assert_eq!(update.first.as_deref(), Some("A"));
    assert!(update.last.is_none());
    assert!(update.email.is_none());
}

#[test]
fn first_occurrence_wins() {
    let update = parse_contact_update("first=one&first=two");
    assert_eq!(update.first.as_deref(), Some("one"));
}

#[test]
fn empty_or_garbage_body_requests_nothing() {
    assert!(parse_contact_update("").is_empty());
    assert!(parse_contact_update("&&&").is_empty());
    assert!(parse_contact_update("{\"first\":\"json\"}").is_empty());
}
