use shared::domain::ContactUpdate;
use url::form_urlencoded;

/// Reads `first`, `last` and `email` out of an `application/x-www-form-urlencoded`
/// body. Absent keys stay `None`; `key=` and a bare `key` both mean the empty
/// string. When a key repeats, its first value is used.
pub fn parse_contact_update(body: &str) -> ContactUpdate {
    let mut update = ContactUpdate::default();
    for (key, value) in form_urlencoded::parse(body.as_bytes()) {
        let slot = match key.as_ref() {
            "first" => &mut update.first,
            "last" => &mut update.last,
            "email" => &mut update.email,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }
    update
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
