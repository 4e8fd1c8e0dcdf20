//! JSON preset.

use clasp_core::{Marshaler, Unmarshaler};

use crate::Client;
use crate::mutator::{json_accept, json_content_type};

/// Switch `client` to JSON: JSON codecs for both directions, plus the
/// [`json_content_type`] and [`json_accept`] request mutators appended after
/// any already registered.
///
/// # Example
///
/// ```
/// use clasp::{Client, setup_for_json};
///
/// # fn main() -> clasp::Result<()> {
/// let mut client = Client::new("https://api.example.com")?;
/// setup_for_json(&mut client);
///
/// assert_eq!(client.marshaler().name(), "json");
/// assert_eq!(client.request_mutators().len(), 2);
/// # Ok(())
/// # }
/// ```
pub fn setup_for_json(client: &mut Client) {
    client.set_marshaler(Marshaler::json());
    client.set_unmarshaler(Unmarshaler::json());
    client.add_request_mutators([json_content_type(), json_accept()]);
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;
    use crate::{Mutator, RequestMutator};

    #[test]
    fn setup_keeps_existing_mutators_first() {
        let mut client = Client::new("http://localhost:8080").expect("client");
        client.add_request_mutators([RequestMutator::named("auth", |_| Ok(()))]);

        setup_for_json(&mut client);

        let names: Vec<_> = client.request_mutators().iter().map(Mutator::name).collect();
        check!(names == ["auth", "json_content_type", "json_accept"]);
        check!(client.unmarshaler().name() == "json");
    }
}
