use crate::events::ErrorSignal;

pub const GENERIC_ERROR: &str = "Ein Fehler ist aufgetreten.";
pub const NAVIGATION_FAILED: &str = "Navigation fehlgeschlagen";

/// User-facing text for an error signal; `not_found` is the screen's copy
/// for a 404.
pub fn error_message(signal: &ErrorSignal, not_found: &str) -> String {
    match signal {
        ErrorSignal::Status(404) => not_found.to_string(),
        ErrorSignal::Message(text) => text.clone(),
        ErrorSignal::Status(_) | ErrorSignal::Network | ErrorSignal::Unknown => {
            GENERIC_ERROR.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let not_found = "Kein Flug gefunden.";
        assert_eq!(error_message(&ErrorSignal::Status(404), not_found), not_found);
        assert_eq!(error_message(&ErrorSignal::Status(500), not_found), GENERIC_ERROR);
        assert_eq!(error_message(&ErrorSignal::Network, not_found), GENERIC_ERROR);
        assert_eq!(error_message(&ErrorSignal::Unknown, not_found), GENERIC_ERROR);
        assert_eq!(
            error_message(&ErrorSignal::Message("Wartung".into()), not_found),
            "Wartung"
        );
    }
}
