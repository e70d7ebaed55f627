use uuid::Uuid;

/// Post-fetch redaction of owner-gated fields, independent of transport.
/// Returns the value only when the requester is the subject; anonymous
/// requesters never match.
pub fn owner_gated<T>(subject: Uuid, requester: Option<Uuid>, value: T) -> Option<T> {
    match requester {
        Some(id) if id == subject => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_sees_gated_value() {
        let owner = Uuid::new_v4();
        assert_eq!(owner_gated(owner, Some(owner), "secret"), Some("secret"));
    }

    #[test]
    fn other_user_does_not() {
        let owner = Uuid::new_v4();
        assert_eq!(owner_gated(owner, Some(Uuid::new_v4()), "secret"), None);
    }

    #[test]
    fn anonymous_does_not() {
        assert_eq!(owner_gated(Uuid::new_v4(), None, "secret"), None);
    }
}
