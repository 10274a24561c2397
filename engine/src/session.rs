// Explicit session context handed to each page handler. There is no global
// authenticated flag anywhere; dropping the session is logout.
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(username: &str) -> Self {
        Session {
            username: username.to_string(),
            started_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_carries_username() {
        let s = Session::new("gestor");
        assert_eq!(s.username, "gestor");
        assert!(s.started_at <= Utc::now());
    }
}
