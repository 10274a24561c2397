// Plaintext credential gate over the login CSV. This is not a security
// design, merely the gate the dashboards sit behind: usernames are trimmed
// strings, passwords plain integers compared for equality.
use crate::error::EngineError;
use crate::session::Session;
use painel_shared::models::LoginRecord;

/// Checks a username/password pair against the login table. The entered
/// password must parse as an integer; anything else is rejected with a
/// user-visible message before any lookup happens.
pub fn verify_login(
    logins: &[LoginRecord],
    username: &str,
    password_input: &str,
) -> Result<bool, EngineError> {
    let password: i64 = password_input
        .trim()
        .parse()
        .map_err(|_| EngineError::InvalidPassword)?;
    let username = username.trim();

    Ok(logins
        .iter()
        .any(|l| l.username == username && l.password == password))
}

/// Runs the gate and, on success, opens an explicit session that page
/// handlers receive (there is no global authenticated flag).
pub fn login(
    logins: &[LoginRecord],
    username: &str,
    password_input: &str,
) -> Result<Option<Session>, EngineError> {
    if verify_login(logins, username, password_input)? {
        tracing::info!(username = username.trim(), "Login bem-sucedido");
        Ok(Some(Session::new(username.trim())))
    } else {
        tracing::warn!(username = username.trim(), "Usuário ou senha incorretos");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logins() -> Vec<LoginRecord> {
        vec![
            LoginRecord {
                username: "gestor".to_string(),
                password: 1234,
            },
            LoginRecord {
                username: "auditor".to_string(),
                password: 99,
            },
        ]
    }

    #[test]
    fn test_valid_credentials() {
        assert!(verify_login(&logins(), "gestor", "1234").unwrap());
    }

    #[test]
    fn test_username_is_trimmed() {
        assert!(verify_login(&logins(), "  gestor ", "1234").unwrap());
    }

    #[test]
    fn test_wrong_password() {
        assert!(!verify_login(&logins(), "gestor", "4321").unwrap());
    }

    #[test]
    fn test_unknown_user() {
        assert!(!verify_login(&logins(), "intruso", "1234").unwrap());
    }

    #[test]
    fn test_non_numeric_password_is_an_error() {
        let err = verify_login(&logins(), "gestor", "senha").unwrap_err();
        assert!(matches!(err, EngineError::InvalidPassword));
    }

    #[test]
    fn test_login_opens_session() {
        let session = login(&logins(), " auditor ", "99").unwrap();
        assert_eq!(session.unwrap().username, "auditor");
    }

    #[test]
    fn test_login_failure_yields_no_session() {
        assert!(login(&logins(), "auditor", "100").unwrap().is_none());
    }
}
