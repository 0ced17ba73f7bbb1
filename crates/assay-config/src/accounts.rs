//! Test accounts and other JSON test data.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ConfigError;

/// Name of the account most suites log in with.
pub const COMMON_USER: &str = "common_user";

/// Credentials of one test user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// Login e-mail.
    pub user_email: String,
    /// Display name.
    pub user_name: String,
    /// Password.
    pub password: String,
}

/// Contents of a test account file.
///
/// ```json
/// {
///   "users": {
///     "common_user": {"user_email": "qa@example.com", "user_name": "QA", "password": "pw"}
///   },
///   "secret_keys": {"device": "abc"}
/// }
/// ```
///
/// Keys other than `users` are kept in [`extra`](Self::extra).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TestAccounts {
    /// Accounts by role name.
    #[serde(default)]
    pub users: IndexMap<String, Account>,

    /// Any other test data in the file.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TestAccounts {
    /// Reads and parses a JSON account file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        content.parse()
    }

    /// Account registered under `role`.
    pub fn user(&self, role: &str) -> Result<&Account, ConfigError> {
        self.users
            .get(role)
            .ok_or_else(|| ConfigError::missing_field(format!("users.{role}")))
    }

    /// The `common_user` account.
    pub fn common_user(&self) -> Result<&Account, ConfigError> {
        self.user(COMMON_USER)
    }

    /// Extra top-level value `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

impl FromStr for TestAccounts {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    const ACCOUNTS: &str = r#"{
        "users": {
            "common_user": {
                "user_email": "qa@example.com",
                "user_name": "QA User",
                "password": "s3cret"
            },
            "admin": {
                "user_email": "admin@example.com",
                "user_name": "Admin",
                "password": "r00t"
            }
        },
        "secret_keys": {"device": "abc123"}
    }"#;

    #[test]
    fn test_parse() {
        let accounts: TestAccounts = ACCOUNTS.parse().unwrap();
        let common = accounts.common_user().unwrap();
        assert_eq!(common.user_email, "qa@example.com");
        assert_eq!(common.user_name, "QA User");
        assert_eq!(common.password, "s3cret");

        assert_eq!(accounts.user("admin").unwrap().password, "r00t");
        assert_eq!(accounts.get("secret_keys"), Some(&json!({"device": "abc123"})));
        assert_eq!(accounts.users.keys().collect::<Vec<_>>(), ["common_user", "admin"]);
    }

    #[test]
    fn test_missing_user() {
        let accounts: TestAccounts = r#"{"users": {}}"#.parse().unwrap();
        let err = accounts.common_user().unwrap_err();
        assert!(err.to_string().contains("users.common_user"));
    }

    #[test]
    fn test_incomplete_account_rejected() {
        let result: Result<TestAccounts, _> =
            r#"{"users": {"common_user": {"user_email": "a@b.c"}}}"#.parse();
        assert!(matches!(result, Err(ConfigError::JsonError(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ACCOUNTS.as_bytes()).unwrap();

        let accounts = TestAccounts::from_file(file.path()).unwrap();
        assert_eq!(accounts.users.len(), 2);

        assert!(matches!(
            TestAccounts::from_file("/nonexistent/test_account.json"),
            Err(ConfigError::FileNotFound { .. })
        ));
    }
}
