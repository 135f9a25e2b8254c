//! User accounts for the cafe console client.
//!
//! Account creation and credential checks against the `USERS` table.
//! Passwords are stored and compared as plain text; this crate does no
//! hashing.

use cafe_db::{params, Database, DbError};
use cafe_types::{NewUser, UserType};
use thiserror::Error;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("login cannot be empty")]
    EmptyLogin,
}

/// A user whose credentials matched a `USERS` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedUser {
    pub login: String,
    pub user_type: UserType,
}

/// Inserts a new user with an empty favorites list.
///
/// A login that is already taken fails with the database's uniqueness error.
pub fn create_user(db: &Database, user: &NewUser) -> Result<(), AccountError> {
    if user.login.trim().is_empty() {
        return Err(AccountError::EmptyLogin);
    }

    db.execute_update(
        "INSERT INTO USERS (phoneNum, login, password, favItems, type) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.phone_num,
            user.login,
            user.password,
            "",
            user.user_type.as_str(),
        ],
    )?;

    tracing::info!(login = %user.login, user_type = %user.user_type, "user created");
    Ok(())
}

/// Checks a login/password pair.
///
/// Returns `None` when no row matches. A stored role tag that is not
/// recognised is treated as [`UserType::Customer`].
pub fn log_in(
    db: &Database,
    login: &str,
    password: &str,
) -> Result<Option<AuthorizedUser>, AccountError> {
    let matches = db.execute_query(
        "SELECT * FROM USERS WHERE login = ?1 AND password = ?2",
        params![login, password],
    )?;
    if matches == 0 {
        tracing::info!(login, "login rejected");
        return Ok(None);
    }

    let rows = db.execute_query_and_return_result("SELECT type FROM USERS WHERE login = ?1", [login])?;
    let user_type = match rows.first().and_then(|row| row.first()) {
        Some(tag) => tag.parse().unwrap_or_else(|e| {
            tracing::warn!(login, error = %e, "unrecognised user type, treating as customer");
            UserType::Customer
        }),
        None => UserType::Customer,
    };

    tracing::info!(login, %user_type, "login accepted");
    Ok(Some(AuthorizedUser {
        login: login.to_string(),
        user_type,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_db::DbRuntimeSettings;

    fn test_db() -> Database {
        let db = Database::open_in_memory(DbRuntimeSettings::default())
            .expect("should open in-memory db");
        db.apply_schema().expect("schema should apply");
        db
    }

    fn new_user(login: &str, password: &str, phone: &str) -> NewUser {
        NewUser {
            login: login.to_string(),
            password: password.to_string(),
            phone_num: phone.to_string(),
            user_type: UserType::Customer,
        }
    }

    #[test]
    fn created_user_can_log_in() {
        let db = test_db();
        create_user(&db, &new_user("alice", "p1", "555-1000")).expect("create should succeed");

        let user = log_in(&db, "alice", "p1")
            .expect("login query should succeed")
            .expect("credentials should match");
        assert_eq!(user.login, "alice");
        assert_eq!(user.user_type, UserType::Customer);
    }

    #[test]
    fn wrong_password_or_unknown_login_is_rejected() {
        let db = test_db();
        create_user(&db, &new_user("alice", "p1", "555-1000")).expect("create should succeed");

        assert_eq!(log_in(&db, "alice", "p2").unwrap(), None);
        assert_eq!(log_in(&db, "mallory", "p1").unwrap(), None);
        assert_eq!(log_in(&db, "alice", "' OR '1'='1").unwrap(), None);
    }

    #[test]
    fn created_user_row_has_empty_favorites_and_role_tag() {
        let db = test_db();
        create_user(&db, &new_user("alice", "p1", "555-1000")).expect("create should succeed");

        let rows = db
            .execute_query_and_return_result(
                "SELECT phoneNum, login, password, favItems, type FROM USERS",
                [],
            )
            .expect("query should succeed");
        assert_eq!(rows, vec![vec!["555-1000", "alice", "p1", "", "Customer"]]);
    }

    #[test]
    fn duplicate_login_is_a_database_error() {
        let db = test_db();
        create_user(&db, &new_user("alice", "p1", "555-1000")).expect("create should succeed");

        let err = create_user(&db, &new_user("alice", "other", "555-2000"))
            .expect_err("duplicate login should fail");
        assert!(matches!(err, AccountError::Database(_)), "unexpected error: {err:?}");
    }

    #[test]
    fn empty_login_is_rejected_before_touching_the_database() {
        let db = test_db();
        let err = create_user(&db, &new_user("  ", "p1", "555-1000"))
            .expect_err("empty login should fail");
        assert!(matches!(err, AccountError::EmptyLogin));
        assert_eq!(db.execute_query("SELECT * FROM USERS", []).unwrap(), 0);
    }

    #[test]
    fn manager_role_is_reported() {
        let db = test_db();
        let mut manager = new_user("boss", "pw", "555-9999");
        manager.user_type = UserType::Manager;
        create_user(&db, &manager).expect("create should succeed");

        let user = log_in(&db, "boss", "pw").unwrap().expect("should log in");
        assert_eq!(user.user_type, UserType::Manager);
    }

    #[test]
    fn unknown_role_tag_falls_back_to_customer() {
        let db = test_db();
        db.execute_update(
            "INSERT INTO USERS (phoneNum, login, password, favItems, type) VALUES ('1', 'eve', 'pw', '', 'Barista')",
            [],
        )
        .expect("insert should succeed");

        let user = log_in(&db, "eve", "pw").unwrap().expect("should log in");
        assert_eq!(user.user_type, UserType::Customer);
    }
}
