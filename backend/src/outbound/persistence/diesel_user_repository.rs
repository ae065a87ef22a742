//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRecord, UserRepository, UserRepositoryError};
use crate::domain::{Credits, DisplayName, EmailAddress, PasswordHash, User, UserId};

use super::diesel_basic_error_mapping::{log_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

/// Map Diesel errors, surfacing the email uniqueness constraint.
fn map_diesel_error(error: DieselError, email: Option<&str>) -> UserRepositoryError {
    log_diesel_error(&error);

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => match email {
            Some(email) => UserRepositoryError::duplicate_email(email),
            None => UserRepositoryError::query("unique constraint violated"),
        },
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserRepositoryError::connection("database connection error")
        }
        DieselError::NotFound => UserRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserRepositoryError::query("database query error"),
        _ => UserRepositoryError::query("database error"),
    }
}

/// Rebuild the domain account from a stored row.
///
/// Stored values were validated on the way in; a failure here means the row
/// was edited out of band.
pub(crate) fn row_to_record(row: UserRow) -> Result<UserRecord, UserRepositoryError> {
    let display_name = DisplayName::new(row.display_name).map_err(|err| {
        UserRepositoryError::query(format!("invalid display name in database: {err}"))
    })?;
    let email = EmailAddress::new(&row.email)
        .map_err(|err| UserRepositoryError::query(format!("invalid email in database: {err}")))?;
    Ok(UserRecord {
        user: User::new(
            UserId::from_uuid(row.id),
            display_name,
            email,
            Credits::new(row.credits),
        ),
        password_hash: PasswordHash::new(row.password_hash),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, record: &UserRecord) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user = &record.user;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            display_name: user.display_name().as_ref(),
            email: user.email().as_ref(),
            password_hash: record.password_hash.as_ref(),
            credits: user.credits().value(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, Some(user.email().as_ref())))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;

        row.map(|row| row_to_record(row).map(|record| record.user))
            .transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserRecord>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;

        row.map(row_to_record).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(display_name: &str, email: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            display_name: display_name.to_owned(),
            email: email.to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            credits: -1,
        }
    }

    #[rstest]
    fn unique_violation_maps_to_duplicate_email() {
        let err = map_diesel_error(
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                Box::new("users_email_key".to_owned()),
            ),
            Some("ada@campus.edu"),
        );

        assert_eq!(err, UserRepositoryError::duplicate_email("ada@campus.edu"));
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(err, UserRepositoryError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn row_preserves_negative_balance() {
        let record = row_to_record(row("Ada Lovelace", "ada@campus.edu")).expect("valid row");

        assert_eq!(record.user.credits().value(), -1);
        assert_eq!(record.password_hash.as_ref(), "$argon2id$stub");
    }

    #[rstest]
    #[case("x", "ada@campus.edu")]
    #[case("Ada Lovelace", "not-an-email")]
    fn corrupted_rows_are_query_errors(#[case] name: &str, #[case] email: &str) {
        let err = row_to_record(row(name, email)).expect_err("corrupted");

        assert!(matches!(err, UserRepositoryError::Query { .. }));
    }
}
