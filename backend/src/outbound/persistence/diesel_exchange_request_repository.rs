//! PostgreSQL-backed `ExchangeRequestRepository` implementation.
//!
//! Decisions run in one transaction. The status change is a conditional
//! update guarded on `status = 'pending'`, which takes the row lock and makes
//! concurrent decisions on the same request serialise; the loser observes
//! zero affected rows and reports `AlreadyDecided`. Approval then adjusts
//! both balances in ascending user-id order so transfers touching the same
//! pair of accounts always lock them in the same sequence.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{ExchangeRequestRepository, ExchangeRequestRepositoryError};
use crate::domain::{
    DecisionUnitOfWork, DisplayName, ExchangeRequest, OwnerRequestView, RequestId, RequestStatus,
    RequesterRequestView, ResourceId, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ExchangeRequestRow, NewExchangeRequestRow};
use super::pool::{DbPool, PoolError};
use super::schema::{exchange_requests, resources, users};

/// Diesel-backed implementation of the `ExchangeRequestRepository` port.
#[derive(Clone)]
pub struct DieselExchangeRequestRepository {
    pool: DbPool,
}

impl DieselExchangeRequestRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ExchangeRequestRepositoryError {
    map_basic_pool_error(error, ExchangeRequestRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> ExchangeRequestRepositoryError {
    map_basic_diesel_error(
        error,
        ExchangeRequestRepositoryError::query,
        ExchangeRequestRepositoryError::connection,
    )
}

/// Reasons the decision transaction rolled back.
#[derive(Debug)]
enum DecisionFailure {
    Missing,
    AlreadyDecided(String),
    AccountMissing(UserId),
    Database(DieselError),
}

impl From<DieselError> for DecisionFailure {
    fn from(error: DieselError) -> Self {
        Self::Database(error)
    }
}

fn map_decision_failure(
    failure: DecisionFailure,
    request_id: RequestId,
) -> ExchangeRequestRepositoryError {
    match failure {
        DecisionFailure::Missing => ExchangeRequestRepositoryError::missing(request_id.to_string()),
        DecisionFailure::AlreadyDecided(status) => {
            ExchangeRequestRepositoryError::already_decided(status)
        }
        DecisionFailure::AccountMissing(user_id) => {
            warn!(%user_id, %request_id, "ledger account missing during decision");
            ExchangeRequestRepositoryError::transaction(format!("account {user_id} not found"))
        }
        DecisionFailure::Database(error) => match map_diesel_error(error) {
            ExchangeRequestRepositoryError::Query { message } => {
                ExchangeRequestRepositoryError::transaction(message)
            }
            other => other,
        },
    }
}

pub(crate) fn row_to_request(
    row: ExchangeRequestRow,
) -> Result<ExchangeRequest, ExchangeRequestRepositoryError> {
    let status: RequestStatus = row.status.parse().map_err(|err| {
        ExchangeRequestRepositoryError::query(format!("invalid request status in database: {err}"))
    })?;
    Ok(ExchangeRequest {
        id: RequestId::from_uuid(row.id),
        resource_id: ResourceId::from_uuid(row.resource_id),
        requester_id: UserId::from_uuid(row.requester_id),
        status,
        created_at: row.created_at,
    })
}

fn stored_name(name: String) -> Result<DisplayName, ExchangeRequestRepositoryError> {
    DisplayName::new(name).map_err(|err| {
        ExchangeRequestRepositoryError::query(format!("invalid display name in database: {err}"))
    })
}

#[async_trait]
impl ExchangeRequestRepository for DieselExchangeRequestRepository {
    async fn insert(
        &self,
        request: &ExchangeRequest,
    ) -> Result<(), ExchangeRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewExchangeRequestRow {
            id: *request.id.as_uuid(),
            resource_id: *request.resource_id.as_uuid(),
            requester_id: *request.requester_id.as_uuid(),
            status: request.status.as_str(),
            created_at: request.created_at,
        };

        diesel::insert_into(exchange_requests::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &RequestId,
    ) -> Result<Option<ExchangeRequest>, ExchangeRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ExchangeRequestRow> = exchange_requests::table
            .filter(exchange_requests::id.eq(id.as_uuid()))
            .select(ExchangeRequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_request).transpose()
    }

    async fn list_for_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<OwnerRequestView>, ExchangeRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(ExchangeRequestRow, String, String)> = exchange_requests::table
            .inner_join(resources::table)
            .inner_join(users::table.on(users::id.eq(exchange_requests::requester_id)))
            .filter(resources::owner_id.eq(owner_id.as_uuid()))
            .order((
                exchange_requests::created_at.desc(),
                exchange_requests::id.desc(),
            ))
            .select((
                ExchangeRequestRow::as_select(),
                resources::title,
                users::display_name,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, resource_title, requester_name)| {
                Ok(OwnerRequestView {
                    request: row_to_request(row)?,
                    resource_title,
                    requester_name: stored_name(requester_name)?,
                })
            })
            .collect()
    }

    async fn list_for_requester(
        &self,
        requester_id: &UserId,
    ) -> Result<Vec<RequesterRequestView>, ExchangeRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(ExchangeRequestRow, String, String)> = exchange_requests::table
            .inner_join(resources::table)
            .inner_join(users::table.on(users::id.eq(resources::owner_id)))
            .filter(exchange_requests::requester_id.eq(requester_id.as_uuid()))
            .order((
                exchange_requests::created_at.desc(),
                exchange_requests::id.desc(),
            ))
            .select((
                ExchangeRequestRow::as_select(),
                resources::title,
                users::display_name,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, resource_title, owner_name)| {
                Ok(RequesterRequestView {
                    request: row_to_request(row)?,
                    resource_title,
                    owner_name: stored_name(owner_name)?,
                })
            })
            .collect()
    }

    async fn commit_decision(
        &self,
        work: &DecisionUnitOfWork,
    ) -> Result<ExchangeRequest, ExchangeRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let request_id = work.request_id();
        let expected = work.expected_status().as_str();
        let new_status = work.new_status().as_str();

        let row = conn
            .transaction::<_, DecisionFailure, _>(|conn| {
                async move {
                    let updated: Option<ExchangeRequestRow> = diesel::update(
                        exchange_requests::table
                            .filter(exchange_requests::id.eq(request_id.as_uuid()))
                            .filter(exchange_requests::status.eq(expected)),
                    )
                    .set(exchange_requests::status.eq(new_status))
                    .returning(ExchangeRequestRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;

                    let Some(row) = updated else {
                        let current: Option<String> = exchange_requests::table
                            .filter(exchange_requests::id.eq(request_id.as_uuid()))
                            .select(exchange_requests::status)
                            .first(conn)
                            .await
                            .optional()?;
                        return Err(match current {
                            Some(status) => DecisionFailure::AlreadyDecided(status),
                            None => DecisionFailure::Missing,
                        });
                    };

                    if let Some(transfer) = work.transfer() {
                        for user_id in transfer.lock_order() {
                            let delta = transfer.delta_for(user_id);
                            let touched = diesel::update(
                                users::table.filter(users::id.eq(user_id.as_uuid())),
                            )
                            .set(users::credits.eq(users::credits + delta))
                            .execute(conn)
                            .await?;
                            if touched != 1 {
                                return Err(DecisionFailure::AccountMissing(user_id));
                            }
                        }
                    }

                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(|failure| map_decision_failure(failure, request_id))?;

        row_to_request(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use diesel::result::DatabaseErrorKind;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(status: &str) -> ExchangeRequestRow {
        ExchangeRequestRow {
            id: Uuid::new_v4(),
            resource_id: Uuid::new_v4(),
            requester_id: Uuid::new_v4(),
            status: status.to_owned(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("pending", RequestStatus::Pending)]
    #[case("approved", RequestStatus::Approved)]
    #[case("denied", RequestStatus::Denied)]
    fn row_status_parses(#[case] stored: &str, #[case] expected: RequestStatus) {
        assert_eq!(row_to_request(row(stored)).expect("valid").status, expected);
    }

    #[rstest]
    fn unknown_status_is_a_query_error() {
        let err = row_to_request(row("cancelled")).expect_err("unknown status");
        assert!(matches!(err, ExchangeRequestRepositoryError::Query { .. }));
    }

    #[rstest]
    fn lost_race_reports_current_status() {
        let err = map_decision_failure(
            DecisionFailure::AlreadyDecided("denied".to_owned()),
            RequestId::random(),
        );
        assert_eq!(err, ExchangeRequestRepositoryError::already_decided("denied"));
    }

    #[rstest]
    #[case(DecisionFailure::AccountMissing(UserId::random()))]
    #[case(DecisionFailure::Database(DieselError::RollbackTransaction))]
    #[case(DecisionFailure::Database(DieselError::DatabaseError(
        DatabaseErrorKind::SerializationFailure,
        Box::new("could not serialize access".to_owned()),
    )))]
    fn rolled_back_units_are_transaction_errors(#[case] failure: DecisionFailure) {
        let err = map_decision_failure(failure, RequestId::random());
        assert!(matches!(err, ExchangeRequestRepositoryError::Transaction { .. }));
    }

    #[rstest]
    fn closed_connection_stays_a_connection_error() {
        let err = map_decision_failure(
            DecisionFailure::Database(DieselError::DatabaseError(
                DatabaseErrorKind::ClosedConnection,
                Box::new("gone".to_owned()),
            )),
            RequestId::random(),
        );
        assert!(matches!(err, ExchangeRequestRepositoryError::Connection { .. }));
    }
}
