//! Notification inbox HTTP handlers.
//!
//! Every route is scoped to the caller; another user's notification is
//! reported as not found.

use actix_web::{delete, get, patch, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Notification, NotificationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_identifier};

/// A notification addressed to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(example = "Your request for \"Sofa\" was approved.")]
    pub message: String,
    pub read: bool,
    #[schema(format = "date-time")]
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationBody {
    fn from(value: Notification) -> Self {
        Self {
            id: value.id.to_string(),
            message: value.message.as_ref().to_owned(),
            read: value.read,
            created_at: value.created_at,
        }
    }
}

/// Acknowledgement for deletions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub ok: bool,
}

fn notification_id(path: web::Path<String>) -> Result<NotificationId, Error> {
    parse_identifier(&path.into_inner(), FieldName::new("id"), NotificationId::new)
}

/// Caller's notifications, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (status = 200, description = "Notifications", body = [NotificationBody]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications",
    security(("BearerToken" = []))
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<NotificationBody>>> {
    let notifications = state.notifications.list(&caller.id()).await?;
    Ok(web::Json(notifications.into_iter().map(Into::into).collect()))
}

/// Mark one of the caller's notifications as read.
#[utoipa::path(
    patch,
    path = "/api/v1/notifications/{id}",
    params(("id" = String, Path, description = "Notification identifier", format = "uuid")),
    responses(
        (status = 200, description = "Notification marked read", body = NotificationBody),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Notification not found", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead",
    security(("BearerToken" = []))
)]
#[patch("/notifications/{id}")]
pub async fn mark_notification_read(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<NotificationBody>> {
    let id = notification_id(path)?;
    let notification = state.notifications.mark_read(&id, &caller.id()).await?;
    Ok(web::Json(notification.into()))
}

/// Delete one of the caller's notifications.
#[utoipa::path(
    delete,
    path = "/api/v1/notifications/{id}",
    params(("id" = String, Path, description = "Notification identifier", format = "uuid")),
    responses(
        (status = 200, description = "Notification deleted", body = DeletedResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Notification not found", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "deleteNotification",
    security(("BearerToken" = []))
)]
#[delete("/notifications/{id}")]
pub async fn delete_notification(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedResponse>> {
    let id = notification_id(path)?;
    state.notifications.delete(&id, &caller.id()).await?;
    Ok(web::Json(DeletedResponse { ok: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::NotificationRepository;
    use crate::domain::{NotificationDraft, NotificationMessage, User};
    use crate::inbound::http::test_utils::{TestMarketplace, fixed_now};
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{App, test as actix_test};
    use chrono::TimeDelta;
    use rstest::rstest;

    fn test_app(
        market: &TestMarketplace,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new().app_data(web::Data::new(market.state())).service(
            web::scope("/api/v1")
                .service(list_notifications)
                .service(mark_notification_read)
                .service(delete_notification),
        )
    }

    async fn notify(market: &TestMarketplace, user: &User, title: &str, minutes: i64) -> Notification {
        let notification = Notification::from_draft(
            NotificationId::random(),
            NotificationDraft::new(user.id(), NotificationMessage::request_approved(title)),
            fixed_now() + TimeDelta::minutes(minutes),
        );
        NotificationRepository::insert(market.store.as_ref(), &notification)
            .await
            .expect("notification stored");
        notification
    }

    #[actix_web::test]
    async fn lists_only_the_callers_notifications_newest_first() {
        let market = TestMarketplace::new();
        let (alice, bearer) = market.user("Alice", 10).await;
        let (bobby, _) = market.user("Bobby", 10).await;
        notify(&market, &alice, "Lamp", 0).await;
        notify(&market, &alice, "Sofa", 5).await;
        notify(&market, &bobby, "Desk", 10).await;
        let app = actix_test::init_service(test_app(&market)).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/notifications")
            .insert_header((AUTHORIZATION, bearer))
            .to_request();
        let listed: Vec<NotificationBody> = actix_test::call_and_read_body_json(&app, request).await;

        let messages: Vec<&str> = listed.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Your request for \"Sofa\" was approved.",
                "Your request for \"Lamp\" was approved.",
            ]
        );
    }

    #[actix_web::test]
    async fn mark_read_returns_the_updated_notification() {
        let market = TestMarketplace::new();
        let (alice, bearer) = market.user("Alice", 10).await;
        let stored = notify(&market, &alice, "Lamp", 0).await;
        let app = actix_test::init_service(test_app(&market)).await;

        let request = actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/notifications/{}", stored.id))
            .insert_header((AUTHORIZATION, bearer))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: NotificationBody = actix_test::read_body_json(response).await;
        assert!(body.read);
    }

    #[actix_web::test]
    async fn delete_acknowledges_with_ok() {
        let market = TestMarketplace::new();
        let (alice, bearer) = market.user("Alice", 10).await;
        let stored = notify(&market, &alice, "Lamp", 0).await;
        let app = actix_test::init_service(test_app(&market)).await;

        let request = actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/notifications/{}", stored.id))
            .insert_header((AUTHORIZATION, bearer.clone()))
            .to_request();
        let body: DeletedResponse = actix_test::call_and_read_body_json(&app, request).await;
        assert!(body.ok);

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/notifications")
            .insert_header((AUTHORIZATION, bearer))
            .to_request();
        let listed: Vec<NotificationBody> = actix_test::call_and_read_body_json(&app, request).await;
        assert!(listed.is_empty());
    }

    #[rstest]
    #[case("PATCH")]
    #[case("DELETE")]
    #[actix_web::test]
    async fn another_users_notification_is_not_found(#[case] method: &str) {
        let market = TestMarketplace::new();
        let (alice, _) = market.user("Alice", 10).await;
        let (_, intruder) = market.user("Mallory", 10).await;
        let stored = notify(&market, &alice, "Lamp", 0).await;
        let app = actix_test::init_service(test_app(&market)).await;

        let uri = format!("/api/v1/notifications/{}", stored.id);
        let request = match method {
            "PATCH" => actix_test::TestRequest::patch(),
            _ => actix_test::TestRequest::delete(),
        }
        .uri(&uri)
        .insert_header((AUTHORIZATION, intruder))
        .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let untouched = NotificationRepository::list_for_recipient(market.store.as_ref(), &alice.id())
            .await
            .expect("listed");
        assert_eq!(untouched.len(), 1);
        assert!(!untouched[0].read);
    }
}
