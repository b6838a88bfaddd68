use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    IdPath, JsonPayload,
    errors::responses::{
        BadRequestResponse, ConflictResponse, InternalServerErrorResponse, InvalidIdResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{User, UserPayload};
use crate::repository::UserRepository;
use crate::service::UserService;

#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, get_user, update_user, delete_user),
    components(
        schemas(User, UserPayload),
        responses(
            BadRequestResponse,
            InvalidIdResponse,
            NotFoundResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Users", description = "User directory endpoints")
    )
)]
pub struct ApiDoc;

/// Create the users router; mount it under `/users`.
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .with_state(shared_service)
}

/// List users ordered by id
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> UserResult<Json<Vec<User>>> {
    Ok(Json(service.list_users().await?))
}

/// Create a user
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, response = BadRequestResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    JsonPayload(payload): JsonPayload<UserPayload>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, response = InvalidIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath<i64>,
) -> UserResult<Json<User>> {
    Ok(Json(service.get_user(id).await?))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath<i64>,
    JsonPayload(payload): JsonPayload<UserPayload>,
) -> UserResult<Json<User>> {
    Ok(Json(service.update_user(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, response = InvalidIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath<i64>,
) -> UserResult<StatusCode> {
    service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StorageOp, UserError};
    use crate::repository::MockUserRepository;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_insert_failure_is_500_with_detail() {
        let mut repo = MockUserRepository::new();
        repo.expect_insert()
            .returning(|_| Err(UserError::storage(StorageOp::Insert, "connection refused")));
        let app = router(UserService::new(repo));

        let response = app
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "name": "A", "email": "a@b.c" }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "insert failed", "detail": "connection refused" })
        );
    }

    #[tokio::test]
    async fn test_delete_failure_is_500() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete_by_id()
            .returning(|_| Err(UserError::storage(StorageOp::Delete, "lock timeout")));
        let app = router(UserService::new(repo));

        let response = app
            .oneshot(Request::delete("/4").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "delete failed");
    }

    #[tokio::test]
    async fn test_invalid_id_never_reaches_storage() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id().never();
        let app = router(UserService::new(repo));

        let response = app
            .oneshot(Request::get("/1.5").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "invalid id" }));
    }
}
