//! HTTP handlers for Products API

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadGatewayResponse, BadRequestResponse, InternalServerErrorResponse, InvalidIdResponse,
        NotFoundResponse,
    },
    IdPath, JsonPayload,
};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::error::ProductResult;
use crate::models::{Product, ProductPayload, ProductsWithUsers};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        list_products_with_users,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(ProductSchema, ProductsWithUsersSchema, ProductPayload),
        responses(
            BadRequestResponse,
            InvalidIdResponse,
            NotFoundResponse,
            InternalServerErrorResponse,
            BadGatewayResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalogue endpoints")
    )
)]
pub struct ApiDoc;

/// Document shape of [`Product`]; the id is an integer or an ObjectId hex
/// string depending on the backend.
#[derive(ToSchema)]
#[schema(as = Product)]
#[expect(dead_code, reason = "OpenAPI schema only")]
struct ProductSchema {
    #[schema(example = 1)]
    id: String,
    #[schema(example = "Widget")]
    name: String,
    #[schema(example = 9.99)]
    price: f64,
    #[schema(example = 3)]
    stock: i32,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

#[derive(ToSchema)]
#[schema(as = ProductsWithUsers, rename_all = "camelCase")]
#[expect(dead_code, reason = "OpenAPI schema only")]
struct ProductsWithUsersSchema {
    products: Vec<ProductSchema>,
    #[schema(example = 2)]
    users_count: u64,
}

/// Create the products router; mount it under `/products`.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/with-users", get(list_products_with_users))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List all products ordered by id
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    responses(
        (status = 200, description = "All products", body = Vec<ProductSchema>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<Vec<Product<R::Id>>>> {
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Create a product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Product created", body = ProductSchema),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    JsonPayload(payload): JsonPayload<ProductPayload>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Products together with the number of users in the users service
#[utoipa::path(
    get,
    path = "/with-users",
    tag = "Products",
    responses(
        (status = 200, description = "Products and user count", body = ProductsWithUsersSchema),
        (status = 502, response = BadGatewayResponse)
    )
)]
async fn list_products_with_users<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<ProductsWithUsers<R::Id>>> {
    let combined = service.list_with_users().await?;
    Ok(Json(combined))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductSchema),
        (status = 400, response = InvalidIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath<R::Id>,
) -> ProductResult<Json<Product<R::Id>>> {
    let product = service.get_product(&id).await?;
    Ok(Json(product))
}

/// Partially update a product; only supplied fields change
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product id")),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product updated", body = ProductSchema),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath<R::Id>,
    JsonPayload(payload): JsonPayload<ProductPayload>,
) -> ProductResult<Json<Product<R::Id>>> {
    let product = service.update_product(&id, payload).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = InvalidIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath<R::Id>,
) -> ProductResult<StatusCode> {
    service.delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
