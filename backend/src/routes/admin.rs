//! Session-backed admin endpoints; each answers with the backend envelope

use aide::axum::{
    routing::{delete, get},
    ApiRouter,
};
use axum::{
    extract::Query,
    middleware,
};
use serde_json::Value;
use tracing::instrument;

use crate::{
    gateway::GatewayClient,
    middleware::session_guard,
    services::{
        blog::{self, BlogPost, BlogPostPatch, NewBlogPost},
        packages::{self, NewPackage, Package, PackagePatch},
        public::{self, Faq, Rating, Review},
        users::{self, User, UserProfile},
        waitlist::{self, WaitlistEntry},
        ListQuery, Paginated,
    },
    types::{ApiEnvelope, ResourceId, ValidatedJson},
};

/// Creates the admin router; every route requires a live session
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .api_route("/api/admin/users", get(list_users))
        .api_route("/api/admin/users/{id}/profile", get(get_user_profile))
        .api_route(
            "/api/admin/packages",
            get(list_packages).post(create_package),
        )
        .api_route(
            "/api/admin/packages/{id}",
            get(get_package).patch(update_package).delete(delete_package),
        )
        .api_route("/api/admin/packages/{id}/public", get(get_public_package))
        .api_route("/api/admin/blog", get(list_posts).post(create_post))
        .api_route(
            "/api/admin/blog/{id}",
            get(get_post).patch(update_post).delete(delete_post),
        )
        .api_route("/api/admin/waitlist", get(list_waitlist))
        .api_route(
            "/api/admin/waitlist/{id}",
            delete(remove_waitlist_entry),
        )
        .api_route("/api/admin/faq/{id}", get(get_faq))
        .api_route("/api/admin/ratings/{id}", get(get_rating))
        .api_route("/api/admin/ratings/{id}/reviews", get(get_reviews))
        .layer(middleware::from_fn(session_guard))
}

#[instrument(skip(client))]
async fn list_users(
    client: GatewayClient,
    Query(query): Query<ListQuery>,
) -> ApiEnvelope<Paginated<User>> {
    users::list_users(&client, &query).await
}

#[instrument(skip(client))]
async fn get_user_profile(client: GatewayClient, id: ResourceId) -> ApiEnvelope<UserProfile> {
    users::get_user_profile(&client, &id).await
}

#[instrument(skip(client))]
async fn list_packages(
    client: GatewayClient,
    Query(query): Query<ListQuery>,
) -> ApiEnvelope<Paginated<Package>> {
    packages::list_packages(&client, &query).await
}

#[instrument(skip(client, package))]
async fn create_package(
    client: GatewayClient,
    ValidatedJson(package): ValidatedJson<NewPackage>,
) -> ApiEnvelope<Package> {
    packages::create_package(&client, &package).await
}

#[instrument(skip(client))]
async fn get_package(client: GatewayClient, id: ResourceId) -> ApiEnvelope<Package> {
    packages::get_package(&client, &id).await
}

#[instrument(skip(client, patch))]
async fn update_package(
    client: GatewayClient,
    id: ResourceId,
    axum::Json(patch): axum::Json<PackagePatch>,
) -> ApiEnvelope<Package> {
    packages::update_package(&client, &id, &patch).await
}

#[instrument(skip(client))]
async fn delete_package(client: GatewayClient, id: ResourceId) -> ApiEnvelope<Value> {
    packages::delete_package(&client, &id).await
}

#[instrument(skip(client))]
async fn get_public_package(client: GatewayClient, id: ResourceId) -> ApiEnvelope<Package> {
    packages::get_public_package(&client, &id).await
}

#[instrument(skip(client))]
async fn list_posts(
    client: GatewayClient,
    Query(query): Query<ListQuery>,
) -> ApiEnvelope<Paginated<BlogPost>> {
    blog::list_posts(&client, &query).await
}

#[instrument(skip(client, post))]
async fn create_post(
    client: GatewayClient,
    ValidatedJson(post): ValidatedJson<NewBlogPost>,
) -> ApiEnvelope<BlogPost> {
    blog::create_post(&client, &post).await
}

#[instrument(skip(client))]
async fn get_post(client: GatewayClient, id: ResourceId) -> ApiEnvelope<BlogPost> {
    blog::get_post(&client, &id).await
}

#[instrument(skip(client, patch))]
async fn update_post(
    client: GatewayClient,
    id: ResourceId,
    axum::Json(patch): axum::Json<BlogPostPatch>,
) -> ApiEnvelope<BlogPost> {
    blog::update_post(&client, &id, &patch).await
}

#[instrument(skip(client))]
async fn delete_post(client: GatewayClient, id: ResourceId) -> ApiEnvelope<Value> {
    blog::delete_post(&client, &id).await
}

#[instrument(skip(client))]
async fn list_waitlist(
    client: GatewayClient,
    Query(query): Query<ListQuery>,
) -> ApiEnvelope<Paginated<WaitlistEntry>> {
    waitlist::list_waitlist(&client, &query).await
}

#[instrument(skip(client))]
async fn remove_waitlist_entry(client: GatewayClient, id: ResourceId) -> ApiEnvelope<Value> {
    waitlist::remove_waitlist_entry(&client, &id).await
}

#[instrument(skip(client))]
async fn get_faq(client: GatewayClient, id: ResourceId) -> ApiEnvelope<Vec<Faq>> {
    public::get_faq(&client, &id).await
}

#[instrument(skip(client))]
async fn get_rating(client: GatewayClient, id: ResourceId) -> ApiEnvelope<Rating> {
    public::get_rating(&client, &id).await
}

#[instrument(skip(client))]
async fn get_reviews(client: GatewayClient, id: ResourceId) -> ApiEnvelope<Vec<Review>> {
    public::get_reviews(&client, &id).await
}
