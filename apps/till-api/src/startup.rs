use axum::routing::{get, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use till_db::Store;

use crate::handlers::{health, items, orders};
use crate::AppState;

pub fn build_router<S: Store>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health::health_check::<S>))
        .route(
            "/item",
            get(items::list_items::<S>).post(items::create_item::<S>),
        )
        .route("/item/:id/price", put(items::update_price::<S>))
        .route(
            "/order",
            get(orders::list_orders::<S>).post(orders::create_order::<S>),
        )
        .route("/order/:id/addItem/:item_id", put(orders::add_item::<S>))
        .route(
            "/order/:id/addItem/:item_id/quantity/:qty",
            put(orders::add_item_quantity::<S>),
        )
        .route("/order/:id/pay", put(orders::pay::<S>))
        .route("/order/:id/receipt", get(orders::receipt::<S>))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}
