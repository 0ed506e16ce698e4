//! Order repository for database operations

use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, types::Json};
use tracing::info;
use uuid::Uuid;

use crate::models::{NewOrder, Order, OrderSummary};

/// Order repository for database operations
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a new order. The caller checks that the hotel exists.
    pub async fn create(&self, order: NewOrder) -> DatabaseResult<Order> {
        info!(
            "Creating order for user {} at hotel {}",
            order.user_id, order.hotel_id
        );

        sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (user_id, hotel_id, order_details)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, hotel_id, order_details, created_at
            "#,
        )
        .bind(order.user_id)
        .bind(order.hotel_id)
        .bind(Json(order.order_details))
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    /// Orders placed by one user, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> DatabaseResult<Vec<OrderSummary>> {
        sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT o.id, o.user_id, o.hotel_id, o.order_details, o.created_at,
                   h.name AS hotel_name, h.country AS hotel_country,
                   NULL::TEXT AS username
            FROM orders o
            LEFT JOIN hotels h ON h.id = o.hotel_id
            WHERE o.user_id = $1
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    /// Every order with its user and hotel, newest first
    pub async fn list_all(&self) -> DatabaseResult<Vec<OrderSummary>> {
        sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT o.id, o.user_id, o.hotel_id, o.order_details, o.created_at,
                   h.name AS hotel_name, h.country AS hotel_country,
                   u.username AS username
            FROM orders o
            LEFT JOIN hotels h ON h.id = o.hotel_id
            LEFT JOIN users u ON u.id = o.user_id
            ORDER BY o.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }
}
