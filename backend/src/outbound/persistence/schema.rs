//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation.

diesel::table! {
    /// Orders table.
    ///
    /// One row per order aggregate. The status column stores the enum name
    /// (`PENDING`, `ORDERED`, `CANCELED`) as text.
    orders (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user's email.
        user_email -> Varchar,
        /// Shipping address snapshot.
        address -> Varchar,
        /// Stored order total (NUMERIC, fixed point).
        total_price -> Numeric,
        /// Order status name.
        status -> Varchar,
        /// Creation timestamp.
        ordered_at -> Timestamptz,
    }
}

diesel::table! {
    /// Order items table.
    ///
    /// Items reference their order by id; `ON DELETE CASCADE` removes them
    /// with the order.
    order_items (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning order.
        order_id -> Uuid,
        /// Catalog product reference.
        product_id -> Uuid,
        /// Ordered quantity.
        quantity -> Int4,
        /// Unit price snapshot (NUMERIC, fixed point).
        unit_price -> Numeric,
        /// Item status name.
        status -> Varchar,
        /// Zero-based line position within the order.
        position -> Int4,
    }
}

diesel::joinable!(order_items -> orders (order_id));
diesel::allow_tables_to_appear_in_same_query!(order_items, orders);
