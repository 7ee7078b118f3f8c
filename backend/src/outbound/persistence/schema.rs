//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; regenerate with
//! `diesel print-schema` after a migration changes the schema.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Unique, lowercased email address.
        email -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
        /// Soft-delete marker; null while the account is live.
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Posts published by users.
    posts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user.
        author_id -> Uuid,
        /// Headline.
        title -> Varchar,
        /// Content.
        body -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
        /// Soft-delete marker; null while the post is live.
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(posts -> users (author_id));
diesel::allow_tables_to_appear_in_same_query!(posts, users);
