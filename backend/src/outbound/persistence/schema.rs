//! Diesel table definitions.
//!
//! Must match `migrations/` exactly; regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Identity directory. `department` is set exactly when `role = 'staff'`.
    identities (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        credential_secret -> Varchar,
        role -> Varchar,
        department -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One roster per class; `students` is a JSON array of `{roll, name}`.
    class_rosters (department, class_code) {
        department -> Varchar,
        class_code -> Varchar,
        display_name -> Varchar,
        students -> Jsonb,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Attendance ledger; `entries` is a JSON array of `{roll, name, status}`.
    attendance_records (department, class_code, attendance_date) {
        department -> Varchar,
        class_code -> Varchar,
        attendance_date -> Date,
        entries -> Jsonb,
        recorded_by -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    news_posts (id) {
        id -> Uuid,
        title -> Varchar,
        content -> Text,
        department -> Varchar,
        image_url -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    identities,
    class_rosters,
    attendance_records,
    news_posts,
);
