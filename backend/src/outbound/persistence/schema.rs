//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Accounts with their role and password digest.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        display_name -> Varchar,
        role -> Varchar,
        password_digest -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Channels and their denormalized view total.
    channels (id) {
        id -> Uuid,
        owner_id -> Uuid,
        name -> Varchar,
        status -> Varchar,
        subscriber_count -> Int8,
        total_views -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Videos with denormalized engagement counters.
    videos (id) {
        id -> Uuid,
        channel_id -> Uuid,
        title -> Varchar,
        status -> Varchar,
        view_count -> Int8,
        like_count -> Int8,
        dislike_count -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One vote per (user, video).
    video_votes (user_id, video_id) {
        user_id -> Uuid,
        video_id -> Uuid,
        kind -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// User reports against videos.
    video_flags (id) {
        id -> Uuid,
        reporter_id -> Uuid,
        video_id -> Uuid,
        reason -> Varchar,
        comment -> Nullable<Varchar>,
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    copyright_claims (id) {
        id -> Uuid,
        claimant_id -> Uuid,
        video_id -> Uuid,
        claimant_name -> Varchar,
        claimant_email -> Varchar,
        description -> Varchar,
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    contact_submissions (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        subject -> Varchar,
        message -> Varchar,
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-user block list.
    user_blocks (id) {
        id -> Uuid,
        blocker_id -> Uuid,
        blocked_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Revenue and payout rows; payouts carry negative amounts.
    ledger_transactions (id) {
        id -> Uuid,
        user_id -> Uuid,
        kind -> Varchar,
        amount_cents -> Int8,
        status -> Varchar,
        description -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    watch_later (user_id, video_id) {
        user_id -> Uuid,
        video_id -> Uuid,
        added_at -> Timestamptz,
    }
}

diesel::table! {
    watch_history (user_id, video_id) {
        user_id -> Uuid,
        video_id -> Uuid,
        watched_at -> Timestamptz,
    }
}

diesel::joinable!(channels -> users (owner_id));
diesel::joinable!(videos -> channels (channel_id));
diesel::joinable!(video_votes -> videos (video_id));
diesel::joinable!(video_flags -> videos (video_id));
diesel::joinable!(copyright_claims -> videos (video_id));
diesel::joinable!(watch_later -> videos (video_id));
diesel::joinable!(watch_history -> videos (video_id));
diesel::joinable!(ledger_transactions -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    channels,
    videos,
    video_votes,
    video_flags,
    copyright_claims,
    contact_submissions,
    user_blocks,
    ledger_transactions,
    watch_later,
    watch_history,
);
