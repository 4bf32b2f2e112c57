//! Admin listing queries: paging, filtering, search and sort.
//!
//! Every admin listing takes a [`ListingQuery`] parameterised by the entity's
//! sort field and status filter, and returns a [`Page`].

use std::cmp::Ordering;
use std::str::FromStr;

pub use pagination::{
    DEFAULT_LIMIT, MAX_LIMIT, Page, PageRequest, PageRequestError, ParseSortDirectionError,
    SortDirection,
};

use super::{ChannelStatus, ModerationStatus, VideoStatus};

/// Raised when a `sort` parameter names an unknown field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported sort field: {0}")]
pub struct UnknownSortFieldError(pub String);

macro_rules! sort_field {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl $name {
            /// Query-string spelling of the field.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownSortFieldError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(UnknownSortFieldError(s.to_owned())),
                }
            }
        }
    };
}

sort_field! {
    /// Sortable fields of the flag listing.
    FlagSort { CreatedAt => "createdAt", Status => "status", Reason => "reason" }
}

sort_field! {
    /// Sortable fields of the copyright claim listing.
    ClaimSort { CreatedAt => "createdAt", Status => "status", ClaimantName => "claimantName" }
}

sort_field! {
    /// Sortable fields of the contact submission listing.
    ContactSort { CreatedAt => "createdAt", Status => "status", Subject => "subject" }
}

sort_field! {
    /// Sortable fields of the channel listing.
    ChannelSort {
        CreatedAt => "createdAt",
        Name => "name",
        Subscribers => "subscriberCount",
        TotalViews => "totalViews",
    }
}

sort_field! {
    /// Sortable fields of the video listing.
    VideoSort {
        CreatedAt => "createdAt",
        Title => "title",
        Views => "viewCount",
        Likes => "likeCount",
    }
}

/// Paging, filter, search and sort for one admin listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery<S, F> {
    pub page: PageRequest,
    /// Exact status filter.
    pub status: Option<F>,
    /// Lower-cased substring matched against the entity's text field.
    pub search: Option<String>,
    pub sort: S,
    pub direction: SortDirection,
}

impl<S: Default, F> Default for ListingQuery<S, F> {
    fn default() -> Self {
        Self {
            page: PageRequest::default(),
            status: None,
            search: None,
            sort: S::default(),
            direction: SortDirection::default(),
        }
    }
}

impl<S, F> ListingQuery<S, F> {
    /// Build a query, normalising the search term.
    #[must_use]
    pub fn new(
        page: PageRequest,
        status: Option<F>,
        search: Option<&str>,
        sort: S,
        direction: SortDirection,
    ) -> Self {
        Self {
            page,
            status,
            search: normalise_search(search),
            sort,
            direction,
        }
    }

    /// Whether `text` satisfies the search term.
    #[must_use]
    pub fn matches_search(&self, text: &str) -> bool {
        self.search
            .as_deref()
            .is_none_or(|needle| text.to_lowercase().contains(needle))
    }

    /// Order two items by a key ordering, honouring the direction.
    #[must_use]
    pub fn order(&self, ordering: Ordering) -> Ordering {
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Trim and lower-case a search term; blank terms disable search.
#[must_use]
pub fn normalise_search(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
}

/// Flag listing query.
pub type FlagQuery = ListingQuery<FlagSort, ModerationStatus>;
/// Copyright claim listing query.
pub type ClaimQuery = ListingQuery<ClaimSort, ModerationStatus>;
/// Contact submission listing query.
pub type ContactQuery = ListingQuery<ContactSort, ModerationStatus>;
/// Channel listing query.
pub type ChannelQuery = ListingQuery<ChannelSort, ChannelStatus>;
/// Video listing query.
pub type VideoQuery = ListingQuery<VideoSort, VideoStatus>;
