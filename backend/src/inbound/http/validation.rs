//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection is a `400` whose details name the offending field and a
//! stable code, for example
//! `{"error": "videoId must be a valid UUID", "details": {"field": "videoId", "code": "invalid_uuid"}}`.

use std::fmt::Display;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::{
    Error, IdParseError, ListingQuery, ModerationValidationError, PageRequest, PageRequestError,
    SortDirection,
};

/// Validation error codes carried in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    InvalidUuid,
    InvalidValue,
    OutOfRange,
    Empty,
    TooLong,
    InvalidEmail,
}

impl ValidationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidValue => "invalid_value",
            Self::OutOfRange => "out_of_range",
            Self::Empty => "empty",
            Self::TooLong => "too_long",
            Self::InvalidEmail => "invalid_email",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn field_error(
    field: FieldName,
    code: ValidationCode,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

/// Parse an identifier newtype from a path or body value.
pub(crate) fn parse_id<T>(raw: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = IdParseError>,
{
    raw.parse::<T>().map_err(|_| {
        field_error(
            field,
            ValidationCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
        )
    })
}

/// Parse an enumerated value, echoing the parser's message.
pub(crate) fn parse_value<T>(raw: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>()
        .map_err(|err| field_error(field, ValidationCode::InvalidValue, err.to_string()))
}

/// Map a moderation draft rejection onto its field.
pub(crate) fn moderation_error(err: &ModerationValidationError) -> Error {
    let code = match err {
        ModerationValidationError::UnknownReason(_) => ValidationCode::InvalidValue,
        ModerationValidationError::Empty { .. } => ValidationCode::Empty,
        ModerationValidationError::TooLong { .. } => ValidationCode::TooLong,
        ModerationValidationError::InvalidEmail { .. } => ValidationCode::InvalidEmail,
    };
    match err.field() {
        Some(field) => field_error(FieldName::new(field), code, err.to_string()),
        None => Error::invalid_request(err.to_string()),
    }
}

/// Query string shared by the admin listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingParams {
    /// 1-based page number (default 1).
    pub page: Option<u32>,
    /// Page size, 1 to 100 (default 20).
    pub limit: Option<u32>,
    /// Status filter.
    pub status: Option<String>,
    /// Case-insensitive substring filter.
    pub search: Option<String>,
    /// Sort field.
    pub sort: Option<String>,
    /// `asc` or `desc` (default `desc`).
    pub order: Option<String>,
}

impl ListingParams {
    /// Validate the parameters into a typed listing query.
    pub(crate) fn into_query<S, F>(self) -> Result<ListingQuery<S, F>, Error>
    where
        S: FromStr + Default,
        S::Err: Display,
        F: FromStr,
        F::Err: Display,
    {
        let page = PageRequest::from_params(self.page, self.limit).map_err(page_error)?;
        let status = self
            .status
            .as_deref()
            .map(|raw| parse_value::<F>(raw, FieldName::new("status")))
            .transpose()?;
        let sort = self
            .sort
            .as_deref()
            .map(|raw| parse_value::<S>(raw, FieldName::new("sort")))
            .transpose()?
            .unwrap_or_default();
        let direction = self
            .order
            .as_deref()
            .map(|raw| parse_value::<SortDirection>(raw, FieldName::new("order")))
            .transpose()?
            .unwrap_or_default();
        Ok(ListingQuery::new(
            page,
            status,
            self.search.as_deref(),
            sort,
            direction,
        ))
    }
}

fn page_error(err: PageRequestError) -> Error {
    let field = match err {
        PageRequestError::PageOutOfRange { .. } => FieldName::new("page"),
        PageRequestError::LimitOutOfRange { .. } => FieldName::new("limit"),
    };
    field_error(field, ValidationCode::OutOfRange, err.to_string())
}
