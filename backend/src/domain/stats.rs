//! Admin dashboard figures.

use serde::{Deserialize, Serialize};

use super::{CatalogueTotals, StatusCounts};

/// Platform totals plus moderation queue counts by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub totals: CatalogueTotals,
    pub flags: StatusCounts,
    pub copyright_claims: StatusCounts,
    pub contact_submissions: StatusCounts,
}
