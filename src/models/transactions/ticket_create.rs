use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::CommonFields;

/// Sets aside one or more sequence numbers as tickets.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct TicketCreate {
    #[serde(flatten)]
    pub common_fields: CommonFields,
    /// How many tickets to create, 1..=250.
    pub ticket_count: u32,
}
