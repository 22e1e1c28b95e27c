use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use utoipa::ToSchema;

use crate::error::{UserError, UserResult};

/// Index used to locate a user for fetch, update and delete.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Selector {
    Id,
    Name,
    Email,
}

impl Selector {
    /// Parses a raw selector, reporting failures against `operation`.
    pub fn parse_for(operation: Operation, raw: &str) -> UserResult<Self> {
        Selector::from_str(raw).map_err(|_| UserError::UnsupportedSelector { operation })
    }

    /// Renders the allowed selectors the way error messages list them:
    /// `['id', 'name', 'email']`.
    pub fn allowed_list() -> String {
        let quoted: Vec<String> = Selector::iter().map(|s| format!("'{}'", s)).collect();
        format!("[{}]", quoted.join(", "))
    }
}

/// Selector-driven operation, used to phrase errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Operation {
    Fetch,
    Update,
    Delete,
}

impl Operation {
    pub fn past_tense(&self) -> &'static str {
        match self {
            Operation::Fetch => "fetched",
            Operation::Update => "updated",
            Operation::Delete => "deleted",
        }
    }
}
