//! Defines the user record that carries the total monthly budget.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::models::UserId;

/// The user record returned by the API.
///
/// Fields this crate does not use are kept in `extra` so that the record can
/// be sent back unchanged apart from the fields that were edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    /// The ID of the user.
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// The aggregate monthly spending ceiling.
    ///
    /// `None` means no total budget has been configured. The API reports an
    /// unset budget as `null` or `0`, both of which are read as `None`.
    #[serde(default, deserialize_with = "deserialize_total_budget")]
    pub total_budget: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn deserialize_total_budget<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let budget = Option::<f64>::deserialize(deserializer)?;

    Ok(budget.filter(|budget| *budget != 0.0))
}
