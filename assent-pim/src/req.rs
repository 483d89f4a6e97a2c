use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Access question put to a [`Warden`](crate::Warden): may `subject` perform
/// `action` on `resource`, given `context`?
///
/// Only a JSON object decodes. Absent fields take their empty value; wrongly
/// typed fields are rejected.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
#[serde(try_from = "Map<String, Value>")]
pub struct Request {
    pub resource: String,
    pub action: String,
    pub subject: String,
    pub context: HashMap<String, Value>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct Fields {
    resource: String,
    action: String,
    subject: String,
    context: HashMap<String, Value>,
}

impl TryFrom<Map<String, Value>> for Request {
    type Error = serde_json::Error;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        let Fields {
            resource,
            action,
            subject,
            context,
        } = serde_json::from_value(Value::Object(object))?;
        Ok(Self {
            resource,
            action,
            subject,
            context,
        })
    }
}

impl Request {
    /// Example request served by the policy preview endpoint.
    pub fn sample() -> Self {
        Self {
            resource: "myrn:some.domain.com:resource:123".to_owned(),
            action: "delete".to_owned(),
            subject: "peter".to_owned(),
            context: HashMap::from([(
                "owner".to_owned(),
                Value::String("peter".to_owned()),
            )]),
        }
    }
}
