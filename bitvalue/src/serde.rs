use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::value::BitValue;

impl Serialize for BitValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_token_string())
    }
}

impl<'de> Deserialize<'de> for BitValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        string.parse().map_err(de::Error::custom)
    }
}
