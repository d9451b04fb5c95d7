//! Platform snowflake identifiers.
//!
//! Identifiers serialize as decimal strings so documents stay readable by
//! tooling that cannot hold 64-bit integers, and deserialize from either a
//! string or a number.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            derive_more::Display,
            derive_more::From,
        )]
        pub struct $name(pub u64);

        impl $name {
            /// Raw snowflake value.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(SnowflakeVisitor).map($name)
            }
        }
    };
}

struct SnowflakeVisitor;

impl<'de> Visitor<'de> for SnowflakeVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a snowflake id as string or integer")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
        u64::try_from(v).map_err(|_| E::custom(format!("negative snowflake: {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
        v.parse()
            .map_err(|_| E::custom(format!("invalid snowflake: {v:?}")))
    }
}

snowflake!(
    /// A guild (community server).
    GuildId
);
snowflake!(
    /// A channel or category inside a guild.
    ChannelId
);
snowflake!(
    /// A guild role.
    RoleId
);
snowflake!(
    /// A user account.
    UserId
);
snowflake!(
    /// A message inside a channel.
    MessageId
);

impl GuildId {
    /// The implicit `@everyone` role shares the guild's id.
    pub fn everyone_role(self) -> RoleId {
        RoleId(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_ids_serialize_as_strings() {
        let json = serde_json::to_string(&ChannelId(1234567890123456789)).unwrap();
        assert_eq!(json, "\"1234567890123456789\"");
    }

    #[test]
    fn test_ids_accept_numbers_and_strings() {
        let a: RoleId = serde_json::from_str("42").unwrap();
        let b: RoleId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<RoleId>("\"abc\"").is_err());
    }

    #[test]
    fn test_ids_as_map_keys() {
        let mut map = BTreeMap::new();
        map.insert(GuildId(7), true);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, "{\"7\":true}");
        let back: BTreeMap<GuildId, bool> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_everyone_role_matches_guild() {
        assert_eq!(GuildId(99).everyone_role(), RoleId(99));
    }
}
