//! Type-safe identifier wrappers around opaque strings.
//!
//! Zone and route identifiers are assigned by the external data sources and
//! carry no structure the monitor relies on. Wrapping them in distinct
//! newtypes prevents a route id from being used where a zone id is expected.
//! Serialization is transparent, so a `ZoneId` travels as a plain string.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an existing identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner [`String`] value.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of a monitored zone, stable across refresh cycles.
    ZoneId
}

define_id! {
    /// Identifier of an evacuation route in the route catalog.
    RouteId
}

define_id! {
    /// Identifier of a one-off prediction result.
    PredictionId
}

impl PredictionId {
    /// Generate a fresh prediction id of the form `prediction-<uuid>`.
    ///
    /// Uses UUID v7 so ids sort by creation time.
    pub fn generate() -> Self {
        Self(format!("prediction-{}", Uuid::now_v7()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_id_serializes_as_plain_string() {
        let id = ZoneId::from("zone1");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"zone1\""));
    }

    #[test]
    fn id_display_matches_inner() {
        let id = RouteId::new("route1");
        assert_eq!(id.to_string(), "route1");
        assert_eq!(id.as_str(), "route1");
    }

    #[test]
    fn generated_prediction_ids_are_prefixed_and_unique() {
        let a = PredictionId::generate();
        let b = PredictionId::generate();
        assert!(a.as_str().starts_with("prediction-"));
        assert_ne!(a, b);
    }
}
