use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::error::{Error, Result};

/// Server region a player connects through
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, IntoStaticStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Region {
    Eu,
    Us,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// One player's launch, built from the two positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub region: Region,
    pub username: String,
}

impl Session {
    pub fn new(region: Region, username: impl Into<String>) -> Self {
        Self {
            region,
            username: username.into(),
        }
    }

    /// Validate `<region> <username>`.
    ///
    /// The username is taken as-is; it is not checked for path separators.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let [region, username] = args else {
            return Err(Error::ArgumentCount(args.len()));
        };
        let region = Region::from_str(region.as_ref())
            .map_err(|_| Error::InvalidRegion(region.as_ref().to_string()))?;
        Ok(Self::new(region, username.as_ref()))
    }
}
