use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Offset, Utc};

use crate::api::config_dto::EngineConfigDto;
use crate::domain::catalog::{Catalog, Resource, ResourceClass};
use crate::domain::time_range::offset_from_hours;
use crate::domain::utils::id::UserName;
use crate::error::Result;
use crate::loader::parser::parse_json_file;

pub const DEFAULT_DATA_FILE: &str = "data/reservations.csv";

/// Local time of the lab (KST).
pub const DEFAULT_DISPLAY_OFFSET_HOURS: i32 = 9;

/// Everything the engine needs at start-up. Immutable once built.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub data_file: PathBuf,

    /// Offset of local time used for day windows and for timestamps entered or stored
    /// without an offset.
    pub display_offset: FixedOffset,

    pub catalog: Catalog,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            display_offset: FixedOffset::east_opt(DEFAULT_DISPLAY_OFFSET_HOURS * 3600).unwrap_or_else(|| Utc.fix()),
            catalog: Catalog::lab_default(),
        }
    }
}

impl EngineConfig {
    /// Applies the fields present in `dto` on top of the defaults.
    pub fn from_dto(dto: EngineConfigDto) -> Result<Self> {
        let mut config = EngineConfig::default();

        if let Some(data_file) = dto.data_file {
            config.data_file = PathBuf::from(data_file);
        }

        if let Some(hours) = dto.display_offset_hours {
            config.display_offset = offset_from_hours(hours)?;
        }

        if dto.resources.is_some() || dto.users.is_some() {
            let resources = match dto.resources {
                Some(resources) => resources.into_iter().map(|r| Ok(Resource::new(r.id, r.class.parse::<ResourceClass>()?))).collect::<Result<Vec<_>>>()?,
                None => config.catalog.resources().to_vec(),
            };
            let users = match dto.users {
                Some(users) => users.into_iter().map(UserName::new).collect(),
                None => config.catalog.users().to_vec(),
            };
            config.catalog = Catalog::new(resources, users)?;
        }

        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let dto: EngineConfigDto = parse_json_file(path.as_ref())?;
        log::info!("Configuration '{}' parsed successfully.", path.as_ref().display());
        EngineConfig::from_dto(dto)
    }
}
