use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::utils::id::{ResourceId, UserName};
use crate::error::Error;

/// Hardware class of a bookable GPU unit.
///
/// All units of one class share the capacity denominator used by the occupancy math.
/// `Unknown` never appears in a catalog; it is recorded on reservations whose resource id
/// could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceClass {
    Rtx4090,
    H100,
    Unknown,
}

impl ResourceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceClass::Rtx4090 => "RTX 4090",
            ResourceClass::H100 => "H100",
            ResourceClass::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "RTX 4090" | "RTX4090" | "Rtx4090" => Ok(ResourceClass::Rtx4090),
            "H100" => Ok(ResourceClass::H100),
            "Unknown" => Ok(ResourceClass::Unknown),
            other => Err(Error::ConfigError(format!("unknown resource class '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub id: ResourceId,
    pub class: ResourceClass,
}

impl Resource {
    pub fn new(id: impl Into<String>, class: ResourceClass) -> Self {
        Resource { id: ResourceId::new(id), class }
    }
}

/// The fixed inventory of bookable units and the lab roster.
///
/// Built once at start-up and handed to the components that need it; nothing mutates it
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    resources: Vec<Resource>,
    users: Vec<UserName>,
}

impl Catalog {
    pub fn new(resources: Vec<Resource>, users: Vec<UserName>) -> Result<Self, Error> {
        if resources.iter().any(|r| r.class == ResourceClass::Unknown) {
            return Err(Error::ConfigError("catalog resources must not use the 'Unknown' class".to_string()));
        }

        for (i, resource) in resources.iter().enumerate() {
            if resources[..i].iter().any(|other| other.id == resource.id) {
                return Err(Error::ConfigError(format!("duplicate resource id '{}'", resource.id)));
            }
        }

        Ok(Catalog { resources, users })
    }

    /// Four RTX 4090 servers hosted locally and two cloud H100 units.
    pub fn lab_default() -> Self {
        let resources = vec![
            Resource::new("RTX-Server-0", ResourceClass::Rtx4090),
            Resource::new("RTX-Server-1", ResourceClass::Rtx4090),
            Resource::new("RTX-Server-2", ResourceClass::Rtx4090),
            Resource::new("RTX-Server-3", ResourceClass::Rtx4090),
            Resource::new("H100-01", ResourceClass::H100),
            Resource::new("H100-02", ResourceClass::H100),
        ];

        let users = [
            "Mincheol Kang (강민철)",
            "Donggyu Kim (김동규)",
            "Jeonghyeon Noh (노정현)",
            "Sanghun Park (박상훈)",
            "Eunwoo Sung (성은우)",
            "Nakgyu Yang (양낙규)",
            "Jeongyong Yang (양정용)",
            "Sunmin Yoo (유선민)",
            "KwangBin Lee (이광빈)",
            "Yechan Lee (이예찬)",
            "Seunghwan Jang (장승환)",
            "Yejun Jang (장예준)",
            "Minseok Jeong (정민석)",
            "Jungyo Jung (정준교)",
            "Hojin Ju (주호진)",
            "Hyeongmin Choe (최형민)",
            "Hyewon Choi (최혜원)",
            "SooJean Han (한수진)",
            "Doyoung Heo (허도영)",
        ]
        .into_iter()
        .map(UserName::new)
        .collect();

        Catalog { resources, users }
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn users(&self) -> &[UserName] {
        &self.users
    }

    pub fn get(&self, resource_id: &ResourceId) -> Option<&Resource> {
        self.resources.iter().find(|r| &r.id == resource_id)
    }

    /// Class of `resource_id`, or `Unknown` if the catalog does not list it.
    pub fn class_of(&self, resource_id: &ResourceId) -> ResourceClass {
        self.get(resource_id).map(|r| r.class).unwrap_or(ResourceClass::Unknown)
    }

    pub fn unit_count(&self, class: ResourceClass) -> usize {
        self.resources.iter().filter(|r| r.class == class).count()
    }

    /// Unit count per class, for every class that has at least one unit.
    pub fn classes(&self) -> BTreeMap<ResourceClass, usize> {
        let mut classes = BTreeMap::new();
        for resource in &self.resources {
            *classes.entry(resource.class).or_insert(0) += 1;
        }
        classes
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::lab_default()
    }
}
