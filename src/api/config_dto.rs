use serde::Deserialize;

/// Optional JSON override of the compiled-in engine configuration.
///
/// Every field may be omitted; omitted fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfigDto {
    pub data_file: Option<String>,
    pub display_offset_hours: Option<i32>,
    pub resources: Option<Vec<ResourceDto>>,
    pub users: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDto {
    pub id: String,
    pub class: String,
}
