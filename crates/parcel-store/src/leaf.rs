//! Typed leaf records.
//!
//! A leaf is a flat field set resolved from one content-addressed document.
//! Its id is always the CID it was fetched from, so re-fetching the same CID
//! and upserting is idempotent. Repeatable leaves also carry `property_id`,
//! the id of the root record they belong to.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::entity::EntityType;
use crate::normalize;
use crate::record::Entity;

/// Field set of one leaf kind.
pub trait LeafData:
    Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static
{
    const ENTITY: EntityType;

    /// `(legacy, canonical)` key pairs folded together before decoding.
    /// When both keys are present the canonical value is kept.
    const LEGACY_KEYS: &'static [(&'static str, &'static str)] = &[];
}

/// A leaf record: source CID, optional root foreign key, and the fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Leaf<T> {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

impl<T: LeafData> Leaf<T> {
    pub fn new(id: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            property_id: None,
            data,
        }
    }

    /// Decode a gateway payload. Never fails on field shape, only on a
    /// payload that is not a JSON object.
    pub fn from_payload(
        id: impl Into<String>,
        payload: &serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        let data = if T::LEGACY_KEYS.is_empty() {
            T::deserialize(payload)?
        } else {
            T::deserialize(&fold_legacy_keys(payload, T::LEGACY_KEYS))?
        };
        Ok(Self::new(id, data))
    }

    pub fn with_property_id(mut self, property_id: impl Into<String>) -> Self {
        self.property_id = Some(property_id.into());
        self
    }
}

fn fold_legacy_keys(
    payload: &serde_json::Value,
    pairs: &[(&str, &str)],
) -> serde_json::Value {
    let mut payload = payload.clone();
    if let Some(map) = payload.as_object_mut() {
        for (legacy, canonical) in pairs {
            let Some(value) = map.remove(*legacy) else {
                continue;
            };
            let canonical_set = map.get(*canonical).is_some_and(|v| !v.is_null());
            if !canonical_set {
                map.insert((*canonical).to_string(), value);
            }
        }
    }
    payload
}

impl<T: LeafData> Entity for Leaf<T> {
    const ENTITY: EntityType = T::ENTITY;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Building envelope and interior construction details.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureData {
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub roof_date: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub architectural_style_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub attachment_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub ceiling_condition: Option<String>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub ceiling_height_average: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub ceiling_insulation_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub ceiling_structure_material: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub ceiling_surface_material: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub exterior_door_material: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub exterior_wall_condition: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub exterior_wall_insulation_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub exterior_wall_material_primary: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub exterior_wall_material_secondary: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub flooring_condition: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub flooring_material_primary: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub flooring_material_secondary: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub foundation_condition: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub foundation_material: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub foundation_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub foundation_waterproofing: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub gutters_condition: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub gutters_material: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub interior_door_material: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub interior_wall_condition: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub interior_wall_finish_primary: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub interior_wall_finish_secondary: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub interior_wall_structure_material: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub interior_wall_surface_material_primary: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub interior_wall_surface_material_secondary: Option<String>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub number_of_stories: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub primary_framing_material: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub request_identifier: Option<String>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub roof_age_years: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub roof_condition: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub roof_covering_material: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub roof_design_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub roof_material_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub roof_structure_material: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub roof_underlayment_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub secondary_framing_material: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub structural_damage_indicators: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub subfloor_material: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub window_frame_material: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub window_glazing_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub window_operation_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub window_screen_material: Option<String>,
}

impl LeafData for StructureData {
    const ENTITY: EntityType = EntityType::Structure;
}

/// Postal and cadastral address.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressData {
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub county_name: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub request_identifier: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub lot: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub municipality_name: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub plus_four_postal_code: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub route_number: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub state_code: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub street_direction_prefix: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub street_direction_suffix: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub street_number: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub street_suffix: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub unit_identifier: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub township: Option<String>,
}

impl LeafData for AddressData {
    const ENTITY: EntityType = EntityType::Address;
    const LEGACY_KEYS: &'static [(&'static str, &'static str)] = &[
        ("street_pre_directional_text", "street_direction_prefix"),
        ("street_post_directional_text", "street_direction_suffix"),
        ("street_suffix_type", "street_suffix"),
    ];
}

/// Parcel-level facts. `parcel_identifier` drives root re-keying.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyData {
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub property_structure_built_year: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub property_effective_built_year: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub parcel_identifier: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub area_under_air: Option<String>,
    #[serde(deserialize_with = "normalize::opt_bool", skip_serializing_if = "Option::is_none")]
    pub historic_designation: Option<bool>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub livable_floor_area: Option<String>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub number_of_units: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub number_of_units_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub property_legal_description_text: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub request_identifier: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub subdivision: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub total_area: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub zoning: Option<String>,
}

impl LeafData for PropertyData {
    const ENTITY: EntityType = EntityType::Property;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpfsFactSheetData {
    #[serde(deserialize_with = "normalize::string_or_empty")]
    pub ipfs_url: String,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub full_generation_command: Option<String>,
}

impl LeafData for IpfsFactSheetData {
    const ENTITY: EntityType = EntityType::IpfsFactSheet;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotData {
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub driveway_condition: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub driveway_material: Option<String>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub fence_height: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub fence_length: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub fencing_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub landscaping_features: Option<String>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub lot_area_sqft: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub lot_condition_issues: Option<String>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub lot_length_feet: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub lot_size_acre: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub lot_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub lot_width_feet: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub request_identifier: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
}

impl LeafData for LotData {
    const ENTITY: EntityType = EntityType::Lot;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilityData {
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub cooling_system_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub electrical_panel_capacity: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub electrical_wiring_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub electrical_wiring_type_other_description: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub heating_system_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub hvac_condensing_unit_present: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub hvac_unit_condition: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub hvac_unit_issues: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub plumbing_system_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub plumbing_system_type_other_description: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub public_utility_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub request_identifier: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub sewer_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string_list", skip_serializing_if = "Option::is_none")]
    pub smart_home_features: Option<Vec<String>>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub smart_home_features_other_description: Option<String>,
    #[serde(deserialize_with = "normalize::opt_bool", skip_serializing_if = "Option::is_none")]
    pub solar_inverter_visible: Option<bool>,
    #[serde(deserialize_with = "normalize::opt_bool", skip_serializing_if = "Option::is_none")]
    pub solar_panel_present: Option<bool>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub solar_panel_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub solar_panel_type_other_description: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub water_source_type: Option<String>,
}

impl LeafData for UtilityData {
    const ENTITY: EntityType = EntityType::Utility;
}

/// FEMA flood-zone and storm exposure data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloodStormData {
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub community_id: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub evacuation_zone: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub fema_search_url: Option<String>,
    #[serde(deserialize_with = "normalize::opt_bool", skip_serializing_if = "Option::is_none")]
    pub flood_insurance_required: Option<bool>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub flood_zone: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub map_version: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub panel_number: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub request_identifier: Option<String>,
}

impl LeafData for FloodStormData {
    const ENTITY: EntityType = EntityType::FloodStormInformation;
}

/// One ownership transfer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesHistoryData {
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub ownership_transfer_date: Option<String>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub purchase_price_amount: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub request_identifier: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub sale_type: Option<String>,
}

impl LeafData for SalesHistoryData {
    const ENTITY: EntityType = EntityType::SalesHistory;
}

/// One assessment period.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxData {
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub first_year_building_on_tax_roll: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub first_year_on_tax_roll: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub monthly_tax_amount: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub period_end_date: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub period_start_date: Option<String>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub property_assessed_value_amount: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub property_building_amount: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub property_land_amount: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub property_market_value_amount: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub property_taxable_value_amount: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub request_identifier: Option<String>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub tax_year: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub yearly_tax_amount: Option<f64>,
}

impl LeafData for TaxData {
    const ENTITY: EntityType = EntityType::Tax;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonData {
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub prefix_name: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub request_identifier: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub suffix_name: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub us_citizenship_status: Option<String>,
    #[serde(deserialize_with = "normalize::opt_bool", skip_serializing_if = "Option::is_none")]
    pub veteran_status: Option<bool>,
}

impl LeafData for PersonData {
    const ENTITY: EntityType = EntityType::Person;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyData {
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub request_identifier: Option<String>,
}

impl LeafData for CompanyData {
    const ENTITY: EntityType = EntityType::Company;
}

/// One room or outdoor space.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutData {
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub cabinet_style: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub clutter_level: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub condition_issues: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub countertop_material: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub decor_elements: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub design_style: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub fixture_finish_quality: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub floor_level: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub flooring_material_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub flooring_wear: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub furnished: Option<String>,
    #[serde(deserialize_with = "normalize::opt_bool", skip_serializing_if = "Option::is_none")]
    pub has_windows: Option<bool>,
    #[serde(deserialize_with = "normalize::bool_or_false")]
    pub is_exterior: bool,
    #[serde(deserialize_with = "normalize::bool_or_false")]
    pub is_finished: bool,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub lighting_features: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub natural_light_quality: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub paint_condition: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub pool_condition: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub pool_equipment: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub pool_surface_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub pool_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub pool_water_quality: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub request_identifier: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub safety_features: Option<String>,
    #[serde(deserialize_with = "normalize::opt_number", skip_serializing_if = "Option::is_none")]
    pub size_square_feet: Option<f64>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub spa_type: Option<String>,
    #[serde(deserialize_with = "normalize::integer_or_zero")]
    pub space_index: i64,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub space_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub view_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub visible_damage: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub window_design_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub window_material_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub window_treatment_type: Option<String>,
}

impl LeafData for LayoutData {
    const ENTITY: EntityType = EntityType::Layout;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileData {
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub file_format: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub ipfs_url: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub request_identifier: Option<String>,
}

impl LeafData for FileData {
    const ENTITY: EntityType = EntityType::File;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeedData {
    #[serde(deserialize_with = "normalize::opt_string", skip_serializing_if = "Option::is_none")]
    pub deed_type: Option<String>,
}

impl LeafData for DeedData {
    const ENTITY: EntityType = EntityType::Deed;
}

// ---------------------------------------------------------------------------
// Record aliases
// ---------------------------------------------------------------------------

pub type Structure = Leaf<StructureData>;
pub type Address = Leaf<AddressData>;
pub type Property = Leaf<PropertyData>;
pub type IpfsFactSheet = Leaf<IpfsFactSheetData>;
pub type Lot = Leaf<LotData>;
pub type Utility = Leaf<UtilityData>;
pub type FloodStormInformation = Leaf<FloodStormData>;
pub type SalesHistory = Leaf<SalesHistoryData>;
pub type Tax = Leaf<TaxData>;
pub type Person = Leaf<PersonData>;
pub type Company = Leaf<CompanyData>;
pub type Layout = Leaf<LayoutData>;
pub type File = Leaf<FileData>;
pub type Deed = Leaf<DeedData>;
