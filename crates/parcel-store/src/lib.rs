//! Record storage for the parcel indexer.
//!
//! This crate defines the typed entities the indexer materializes and the
//! narrow get/set interface it writes them through. Every leaf record is
//! keyed by the CID it was resolved from; the root record is keyed by the
//! parcel identifier once known, else by the chain property hash.
//!
//! # Entities
//!
//! - [`RootRecord`] -- per-property aggregate with singleton foreign keys
//! - [`Leaf`] -- generic leaf wrapper (`id`, optional `property_id`, fields)
//! - Field sets: [`StructureData`], [`AddressData`], [`PropertyData`], ...
//!
//! # Storage Backends
//!
//! All backends implement the [`RecordStore`] trait:
//!
//! - [`InMemoryRecordStore`] -- map-based store for tests and embedding
//! - [`JsonDirRecordStore`] -- one JSON file per record on local disk
//!
//! # Design Rules
//!
//! 1. Writes are create-or-replace; last write wins.
//! 2. Nothing is deleted through the store interface.
//! 3. A leaf id always equals its source CID.
//! 4. Field decoding never fails on shape; unusable values become absent.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod entity;
pub mod error;
pub mod json_dir;
pub mod leaf;
pub mod memory;
pub mod normalize;
pub mod record;
pub mod root;
pub mod traits;

pub use entity::EntityType;
pub use error::{StoreError, StoreResult};
pub use json_dir::JsonDirRecordStore;
pub use leaf::{
    Address, AddressData, Company, CompanyData, Deed, DeedData, File, FileData,
    FloodStormData, FloodStormInformation, IpfsFactSheet, IpfsFactSheetData, Layout, LayoutData,
    Leaf, LeafData, Lot, LotData, Person, PersonData, Property, PropertyData, SalesHistory,
    SalesHistoryData, Structure, StructureData, Tax, TaxData, Utility, UtilityData,
};
pub use memory::InMemoryRecordStore;
pub use record::{Entity, StoredRecord};
pub use root::{IdSource, RootRecord};
pub use traits::{RecordStore, RecordStoreExt};
