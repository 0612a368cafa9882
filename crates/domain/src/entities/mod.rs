//! Domain entities - Records assembled from geocoding responses

mod address_record;

pub use address_record::{AddressRecord, AddressRecordBuilder};
