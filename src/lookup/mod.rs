//! Reference tables consulted by the custom functions

pub mod geo;
pub mod livd;
pub mod table;

pub use geo::{FIPS_COUNTY_TABLE_NAME, ZIP_CODE_TABLE_NAME, fips_county_code, states_for_zip_code};
pub use livd::{LIVD_TABLE_NAME, LivdQuery, ObservationDevice};
pub use table::{Filter, InMemoryLookupTable, LookupTable, LookupTables};
