//! County and zip code reference lookups

use super::table::{Filter, LookupTable};
use log::warn;

pub const FIPS_COUNTY_TABLE_NAME: &str = "fips-county";
pub const ZIP_CODE_TABLE_NAME: &str = "zip-code-data";

const FIPS_STATE: &str = "state";
const FIPS_COUNTY: &str = "county";
const FIPS_CODE: &str = "FIPS";
const ZIP_CODE: &str = "zipcode";
const ZIP_STATE: &str = "state_abbr";

/// FIPS code of a county, or the county name itself when the table has no entry
pub fn fips_county_code(table: &dyn LookupTable, county: &str, state: &str) -> String {
    table
        .find_single_result(
            FIPS_CODE,
            &[Filter::equals(FIPS_STATE, state), Filter::equals(FIPS_COUNTY, county)],
        )
        .unwrap_or_else(|| county.to_string())
}

/// States covering a zip code, comma separated; empty when unknown
///
/// Only the first five characters are used, so ZIP+4 codes work.
pub fn states_for_zip_code(table: &dyn LookupTable, zip_code: &str) -> String {
    let zip5: String = zip_code.trim().chars().take(5).collect();
    let states = table.find_distinct(ZIP_STATE, &[Filter::equals(ZIP_CODE, zip5.as_str())]);
    if states.is_empty() {
        warn!("getStateFromZipCode() lookup failed for zip code: {zip_code}");
    }
    states.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::table::InMemoryLookupTable;

    #[test]
    fn test_fips_county_code() {
        let table = InMemoryLookupTable::from_rows(
            FIPS_COUNTY_TABLE_NAME,
            &["state", "county", "FIPS"],
            vec![vec!["CO", "Adams", "08001"], vec!["CO", "Denver", "08031"]],
        );
        assert_eq!(fips_county_code(&table, "ADAMS", "co"), "08001");
        assert_eq!(fips_county_code(&table, "Nowhere", "CO"), "Nowhere");
    }

    #[test]
    fn test_states_for_zip_code() {
        let table = InMemoryLookupTable::from_rows(
            ZIP_CODE_TABLE_NAME,
            &["state_fips", "state", "state_abbr", "zipcode"],
            vec![
                vec!["08", "Colorado", "CO", "80202"],
                vec!["08", "Colorado", "CO", "80202"],
                vec!["56", "Wyoming", "WY", "82063"],
                vec!["08", "Colorado", "CO", "82063"],
            ],
        );
        assert_eq!(states_for_zip_code(&table, "80202-1234"), "CO");
        assert_eq!(states_for_zip_code(&table, "82063"), "WY, CO");
        assert_eq!(states_for_zip_code(&table, "66666"), "");
    }
}
