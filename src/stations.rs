/// Station registry for the Little Falls river conditions service.
///
/// The service watches a single reach of the Potomac. Each upstream data
/// source knows the gauge by a different identifier; this module is the
/// single place those identifiers are written down. `config` uses the
/// entry here for every default.

// ---------------------------------------------------------------------------
// Station metadata
// ---------------------------------------------------------------------------

/// A monitored location and its identifiers in each data source.
pub struct Station {
    /// Official USGS site name.
    pub name: &'static str,
    /// 8-digit USGS NWIS site code.
    pub usgs_site_code: &'static str,
    /// NWS location identifier used by NWPS (lowercase).
    pub nwps_lid: &'static str,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
}

/// Potomac River at Little Falls, upstream of Washington, DC.
///
/// The NWPS gauge `brkm2` (Little Falls, MD) shares the USGS station's
/// stage/flow record.
pub static LITTLE_FALLS: Station = Station {
    name: "POTOMAC RIVER NEAR WASH, DC LITTLE FALLS PUMP STA",
    usgs_site_code: "01646500",
    nwps_lid: "brkm2",
    latitude: 38.94977778,
    longitude: -77.12763889,
};

pub static STATION_REGISTRY: &[&Station] = &[&LITTLE_FALLS];

/// Looks up a station by its USGS site code. Returns `None` if not found.
pub fn find_station(usgs_site_code: &str) -> Option<&'static Station> {
    STATION_REGISTRY
        .iter()
        .copied()
        .find(|s| s.usgs_site_code == usgs_site_code)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
