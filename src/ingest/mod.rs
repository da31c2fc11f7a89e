/// Data source adapters.
///
/// Each upstream API gets its own file; all of them share the GET
/// primitive in `http`.

pub mod http;
pub mod nwps;
pub mod owm;
pub mod usgs;

#[cfg(test)]
pub mod fixtures;
