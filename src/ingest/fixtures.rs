/// Representative API payloads for unit tests.
///
/// The Little Falls NWIS response is a recorded capture from
/// waterservices.usgs.gov; the rest are trimmed by hand to the fields the
/// parsers read.

/// Recorded IV response for site 01646500 (temperature, discharge, stage).
/// The temperature series carries five method blocks; only the last one is
/// current.
pub fn fixture_little_falls_json() -> &'static str {
    include_str!("fixtures/nwis_little_falls.json")
}

/// IV response with a single temperature series holding one observation.
pub fn fixture_single_series_json(date_time: &str, value: &str) -> String {
    format!(
        r#"{{
          "value": {{
            "timeSeries": [{{
              "name": "USGS:01646500:00010:00000",
              "sourceInfo": {{
                "siteName": "POTOMAC RIVER NEAR WASH, DC LITTLE FALLS PUMP STA",
                "siteCode": [{{ "value": "01646500", "network": "NWIS", "agencyCode": "USGS" }}]
              }},
              "values": [{{
                "value": [{{ "dateTime": "{}", "qualifiers": ["P"], "value": "{}" }}]
              }}],
              "variable": {{
                "oid": "45807042",
                "unit": {{ "unitCode": "deg C" }},
                "variableCode": [{{ "value": "00010", "variableID": 45807042 }}],
                "noDataValue": -999999.0
              }}
            }}]
          }}
        }}"#,
        date_time, value
    )
}

/// Three series with every optional array empty or absent.
pub fn fixture_minimal_json() -> &'static str {
    r#"{
      "value": {
        "queryInfo": { "note": [] },
        "timeSeries": [
          {
            "sourceInfo": { "siteName": "Minimal", "siteCode": [], "note": [] },
            "values": [{
              "censorCode": [], "method": [], "offset": [], "qualifier": [],
              "value": [{ "dateTime": "2024-06-30T09:45:00.000-04:00", "value": "29.1" }]
            }],
            "variable": { "oid": "45807042", "variableCode": [] }
          },
          {
            "sourceInfo": { "siteName": "Minimal" },
            "values": [{ "value": [{ "dateTime": "2024-06-30T09:45:00.000-04:00", "value": "1570" }] }],
            "variable": { "oid": "45807197" }
          },
          {
            "sourceInfo": { "siteName": "Minimal" },
            "values": [],
            "variable": { "oid": "45807202" }
          }
        ]
      }
    }"#
}

/// NWPS stage/flow product with `count` hourly entries starting at
/// 2024-06-30T00:00Z. Primary (stage) of entry `i` is `3 + i/100`,
/// secondary (flow, kcfs) is `i`.
pub fn fixture_stageflow_json(count: usize) -> String {
    let data: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{ "validTime": "2024-06-30T{:02}:00:00Z", "generatedTime": "2024-06-30T23:59:00Z", "primary": {:.2}, "secondary": {}.0 }}"#,
                i,
                3.0 + i as f64 / 100.0,
                i
            )
        })
        .collect();

    format!(
        r#"{{
          "pedts": "HGIRG",
          "issuedTime": "2024-06-30T23:59:00Z",
          "wfo": "LWX",
          "timeZone": "EST5EDT",
          "primaryName": "Stage",
          "primaryUnits": "ft",
          "secondaryName": "Flow",
          "secondaryUnits": "kcfs",
          "data": [{}]
        }}"#,
        data.join(",\n")
    )
}

/// One Call response for Little Falls with two active alerts.
pub fn fixture_one_call_json() -> &'static str {
    r#"{
      "lat": 38.9498,
      "lon": -77.1276,
      "timezone": "America/New_York",
      "timezone_offset": -14400,
      "current": {
        "dt": 1719755100,
        "sunrise": 1719740300,
        "sunset": 1719794200,
        "temp": 88.3,
        "feels_like": 94.12,
        "pressure": 1012,
        "humidity": 55,
        "dew_point": 70.02,
        "uvi": 8.1,
        "clouds": 20,
        "visibility": 10000,
        "wind_speed": 6.91,
        "wind_deg": 200,
        "wind_gust": 12.5,
        "weather": [
          { "id": 801, "main": "Clouds", "description": "few clouds", "icon": "02d" }
        ]
      },
      "hourly": [],
      "alerts": [
        {
          "sender_name": "NWS Sterling VA",
          "event": "Heat Advisory",
          "start": 1719756000,
          "end": 1719792000,
          "description": "Heat index values up to 105 expected.",
          "tags": ["Extreme temperature value"]
        },
        {
          "sender_name": "NWS Sterling VA",
          "event": "Air Quality Alert",
          "start": 1719756000,
          "end": 1719792000,
          "description": "Code orange ozone.",
          "tags": []
        }
      ]
    }"#
}
