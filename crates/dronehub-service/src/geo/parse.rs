//! Pure parsing of tabular geo-position data.
//!
//! Input is comma-separated with a header row. Column roles are assigned
//! once per file from the header, by case-insensitive substring match:
//! a column containing `lat` is the latitude, `lon`/`lng` the longitude,
//! `alt`/`elevation` the altitude. The first matching column per role wins.

use csv::ReaderBuilder;

use dronehub_core::error::{AppError, ErrorKind};
use dronehub_core::result::AppResult;

/// Meters per degree of latitude (and of longitude at the equator).
const METERS_PER_DEGREE: f64 = 111_000.0;

/// Minimum number of position samples before an area estimate is made.
const MIN_AREA_SAMPLES: usize = 4;

/// Aggregated values computed from one geo-position file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoSummary {
    /// Arithmetic mean of all collected latitudes.
    pub center_latitude: Option<f64>,
    /// Arithmetic mean of all collected longitudes.
    pub center_longitude: Option<f64>,
    /// Lowest collected altitude.
    pub min_altitude: Option<f64>,
    /// Highest collected altitude.
    pub max_altitude: Option<f64>,
    /// Approximate covered area in square meters (bounding-box estimate,
    /// only present with at least four position samples).
    pub area_covered: Option<f64>,
    /// Number of rows that contributed a latitude/longitude pair.
    pub position_samples: usize,
    /// Number of rows that contributed an altitude.
    pub altitude_samples: usize,
}

impl GeoSummary {
    /// Whether the file contributed any usable values at all.
    pub fn is_empty(&self) -> bool {
        self.position_samples == 0 && self.altitude_samples == 0
    }
}

/// Column indices for the three roles, resolved from the header once.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnRoles {
    latitude: Option<usize>,
    longitude: Option<usize>,
    altitude: Option<usize>,
}

impl ColumnRoles {
    fn from_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Self {
        let mut roles = Self::default();
        for (idx, name) in headers.enumerate() {
            let lower = name.to_lowercase();
            if roles.latitude.is_none() && lower.contains("lat") {
                roles.latitude = Some(idx);
            }
            if roles.longitude.is_none() && (lower.contains("lon") || lower.contains("lng")) {
                roles.longitude = Some(idx);
            }
            if roles.altitude.is_none() && (lower.contains("alt") || lower.contains("elevation")) {
                roles.altitude = Some(idx);
            }
        }
        roles
    }
}

/// Parse raw geo-position file content into a [`GeoSummary`].
///
/// A row contributes to the position accumulation only when both latitude
/// and longitude parse; altitude accumulates independently. Rows with
/// unparseable values are skipped for the affected role, never the whole
/// file. A malformed file (CSV-level error) aborts with a parse error.
pub fn parse_geo_summary(content: &[u8]) -> AppResult<GeoSummary> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(content);

    let headers = reader
        .headers()
        .map_err(|e| AppError::with_source(ErrorKind::Parse, "Failed to read header row", e))?;
    let roles = ColumnRoles::from_headers(headers.iter());

    let mut latitudes: Vec<f64> = Vec::new();
    let mut longitudes: Vec<f64> = Vec::new();
    let mut altitudes: Vec<f64> = Vec::new();

    for record in reader.records() {
        let record = record
            .map_err(|e| AppError::with_source(ErrorKind::Parse, "Failed to read data row", e))?;

        let field = |idx: Option<usize>| -> Option<f64> {
            idx.and_then(|i| record.get(i))
                .and_then(|v| v.trim().parse::<f64>().ok())
        };

        if let (Some(lat), Some(lon)) = (field(roles.latitude), field(roles.longitude)) {
            latitudes.push(lat);
            longitudes.push(lon);
        }
        if let Some(alt) = field(roles.altitude) {
            altitudes.push(alt);
        }
    }

    let mut summary = GeoSummary {
        position_samples: latitudes.len(),
        altitude_samples: altitudes.len(),
        ..GeoSummary::default()
    };

    if !latitudes.is_empty() {
        summary.center_latitude = Some(mean(&latitudes));
        summary.center_longitude = Some(mean(&longitudes));
    }

    if !altitudes.is_empty() {
        summary.min_altitude = altitudes.iter().cloned().reduce(f64::min);
        summary.max_altitude = altitudes.iter().cloned().reduce(f64::max);
    }

    if latitudes.len() >= MIN_AREA_SAMPLES {
        summary.area_covered = Some(bounding_box_area(&latitudes, &longitudes));
    }

    Ok(summary)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Flat-earth bounding-box area estimate: the latitude span converts at
/// 111 000 m/degree, the longitude span is additionally scaled by the
/// cosine of the latitude midpoint. Not a true polygon area.
fn bounding_box_area(latitudes: &[f64], longitudes: &[f64]) -> f64 {
    let (lat_min, lat_max) = min_max(latitudes);
    let (lon_min, lon_max) = min_max(longitudes);

    let mid_lat_rad = ((lat_min + lat_max) / 2.0).to_radians();
    let ns_distance = (lat_max - lat_min) * METERS_PER_DEGREE;
    let ew_distance = (lon_max - lon_min) * METERS_PER_DEGREE * mid_lat_rad.cos();

    ns_distance * ew_distance
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values.iter().fold((f64::MAX, f64::MIN), |(min, max), v| {
        (min.min(*v), max.max(*v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_four_point_flight() {
        let csv = b"Latitude,Longitude,Altitude\n\
                    48.85,2.35,100\n\
                    48.86,2.36,110\n\
                    48.84,2.34,90\n\
                    48.87,2.37,120\n";
        let summary = parse_geo_summary(csv).unwrap();

        assert_eq!(summary.position_samples, 4);
        assert!(close(summary.center_latitude.unwrap(), 48.855));
        assert!(close(summary.center_longitude.unwrap(), 2.355));
        assert_eq!(summary.min_altitude, Some(90.0));
        assert_eq!(summary.max_altitude, Some(120.0));

        // Bounding box 48.84..48.87 × 2.34..2.37, east-west scaled by the
        // cosine of the latitude midpoint.
        let ns = (48.87 - 48.84) * 111_000.0;
        let ew = (2.37 - 2.34) * 111_000.0 * ((48.84f64 + 48.87) / 2.0).to_radians().cos();
        let area = summary.area_covered.unwrap();
        assert!((area - ns * ew).abs() / (ns * ew) < 1e-9);
    }

    #[test]
    fn test_determinism() {
        let csv = b"lat,lon,alt\n48.85,2.35,100\n48.86,2.36,110\n48.84,2.34,90\n48.87,2.37,120\n";
        let first = parse_geo_summary(csv).unwrap();
        let second = parse_geo_summary(csv).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_header_substring_roles() {
        // Role assignment is by substring, first match wins.
        let csv = b"gps_latitude,gps_longitude,elevation_m\n10.0,20.0,5.5\n";
        let summary = parse_geo_summary(csv).unwrap();
        assert_eq!(summary.center_latitude, Some(10.0));
        assert_eq!(summary.center_longitude, Some(20.0));
        assert_eq!(summary.min_altitude, Some(5.5));
    }

    #[test]
    fn test_lng_alias_for_longitude() {
        let csv = b"lat,lng\n1.0,2.0\n";
        let summary = parse_geo_summary(csv).unwrap();
        assert_eq!(summary.center_longitude, Some(2.0));
    }

    #[test]
    fn test_unparseable_pair_skips_row_entirely() {
        let csv = b"lat,lon,alt\n1.0,not-a-number,50\n3.0,4.0,60\n";
        let summary = parse_geo_summary(csv).unwrap();
        // The broken row contributes no position...
        assert_eq!(summary.position_samples, 1);
        assert_eq!(summary.center_latitude, Some(3.0));
        // ...but its altitude still counts, independently.
        assert_eq!(summary.altitude_samples, 2);
        assert_eq!(summary.min_altitude, Some(50.0));
    }

    #[test]
    fn test_unparseable_altitude_dropped_for_row_only() {
        let csv = b"lat,lon,alt\n1.0,2.0,bad\n3.0,4.0,70\n";
        let summary = parse_geo_summary(csv).unwrap();
        assert_eq!(summary.position_samples, 2);
        assert_eq!(summary.altitude_samples, 1);
        assert_eq!(summary.max_altitude, Some(70.0));
    }

    #[test]
    fn test_no_area_below_four_samples() {
        let csv = b"lat,lon\n1.0,2.0\n1.1,2.1\n1.2,2.2\n";
        let summary = parse_geo_summary(csv).unwrap();
        assert_eq!(summary.position_samples, 3);
        assert!(summary.center_latitude.is_some());
        assert_eq!(summary.area_covered, None);
    }

    #[test]
    fn test_missing_coordinate_columns() {
        let csv = b"time,speed\n1,2\n3,4\n";
        let summary = parse_geo_summary(csv).unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.center_latitude, None);
    }

    #[test]
    fn test_altitude_without_position() {
        let csv = b"altitude\n10\n30\n20\n";
        let summary = parse_geo_summary(csv).unwrap();
        assert_eq!(summary.position_samples, 0);
        assert_eq!(summary.min_altitude, Some(10.0));
        assert_eq!(summary.max_altitude, Some(30.0));
    }
}
