use geojson::{Feature, GeoJson, Value as Geometry};
use serde::Serialize;

use crate::error::LoadFailure;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Latitude/longitude box, as used by map `fit_bounds` calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn around(center: GeoPoint, half_height: f64, half_width: f64) -> Self {
        Self {
            south: center.lat - half_height,
            west: center.lng - half_width,
            north: center.lat + half_height,
            east: center.lng + half_width,
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Option<Self> {
        points.into_iter().fold(None, |bounds, point| {
            Some(match bounds {
                None => Self {
                    south: point.lat,
                    west: point.lng,
                    north: point.lat,
                    east: point.lng,
                },
                Some(bounds) => bounds.extend(*point),
            })
        })
    }

    #[must_use]
    pub fn extend(self, point: GeoPoint) -> Self {
        Self {
            south: self.south.min(point.lat),
            west: self.west.min(point.lng),
            north: self.north.max(point.lat),
            east: self.east.max(point.lng),
        }
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            south: self.south.min(other.south),
            west: self.west.min(other.west),
            north: self.north.max(other.north),
            east: self.east.max(other.east),
        }
    }

    /// Grows the box by `ratio` of its size on every side.
    #[must_use]
    pub fn padded(self, ratio: f64) -> Self {
        let pad_lat = (self.north - self.south).max(0.01) * ratio;
        let pad_lng = (self.east - self.west).max(0.01) * ratio;
        Self {
            south: self.south - pad_lat,
            west: self.west - pad_lng,
            north: self.north + pad_lat,
            east: self.east + pad_lng,
        }
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.lat) && (self.west..=self.east).contains(&point.lng)
    }
}

/// A named district outline from the boundary dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub name: String,
    pub population: Option<f64>,
    /// Outer rings and holes of every polygon, flattened
    pub rings: Vec<Vec<GeoPoint>>,
}

impl BoundaryFeature {
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.rings.iter().flatten())
    }

    fn from_feature(index: usize, feature: &Feature) -> Result<Self, LoadFailure> {
        let name = feature
            .property("name")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| LoadFailure::Shape(format!("feature {index} has no name")))?
            .to_string();
        let population = feature
            .property("population")
            .and_then(serde_json::Value::as_f64);

        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| LoadFailure::Shape(format!("feature {name} has no geometry")))?;

        let polygons = match &geometry.value {
            Geometry::Polygon(polygon) => vec![polygon.clone()],
            Geometry::MultiPolygon(polygons) => polygons.clone(),
            _ => {
                return Err(LoadFailure::Shape(format!(
                    "feature {name} is not a polygon"
                )))
            }
        };

        let rings = polygons
            .iter()
            .flatten()
            .map(|ring| {
                ring.iter()
                    .map(|position| point_from_position(position))
                    .collect::<Option<Vec<_>>>()
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| LoadFailure::Shape(format!("feature {name} has a short position")))?;

        Ok(Self {
            name,
            population,
            rings,
        })
    }
}

/// District outlines joined to the local dataset by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoBoundary {
    pub features: Vec<BoundaryFeature>,
}

impl GeoBoundary {
    pub fn from_json(body: &str) -> Result<Self, LoadFailure> {
        let geojson = body
            .parse::<GeoJson>()
            .map_err(|error| LoadFailure::Malformed(error.to_string()))?;

        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(LoadFailure::Shape(
                "boundaries must be a FeatureCollection".to_string(),
            ));
        };

        let features = collection
            .features
            .iter()
            .enumerate()
            .map(|(index, feature)| BoundaryFeature::from_feature(index, feature))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { features })
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.features
            .iter()
            .filter_map(BoundaryFeature::bounds)
            .reduce(Bounds::union)
    }
}

// GeoJSON positions are `[lng, lat, ...]`
fn point_from_position(position: &[f64]) -> Option<GeoPoint> {
    match position {
        [lng, lat, ..] => Some(GeoPoint::new(*lat, *lng)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Zagazig", "population": 1450000 },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[31.45, 30.52], [31.58, 30.52], [31.58, 30.65], [31.45, 30.52]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "Belbeis" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[31.50, 30.38], [31.62, 30.38], [31.62, 30.48], [31.50, 30.38]]],
                        [[[31.70, 30.40], [31.75, 30.40], [31.75, 30.45], [31.70, 30.40]]]
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn reads_polygons_and_multipolygons() {
        let boundary = GeoBoundary::from_json(BOUNDARIES).unwrap();
        assert_eq!(boundary.features.len(), 2);
        assert_eq!(boundary.features[0].name, "Zagazig");
        assert_eq!(boundary.features[0].population, Some(1_450_000.0));
        assert_eq!(boundary.features[0].rings[0][1], GeoPoint::new(30.52, 31.58));
        assert_eq!(boundary.features[1].rings.len(), 2);
        assert_eq!(boundary.features[1].population, None);
    }

    #[test]
    fn bounds_cover_every_feature() {
        let boundary = GeoBoundary::from_json(BOUNDARIES).unwrap();
        let bounds = boundary.bounds().unwrap();
        assert!((bounds.south - 30.38).abs() < 1e-9);
        assert!((bounds.east - 31.75).abs() < 1e-9);
        assert!(bounds.contains(GeoPoint::new(30.5, 31.5)));
    }

    #[test]
    fn unnamed_feature_is_rejected() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]] }
            }]
        }"#;
        assert_eq!(
            GeoBoundary::from_json(body),
            Err(LoadFailure::Shape("feature 0 has no name".to_string()))
        );
    }

    #[test]
    fn point_geometry_is_rejected() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "name": "Zagazig" },
                "geometry": { "type": "Point", "coordinates": [31.5, 30.5] }
            }]
        }"#;
        assert!(matches!(GeoBoundary::from_json(body), Err(LoadFailure::Shape(_))));
    }

    #[test]
    fn plain_geometry_document_is_not_a_collection() {
        let body = r#"{ "type": "Point", "coordinates": [31.5, 30.5] }"#;
        assert!(matches!(GeoBoundary::from_json(body), Err(LoadFailure::Shape(_))));
        assert!(matches!(GeoBoundary::from_json("[1,"), Err(LoadFailure::Malformed(_))));
    }
}
