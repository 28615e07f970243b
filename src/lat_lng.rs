//! A latitude/longitude pair usable directly as a tree point.

use std::fmt;
use std::hash::{Hash, Hasher};

use ordered_float::OrderedFloat;

use crate::point::Point;

/// Mean radius of the Earth, in miles.
pub const EARTH_RADIUS_IN_MILES: f64 = 3959.0;

/// A position on the Earth in degrees, indexed as a 2-D point with latitude on axis 0 and
/// longitude on axis 1.
///
/// Distances measured by a [`KdTree`](crate::KdTree) of `LatLng`s are plain Euclidean
/// distances in degrees; [`distance_from`](LatLng::distance_from) gives the great-circle
/// distance in miles.
///
/// # Examples
///
/// ```rust
/// use kdsearch::{KdTree, LatLng};
///
/// let providence = LatLng::new(41.8240, -71.4128);
/// let boston = LatLng::new(42.3601, -71.0589);
/// let new_york = LatLng::new(40.7128, -74.0060);
///
/// let tree: KdTree<LatLng> = KdTree::build([boston, new_york])?;
/// assert_eq!(tree.nearest_one(&providence)?, &boston);
///
/// let miles = providence.distance_from(&boston);
/// assert!(miles > 35.0 && miles < 45.0);
/// # Ok::<(), kdsearch::KdTreeError>(())
/// ```
#[derive(Debug, Copy, Clone, Default)]
pub struct LatLng {
    coords: [f64; 2],
}

impl LatLng {
    /// Creates a position from a latitude and longitude, both in degrees.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { coords: [lat, lng] }
    }

    /// Latitude, in degrees.
    #[inline]
    pub fn lat(&self) -> f64 {
        self.coords[0]
    }

    /// Longitude, in degrees.
    #[inline]
    pub fn lng(&self) -> f64 {
        self.coords[1]
    }

    /// The position `miles` further north. Negative `miles` move south.
    pub fn move_north(&self, miles: f64) -> Self {
        let d_lat = (miles / EARTH_RADIUS_IN_MILES).to_degrees();
        Self::new(self.lat() + d_lat, self.lng())
    }

    /// The position `miles` further south.
    pub fn move_south(&self, miles: f64) -> Self {
        self.move_north(-miles)
    }

    /// The position `miles` further west, along the circle of the current latitude. Negative
    /// `miles` move east.
    pub fn move_west(&self, miles: f64) -> Self {
        let parallel_radius = EARTH_RADIUS_IN_MILES * self.lat().to_radians().cos();
        let d_lng = (miles / parallel_radius).to_degrees();
        Self::new(self.lat(), self.lng() - d_lng)
    }

    /// The position `miles` further east.
    pub fn move_east(&self, miles: f64) -> Self {
        self.move_west(-miles)
    }

    /// Great-circle distance to `other` in miles, by the spherical law of cosines.
    pub fn distance_from(&self, other: &LatLng) -> f64 {
        if self == other {
            return 0.0;
        }

        let (lat1, lng1) = (self.lat().to_radians(), self.lng().to_radians());
        let (lat2, lng2) = (other.lat().to_radians(), other.lng().to_radians());

        let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lng2 - lng1).cos();

        // rounding can push nearby points just past 1
        EARTH_RADIUS_IN_MILES * cos_angle.clamp(-1.0, 1.0).acos()
    }

    /// Straight-line distance to `other` in degrees, treating latitude and longitude as plane
    /// co-ordinates.
    pub fn euclidean_distance(&self, other: &LatLng) -> f64 {
        let d_lat = other.lat() - self.lat();
        let d_lng = other.lng() - self.lng();
        (d_lat * d_lat + d_lng * d_lng).sqrt()
    }
}

impl Point for LatLng {
    #[inline]
    fn location_data(&self) -> &[f64] {
        &self.coords
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self::new(lat, lng)
    }
}

impl PartialEq for LatLng {
    fn eq(&self, other: &Self) -> bool {
        OrderedFloat(self.lat()) == OrderedFloat(other.lat())
            && OrderedFloat(self.lng()) == OrderedFloat(other.lng())
    }
}

impl Eq for LatLng {}

impl Hash for LatLng {
    fn hash<H: Hasher>(&self, state: &mut H) {
        OrderedFloat(self.lat()).hash(state);
        OrderedFloat(self.lng()).hash(state);
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LatLng [lat={}, lng={}]", self.lat(), self.lng())
    }
}
