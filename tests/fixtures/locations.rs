//! Real Las Vegas / Henderson delivery locations.
//!
//! Coordinates sourced from OpenStreetMap. Routable with Mapbox or an OSRM
//! Nevada extract.

use tour_sequencer::Point;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn to_point(&self, id: i64) -> Point {
        Point::new(id, self.name, self.lat, self.lng)
    }
}

/// Supplier warehouse every test route starts from.
pub const DEPOT: Location = Location::new("Wynn Las Vegas", 36.1263781, -115.1658180);

pub const STRIP: &[Location] = &[
    Location::new("Hard Rock Cafe", 36.1041592, -115.1722166),
    Location::new("Sinatra", 36.1300035, -115.1654850),
    Location::new("Public House", 36.1219193, -115.1689317),
    Location::new("Brooklyn Bowl", 36.1175388, -115.1695094),
    Location::new("Gordon Ramsay BurGR", 36.1107195, -115.1720818),
    Location::new("Spago by Wolfgang Puck", 36.1139368, -115.1741462),
    Location::new("Hash House A Go Go", 36.1181377, -115.1710989),
    Location::new("Strip Steak", 36.0908722, -115.1776176),
    Location::new("Gallagher's", 36.1025514, -115.1742518),
    Location::new("mon ami Gabi", 36.1128554, -115.1724137),
    Location::new("Oyster Bar", 36.1194951, -115.1715059),
    Location::new("Grimaldi's Pizzeria", 36.1248850, -115.1683540),
];

pub const SOUTH: &[Location] = &[
    Location::new("Bootlegger Bistro", 36.0492047, -115.1715744),
    Location::new("Denny's South", 36.0591086, -115.1717250),
    Location::new("kabuki Japanese", 36.0675472, -115.1779391),
    Location::new("Mikos Izakaya", 36.0429503, -115.1527627),
    Location::new("Budget Suites South", 36.0366259, -115.1713361),
    Location::new("Pei Wei Town Square", 36.0810469, -115.1472694),
];

pub const EAST: &[Location] = &[
    Location::new("Hello Tokyo", 36.1161627, -115.0902096),
    Location::new("Original Lindo Michoacan", 36.1294005, -115.1135106),
    Location::new("Tomo Sushi", 36.0992464, -115.1142123),
    Location::new("Sushi Twister", 36.1007300, -115.0526259),
    Location::new("Chuck Wagon Restaurant", 36.1072491, -115.0593482),
    Location::new("Roma Pizza", 36.1012461, -115.0753039),
    Location::new("Rivas Mexican Grill North", 36.1450055, -115.0482587),
    Location::new("Monarca Mexican Restaurant", 36.1440711, -115.0634197),
];

pub const HENDERSON: &[Location] = &[
    Location::new("I Love Sushi Henderson", 35.9916660, -115.1028343),
    Location::new("Islander's Grill", 36.0335058, -114.9856162),
    Location::new("Naga", 36.0137634, -114.9928676),
    Location::new("Green Valley Ranch Area", 36.0308, -115.0825),
    Location::new("Sunset Station Area", 36.0614, -115.0631),
];

pub fn depot() -> Point {
    Point::start(DEPOT.lat, DEPOT.lng)
}

/// All fixture stops with ids starting at 1, interleaved across areas so the
/// input order is spatially scattered.
pub fn delivery_stops() -> Vec<Point> {
    let groups = [STRIP, SOUTH, EAST, HENDERSON];
    let longest = groups.iter().map(|g| g.len()).max().unwrap_or(0);

    let mut stops = Vec::new();
    for i in 0..longest {
        for group in groups {
            if let Some(location) = group.get(i) {
                stops.push(location.to_point(stops.len() as i64 + 1));
            }
        }
    }
    stops
}

/// `count` synthetic stops on a jittered grid around the depot, ids from 1.
pub fn synthetic_stops(count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let row = (i / 8) as f64;
            let col = (i % 8) as f64;
            let jitter = ((i * 37) % 11) as f64 * 0.0007;
            Point::new(
                i as i64 + 1,
                format!("Customer {}", i + 1),
                DEPOT.lat - 0.04 + row * 0.012 + jitter,
                DEPOT.lng - 0.05 + col * 0.013 - jitter,
            )
        })
        .collect()
}
