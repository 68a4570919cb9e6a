//! Distance computations over a line's station sequence
//!
//! Everything here is a pure function of a slice of [`LineStationLink`]s.
//! Links are never assumed to be stored in order or to have contiguous
//! positions: every computation starts from [`traversal_order`].

use std::{cmp::Ordering, collections::HashMap};

use serde::{Deserialize, Serialize};

use crate::{
    entities::LineStationLink,
    value_objects::{LineStationId, SequencePosition, StationId},
};

/// Sort links into traversal order
///
/// Ascending `sequence_position`; links sharing a position keep creation order.
#[must_use]
pub fn traversal_order(links: &[LineStationLink]) -> Vec<&LineStationLink> {
    let mut ordered: Vec<&LineStationLink> = links.iter().collect();
    ordered.sort_by(|a, b| compare_links(a, b));
    ordered
}

fn compare_links(a: &LineStationLink, b: &LineStationLink) -> Ordering {
    a.sequence_position
        .cmp(&b.sequence_position)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Distance of one station from the start of its line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativeDistance {
    /// Link the entry was computed from
    pub link_id: LineStationId,
    /// Station at this point of the line
    pub station_id: StationId,
    /// Place in the traversal order
    pub sequence_position: SequencePosition,
    /// Kilometers from the previous station
    pub distance_from_previous: f64,
    /// Running sum of `distance_from_previous` up to and including this station
    pub distance_from_origin: f64,
}

/// Prefix sums of the distance increments in traversal order
///
/// The last entry's `distance_from_origin` equals the line's total distance.
#[must_use]
pub fn cumulative_distances(links: &[LineStationLink]) -> Vec<CumulativeDistance> {
    let mut running = 0.0;
    traversal_order(links)
        .into_iter()
        .map(|link| {
            running += link.distance_from_previous;
            CumulativeDistance {
                link_id: link.id,
                station_id: link.station_id,
                sequence_position: link.sequence_position,
                distance_from_previous: link.distance_from_previous,
                distance_from_origin: running,
            }
        })
        .collect()
}

/// Distance travelled between two stations of the same line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationPairDistance {
    /// Station the query started from
    pub origin: StationId,
    /// Station the query ended at
    pub destination: StationId,
    /// Kilometers along the line between the two stations
    pub distance_km: f64,
    /// Positions strictly between the two stations
    pub intermediate_station_count: u32,
}

#[derive(Debug, Clone, Copy)]
struct ProfileStop {
    station_id: StationId,
    position: SequencePosition,
    /// Sum of increments of every link whose position is <= this one
    reach: f64,
}

/// Precomputed view of a line answering pairwise distance queries in O(1)
///
/// The distance between positions `lo < hi` is the sum of the increments of
/// every link with `lo < position <= hi`, i.e. `reach(hi) - reach(lo)`.
/// Point queries and the full matrix share this computation, so a matrix
/// entry is always identical to the matching point query.
#[derive(Debug, Clone)]
pub struct RouteProfile {
    stops: Vec<ProfileStop>,
    index: HashMap<StationId, usize>,
}

impl RouteProfile {
    /// Build the profile from a line's links in O(n log n)
    #[must_use]
    pub fn new(links: &[LineStationLink]) -> Self {
        let ordered = traversal_order(links);

        let mut running = 0.0;
        let mut stops: Vec<ProfileStop> = ordered
            .iter()
            .map(|link| {
                running += link.distance_from_previous;
                ProfileStop {
                    station_id: link.station_id,
                    position: link.sequence_position,
                    reach: running,
                }
            })
            .collect();

        // Links sharing a position all reach as far as the last of them.
        for i in (0..stops.len().saturating_sub(1)).rev() {
            if stops[i].position == stops[i + 1].position {
                stops[i].reach = stops[i + 1].reach;
            }
        }

        let index = stops
            .iter()
            .enumerate()
            .map(|(i, stop)| (stop.station_id, i))
            .collect();

        Self { stops, index }
    }

    /// Number of stations on the line
    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether the line has no stations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Whether the station is linked to the line
    #[must_use]
    pub fn contains(&self, station_id: StationId) -> bool {
        self.index.contains_key(&station_id)
    }

    /// Distance between two stations, independent of argument order
    ///
    /// Returns `None` if either station is not on the line.
    #[must_use]
    pub fn between(&self, origin: StationId, destination: StationId) -> Option<StationPairDistance> {
        let a = *self.index.get(&origin)?;
        let b = *self.index.get(&destination)?;
        Some(self.pair(a, b))
    }

    /// Distances between every unordered pair of distinct stations
    ///
    /// Pairs come in nested-loop order: origins by ascending position, and
    /// for each origin every later station by ascending position.
    #[must_use]
    pub fn matrix(&self) -> Vec<StationPairDistance> {
        let n = self.stops.len();
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push(self.pair(i, j));
            }
        }
        pairs
    }

    fn pair(&self, a: usize, b: usize) -> StationPairDistance {
        let (origin, destination) = (self.stops[a], self.stops[b]);
        let (near, far) = if origin.position <= destination.position {
            (origin, destination)
        } else {
            (destination, origin)
        };

        StationPairDistance {
            origin: origin.station_id,
            destination: destination.station_id,
            distance_km: far.reach - near.reach,
            intermediate_station_count: near.position.positions_between(far.position),
        }
    }
}
