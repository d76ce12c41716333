//! Simulated shipping journeys.
//!
//! A [`Journey`] is a fixed route: an origin, zero or more transit hubs,
//! and a destination. A [`JourneySimulator`] walks it in order, reporting
//! each stop through [`MobileAsset::move_to`] and sleeping on the tokio
//! clock between consecutive stops. A journey of `n` stops waits `n - 1`
//! times.
//!
//! The simulator keeps no state besides the index of the next stop.

use std::time::Duration;

use evidence_registry::Registry;
use evidence_types::Event;

use crate::error::EvidenceError;
use crate::mobile_asset::MobileAsset;
use crate::payload::Movement;

/// Crate load reported at the origin and destination.
pub const DEFAULT_UNITS: u32 = 448;

/// The role a stop plays in a journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    /// Where the crate is sealed.
    Origin,
    /// A hub where the crate changes hands.
    Transit,
    /// Where the crate is unsealed.
    Destination,
}

/// A named stop on a journey.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    /// Place name.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Waypoint {
    /// A waypoint at the given coordinates.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }
}

/// An ordered route from an origin to a destination.
#[derive(Debug, Clone, PartialEq)]
pub struct Journey {
    origin: Waypoint,
    transits: Vec<Waypoint>,
    destination: Waypoint,
    units: u32,
}

impl Journey {
    /// A route carrying `units` units.
    pub const fn new(origin: Waypoint, transits: Vec<Waypoint>, destination: Waypoint, units: u32) -> Self {
        Self {
            origin,
            transits,
            destination,
            units,
        }
    }

    /// Flint to Stuttgart via Chicago, Newark, Heathrow, Munich and the
    /// Stuttgart hub.
    pub fn synsation(units: u32) -> Self {
        Self::new(
            Waypoint::new("Synsation Flint Manufacturing", 43.018_889, -83.693_333),
            vec![
                Waypoint::new("Chicago Freight Hub", 41.978_611, -87.904_722),
                Waypoint::new("Newark Freight Intl", 40.692_500, -74.168_611),
                Waypoint::new("London Heathrow T4", 51.459_455, -0.446_953),
                Waypoint::new("Munich Forwarding", 48.353_889, 11.786_111),
                Waypoint::new("Stuttgart Hub", 48.690_000, 9.221_944),
            ],
            Waypoint::new("Synsation Stuttgart Finishing Plant", 48.783_333, 9.183_333),
            units,
        )
    }

    /// Number of stops, origin and destination included.
    pub fn len(&self) -> usize {
        self.transits.len().saturating_add(2)
    }

    /// Always `false`: a journey has at least an origin and a destination.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The stop at `index` and its role, if in range.
    pub fn stop(&self, index: usize) -> Option<(Leg, &Waypoint)> {
        let last = self.transits.len().saturating_add(1);
        match index {
            0 => Some((Leg::Origin, &self.origin)),
            i if i == last => Some((Leg::Destination, &self.destination)),
            i => self
                .transits
                .get(i.checked_sub(1)?)
                .map(|waypoint| (Leg::Transit, waypoint)),
        }
    }

    /// The movement reported at stop `index`.
    pub fn movement(&self, index: usize) -> Option<Movement> {
        let (leg, waypoint) = self.stop(index)?;
        let name = &waypoint.name;
        let units = self.units;
        let description = match leg {
            Leg::Origin => format!("Crate sealed in {name} with {units} units on board"),
            Leg::Transit => {
                format!("Crate transferred by shipping agent at {name} for onward forwarding")
            }
            Leg::Destination => format!("Crate unsealed in {name} with {units} units on board"),
        };
        Some(Movement {
            description,
            latitude: waypoint.latitude,
            longitude: waypoint.longitude,
        })
    }

    /// Every movement in route order.
    pub fn movements(&self) -> Vec<Movement> {
        (0..self.len()).filter_map(|index| self.movement(index)).collect()
    }
}

/// Walks a [`Journey`] for one mobile asset.
#[derive(Debug)]
pub struct JourneySimulator<'a, 'r, R> {
    asset: &'a MobileAsset<'r, R>,
    journey: Journey,
    delay: Duration,
    next: usize,
}

impl<'a, 'r, R: Registry> JourneySimulator<'a, 'r, R> {
    /// A simulator positioned before the origin.
    pub const fn new(asset: &'a MobileAsset<'r, R>, journey: Journey, delay: Duration) -> Self {
        Self {
            asset,
            journey,
            delay,
            next: 0,
        }
    }

    /// Index of the next stop to report.
    pub const fn next_index(&self) -> usize {
        self.next
    }

    /// Whether every stop has been reported.
    pub fn is_finished(&self) -> bool {
        self.next >= self.journey.len()
    }

    /// Report the next stop without waiting. Returns `None` once the
    /// journey is finished.
    ///
    /// # Errors
    ///
    /// As [`MobileAsset::move_to`]. The stop is not consumed on failure.
    pub async fn advance(&mut self) -> Result<Option<Event>, EvidenceError> {
        let Some(movement) = self.journey.movement(self.next) else {
            return Ok(None);
        };
        if let Some((Leg::Transit | Leg::Destination, waypoint)) = self.journey.stop(self.next) {
            tracing::info!(stop = self.next, waypoint = %waypoint.name, "Asset arriving");
        }
        let event = self.asset.move_to(&movement, None).await?;
        self.next = self.next.saturating_add(1);
        Ok(Some(event))
    }

    /// Report every remaining stop, sleeping between consecutive stops.
    ///
    /// The delay also precedes the first stop of a resumed run when earlier
    /// stops were already reported.
    ///
    /// # Errors
    ///
    /// Stops at the first failed report; earlier events stay appended.
    pub async fn run(&mut self) -> Result<Vec<Event>, EvidenceError> {
        let mut events = Vec::with_capacity(self.journey.len().saturating_sub(self.next));
        tracing::info!(
            record = %self.asset.record(),
            stops = self.journey.len(),
            delay_ms = self.delay.as_millis(),
            "Journey starting"
        );
        while !self.is_finished() {
            if self.next > 0 {
                tokio::time::sleep(self.delay).await;
            }
            if let Some(event) = self.advance().await? {
                events.push(event);
            }
        }
        tracing::info!(record = %self.asset.record(), events = events.len(), "Journey complete");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synsation_route_has_seven_stops() {
        let journey = Journey::synsation(DEFAULT_UNITS);
        assert_eq!(journey.len(), 7);
        assert_eq!(journey.movements().len(), 7);
        assert!(journey.movement(7).is_none());
    }

    #[test]
    fn narratives_follow_the_leg() {
        let journey = Journey::synsation(12);
        let movements = journey.movements();
        assert_eq!(
            movements.first().map(|m| m.description.as_str()),
            Some("Crate sealed in Synsation Flint Manufacturing with 12 units on board")
        );
        assert_eq!(
            movements.get(3).map(|m| m.description.as_str()),
            Some("Crate transferred by shipping agent at London Heathrow T4 for onward forwarding")
        );
        assert_eq!(
            movements.last().map(|m| m.description.as_str()),
            Some("Crate unsealed in Synsation Stuttgart Finishing Plant with 12 units on board")
        );
    }

    #[test]
    fn direct_route_has_no_transits() {
        let journey = Journey::new(
            Waypoint::new("A", 0.0, 0.0),
            Vec::new(),
            Waypoint::new("B", 1.0, 1.0),
            1,
        );
        assert_eq!(journey.len(), 2);
        assert!(matches!(journey.stop(1), Some((Leg::Destination, _))));
    }
}
