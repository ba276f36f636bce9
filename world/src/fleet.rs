//! Inert collection trucks held by the world.

use waste_route_core::TruckId;

/// Opaque truck handle. The world holds trucks but never calls into them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Truck {
    id: TruckId,
}

impl Truck {
    /// Creates a truck carrying the provided identifier.
    #[must_use]
    pub const fn new(id: TruckId) -> Self {
        Self { id }
    }

    /// Identifier assigned to the truck.
    #[must_use]
    pub const fn id(&self) -> TruckId {
        self.id
    }
}

/// Builds `count` trucks with sequential identifiers starting at zero.
#[must_use]
pub fn assemble(count: u32) -> Vec<Truck> {
    (0..count).map(|index| Truck::new(TruckId::new(index))).collect()
}
