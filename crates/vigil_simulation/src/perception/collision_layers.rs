//! Collision layer bits, centralised for the whole engine.
//!
//! - Layers: which layer an obstacle lives on
//! - Masks: which layers a query considers
//!
//! ```text
//! Layer 2 (0b10  = 2): Actors (agents, player)
//! Layer 3 (0b100 = 4): Environment (walls, structures)
//! ```

/// Layer 2: Actors (agents, player)
pub const COLLISION_LAYER_ACTORS: u32 = 0b10;

/// Layer 3: Environment (walls, obstacles, terrain)
pub const COLLISION_LAYER_ENVIRONMENT: u32 = 0b100;

/// Mask: what blocks sight by default (walls / structures only)
pub const OBSTRUCTION_MASK_DEFAULT: u32 = COLLISION_LAYER_ENVIRONMENT;

/// Mask: what blocks walking bodies in headless locomotion
pub const MOVEMENT_BLOCKING_MASK: u32 = COLLISION_LAYER_ENVIRONMENT;
