//! Core generation constants
//!
//! Defaults for the configuration tables live in `config`; these are the
//! fixed values the algorithms themselves rely on.

/// Default side length of the square level grid
pub const DEFAULT_GRID_SIZE: i32 = 40;

/// Largest accepted grid side; also bounds every other size setting
pub const MAX_GRID_SIZE: i32 = 4096;

/// Side length of every required special room
pub const SPECIAL_ROOM_SIZE: i32 = 4;

/// Distance of the predefined special-room anchors from the grid border
pub const ANCHOR_MARGIN: i32 = 2;

/// Random placement trials after all anchors fail
pub const SPECIAL_ROOM_RANDOM_TRIALS: u32 = 10;

/// Cells left free on each side of a room inside its leaf
pub const ROOM_PADDING: i32 = 1;

/// Leaf rooms grow by `0..ROOM_SIZE_JITTER` cells past the minimum size
pub const ROOM_SIZE_JITTER: i32 = 2;

/// Agent idle dwell is drawn from `[IDLE_MIN, IDLE_MIN + IDLE_SPAN)`
pub const IDLE_MIN: f32 = 3.0;
pub const IDLE_SPAN: f32 = 5.0;

/// Rotation (degrees) applied to tunnels opening south or east
pub const TUNNEL_FLIP: u16 = 180;
