//! Core constants for the plotter: tile geometry, annotation styling and the
//! literal status strings shown in the status bar.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Radius of a dot marker in pixels.
pub const DOT_RADIUS: u32 = 5;

/// Stroke width of a route polyline in pixels.
pub const ROUTE_WIDTH: u32 = 2;

/// Pixels the map moves per tick for each held pan key.
pub const PAN_STEP: i32 = 1;

/// Decimal places used for every coordinate written to the protocol channel
/// or shown in the status bar.
pub const COORD_PRECISION: usize = 6;

/// Single-token line that terminates a route response.
pub const END_OF_ROUTE: &str = "E";

/// Line sent on the request channel when the plotter shuts down.
pub const QUIT_LINE: &str = "Q";

/// Status shown while a tile bitmap for a new zoom is being loaded.
pub const STATUS_LOADING: &str = "Loading ...";

/// Status shown while waiting for the route service.
pub const STATUS_CALCULATING: &str = "Calculating Route ...";
