//! Shared application-wide constants.
//! Centralizes tweakable values used across the editor core, rendering and printing.

// Field geometry
/// Logical width of the landscape field (end zone to end zone).
pub const LANDSCAPE_FIELD_WIDTH: f32 = 1200.0;
/// Logical height of the landscape field (sideline to sideline).
pub const LANDSCAPE_FIELD_HEIGHT: f32 = 533.33;
/// Logical width of the portrait field.
pub const PORTRAIT_FIELD_WIDTH: f32 = 533.33;
/// Logical height of the portrait field.
pub const PORTRAIT_FIELD_HEIGHT: f32 = 800.0;

// Players
/// Radius of a player icon in field units. Player centres are kept this far inside the field.
pub const PLAYER_ICON_RADIUS: f32 = 15.0;

// Routes
/// Distance (field units) between a removed player and a route's first point under which
/// the route is erased together with the player.
pub const ROUTE_ERASE_PROXIMITY: f32 = 30.0;
/// Stroke width of a route in field units.
pub const ROUTE_STROKE_WIDTH: f32 = 3.0;
/// Dash and gap length of dashed routes in field units.
pub const ROUTE_DASH_LENGTH: f32 = 10.0;

// Colour palette tokens
/// Theme accent colour token, the default drawing colour.
pub const COLOR_ACCENT: &str = "hsl(var(--accent))";
/// Red route colour token.
pub const COLOR_RED: &str = "#ef4444";
/// Blue route colour token.
pub const COLOR_BLUE: &str = "#3b82f6";
/// Yellow route colour token.
pub const COLOR_YELLOW: &str = "#facc15";
/// Green route colour token.
pub const COLOR_GREEN: &str = "#22c55e";
/// Black route colour token.
pub const COLOR_BLACK: &str = "#000000";
/// White route colour token.
pub const COLOR_WHITE: &str = "#ffffff";

// Persistence
/// Playbook every user's plays are stored under unless configured otherwise.
pub const DEFAULT_PLAYBOOK_ID: &str = "my-playbook";

// UI
/// Seconds a notification stays on screen.
pub const NOTIFICATION_SECONDS: f64 = 4.0;
/// Width of the tools side panel in screen points.
pub const SIDE_PANEL_WIDTH: f32 = 300.0;
/// Scale applied to field units when exporting a printable diagram.
pub const PRINT_SCALE: f32 = 1.0;
