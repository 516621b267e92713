//! Host-supplied vehicle state

/// Raw vehicle state for one tick, filled by the host and read-only here.
///
/// Command fields carry what the controlling logic requested this tick, not
/// the actuated values; `gear_cmd` in particular is the requested gear.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VehicleState {
    /// Longitudinal speed in distance units per second.
    pub speed: f64,
    /// Longitudinal acceleration.
    pub accel_x: f64,
    /// Lateral acceleration.
    pub accel_y: f64,
    /// Steering command, −1 (full right) to +1 (full left).
    pub steer_cmd: f64,
    /// Throttle command, 0 to 1.
    pub throttle_cmd: f64,
    /// Brake command, 0 to 1.
    pub brake_cmd: f64,
    /// Requested gear, −1 for reverse, 0 for neutral.
    pub gear_cmd: i32,
    /// Engine speed in rad/s.
    pub engine_rpm: f64,
    /// Distance from the start/finish line along the centerline.
    pub dist_from_start: f64,
    /// World heading in radians.
    pub yaw: f64,
    /// World position.
    pub pos_x: f64,
    pub pos_y: f64,
    /// Completed lap count; 0 until the start line is first crossed.
    pub laps_done: u32,
    /// Laps left in the race configuration; 0 signals completion.
    pub remaining_laps: u32,
    /// Elapsed time in the current lap, in seconds.
    pub lap_time: f64,
}
