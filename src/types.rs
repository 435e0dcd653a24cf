/// Keys are unsigned 32-bit integers, unique among live nodes.
pub type Key = u32;

/// Hard cap on the number of levels. The header always carries this many
/// forward links when built with default options.
pub const MAX_LEVEL: usize = 32;

/// Probability that a node reaching level `k` is promoted to `k + 1`.
///
/// 1/4 rather than 1/2: fewer levels, fewer forward links per node,
/// at the price of slightly longer scans per level.
pub const P: f64 = 0.25;
