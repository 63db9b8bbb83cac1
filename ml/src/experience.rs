//! Experience table

/// Highest level reachable with real experience requirements
pub const MAX_REAL_LEVEL: u32 = 99;

/// Highest virtual level
pub const MAX_VIRTUAL_LEVEL: u32 = 126;

/// Experience cap per skill
pub const MAX_SKILL_XP: u32 = 200_000_000;

fn level_points(level: u32) -> f64 {
    (level as f64 + 300.0 * 2f64.powf(level as f64 / 7.0)).floor()
}

/// Experience needed to reach `level`
pub fn xp_for_level(level: u32) -> u32 {
    let level = level.min(MAX_VIRTUAL_LEVEL);
    let points: f64 = (1..level).map(level_points).sum();
    (points / 4.0).floor() as u32
}

/// Level (including virtual levels) for an amount of experience
pub fn level_for_xp(xp: u32) -> u32 {
    let mut points = 0.0;
    for level in 1..MAX_VIRTUAL_LEVEL {
        points += level_points(level);
        if (points / 4.0).floor() as u32 > xp {
            return level;
        }
    }
    MAX_VIRTUAL_LEVEL
}

pub fn is_valid_real_level(level: u32) -> bool {
    (1..=MAX_REAL_LEVEL).contains(&level)
}

/// Level 1 starts at zero experience, so zero is valid
pub fn is_valid_experience(xp: u32) -> bool {
    xp <= MAX_SKILL_XP
}
