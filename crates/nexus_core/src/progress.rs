//! Per-member progression document.

use crate::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Experience needed per level.
pub const XP_PER_LEVEL: u64 = 100;

/// The whole progression document, keyed by member id.
pub type UserProgressBook = BTreeMap<UserId, UserProgress>;

/// Progression of one member, shared across guilds.
///
/// `level` always equals `xp / XP_PER_LEVEL` once [`UserProgress::add_xp`]
/// has run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProgress {
    /// Accumulated experience.
    pub xp: u64,
    /// Currency balance.
    pub coins: u64,
    /// Epoch milliseconds of the last daily reward.
    pub last_daily: i64,
    /// Level derived from `xp`.
    pub level: u64,
}

impl UserProgress {
    /// Level reached with `xp` experience.
    pub fn level_for(xp: u64) -> u64 {
        xp / XP_PER_LEVEL
    }

    /// Add experience and recompute the level.
    ///
    /// Returns the new level when it rose.
    ///
    /// ```
    /// use nexus_core::UserProgress;
    ///
    /// let mut progress = UserProgress { xp: 95, ..Default::default() };
    /// assert_eq!(progress.add_xp(10), Some(1));
    /// assert_eq!(progress.xp, 105);
    /// assert_eq!(progress.add_xp(10), None);
    /// ```
    pub fn add_xp(&mut self, amount: u64) -> Option<u64> {
        let previous = self.level;
        self.xp = self.xp.saturating_add(amount);
        self.level = Self::level_for(self.xp);
        (self.level > previous).then_some(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_xp_repairs_stale_level() {
        let mut progress = UserProgress {
            xp: 250,
            level: 0,
            ..Default::default()
        };
        assert_eq!(progress.add_xp(5), Some(2));
        assert_eq!(progress.level, 2);
    }

    #[test]
    fn test_legacy_document_shape() {
        let book: UserProgressBook =
            serde_json::from_str(r#"{"12":{"xp":40,"coins":0,"lastDaily":0,"level":0}}"#).unwrap();
        assert_eq!(book[&UserId(12)].xp, 40);
    }
}
