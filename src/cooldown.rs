//! The in-memory cooldown registry, including the two-strike spam policy
//! for the grind commands: the first attempt during a cooldown earns a
//! warning, every further attempt while still cooling earns a fine. The
//! warning clears only when an action actually goes through.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::constants::{
    DEFAULT_CD_CHAT, DEFAULT_CD_CULTIVATE, DEFAULT_CD_EXPLORE, DEFAULT_CD_FISH, DEFAULT_CD_MINE,
    DEFAULT_CD_PVP, DEFAULT_CD_ROB, HUNT_LOSS_CD_SECS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Mine,
    Fish,
    Rob,
    Cultivate,
    Explore,
    Hunt,
    Pvp,
    Chat,
}

impl ActionKind {
    /// Config table key holding the cooldown override, in seconds.
    pub fn config_key(&self) -> &'static str {
        match self {
            ActionKind::Mine => "cd_mine",
            ActionKind::Fish => "cd_fish",
            ActionKind::Rob => "cd_rob",
            ActionKind::Cultivate => "cd_cultivate",
            ActionKind::Explore => "cd_explore",
            ActionKind::Hunt => "cd_hunt",
            ActionKind::Pvp => "cd_pvp",
            ActionKind::Chat => "cd_chat",
        }
    }

    pub fn default_secs(&self) -> u64 {
        match self {
            ActionKind::Mine => DEFAULT_CD_MINE,
            ActionKind::Fish => DEFAULT_CD_FISH,
            ActionKind::Rob => DEFAULT_CD_ROB,
            ActionKind::Cultivate => DEFAULT_CD_CULTIVATE,
            ActionKind::Explore => DEFAULT_CD_EXPLORE,
            ActionKind::Hunt => HUNT_LOSS_CD_SECS,
            ActionKind::Pvp => DEFAULT_CD_PVP,
            ActionKind::Chat => DEFAULT_CD_CHAT,
        }
    }
}

impl FromStr for ActionKind {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mine" | "dao" => Ok(ActionKind::Mine),
            "fish" | "cau" => Ok(ActionKind::Fish),
            "rob" | "cuop" => Ok(ActionKind::Rob),
            "cultivate" | "tu" => Ok(ActionKind::Cultivate),
            "explore" | "khampha" => Ok(ActionKind::Explore),
            "hunt" | "san" => Ok(ActionKind::Hunt),
            "pvp" | "tythi" => Ok(ActionKind::Pvp),
            "chat" => Ok(ActionKind::Chat),
            _ => Err(()),
        }
    }
}

/// Outcome of a cooldown check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Not cooling; the cooldown has been armed and the action may run.
    Clear,
    /// Still cooling; simple rejection (non-spam-policed actions).
    Wait { remaining_secs: u64 },
    /// Still cooling, first offense: warned, no fine yet.
    Warned { remaining_secs: u64 },
    /// Still cooling, repeat offense: the spam fine applies.
    Struck { remaining_secs: u64 },
}

#[derive(Default)]
pub struct CooldownRegistry {
    until: HashMap<(u64, ActionKind), Instant>,
    warned: HashSet<(u64, ActionKind)>,
}

impl CooldownRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn remaining_of(&self, key: (u64, ActionKind)) -> Option<Duration> {
        self.until
            .get(&key)
            .and_then(|t| t.checked_duration_since(Instant::now()))
            .filter(|d| !d.is_zero())
    }

    /// Seconds left on a cooldown, if any. Read-only.
    pub fn remaining_secs(&self, user_id: u64, action: ActionKind) -> Option<u64> {
        self.remaining_of((user_id, action))
            .map(|d| d.as_secs().max(1))
    }

    /// Plain acquire: arms the cooldown and clears on success, rejects with
    /// the remaining time otherwise.
    pub fn try_acquire(&mut self, user_id: u64, action: ActionKind, duration: Duration) -> Gate {
        let key = (user_id, action);
        if let Some(remaining) = self.remaining_of(key) {
            return Gate::Wait {
                remaining_secs: remaining.as_secs().max(1),
            };
        }
        self.arm(key, duration);
        Gate::Clear
    }

    /// Acquire under the two-strike spam policy: a blocked attempt first
    /// warns, then fines on every repeat until the action goes through.
    pub fn try_acquire_two_strike(
        &mut self,
        user_id: u64,
        action: ActionKind,
        duration: Duration,
    ) -> Gate {
        let key = (user_id, action);
        if let Some(remaining) = self.remaining_of(key) {
            let remaining_secs = remaining.as_secs().max(1);
            return if self.warned.insert(key) {
                Gate::Warned { remaining_secs }
            } else {
                Gate::Struck { remaining_secs }
            };
        }
        self.arm(key, duration);
        Gate::Clear
    }

    /// Arms a cooldown directly, without a check. Used where the duration
    /// depends on the outcome (hunt arms a short or long rest after the
    /// fight resolves).
    pub fn arm_cooldown(&mut self, user_id: u64, action: ActionKind, duration: Duration) {
        self.arm((user_id, action), duration);
    }

    /// Drops a player's cooldown for one action. Admin surface.
    pub fn clear(&mut self, user_id: u64, action: ActionKind) {
        self.until.remove(&(user_id, action));
        self.warned.remove(&(user_id, action));
    }

    fn arm(&mut self, key: (u64, ActionKind), duration: Duration) {
        self.until.insert(key, Instant::now() + duration);
        self.warned.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: u64 = 42;

    #[test]
    fn acquire_then_wait() {
        let mut reg = CooldownRegistry::new();
        let long = Duration::from_secs(600);
        assert_eq!(reg.try_acquire(USER, ActionKind::Rob, long), Gate::Clear);
        assert!(matches!(
            reg.try_acquire(USER, ActionKind::Rob, long),
            Gate::Wait { remaining_secs } if remaining_secs <= 600
        ));
    }

    #[test]
    fn two_strike_warns_once_then_fines_repeatedly() {
        let mut reg = CooldownRegistry::new();
        let cd = Duration::from_secs(60);
        assert_eq!(reg.try_acquire_two_strike(USER, ActionKind::Mine, cd), Gate::Clear);
        assert!(matches!(
            reg.try_acquire_two_strike(USER, ActionKind::Mine, cd),
            Gate::Warned { .. }
        ));
        assert!(matches!(
            reg.try_acquire_two_strike(USER, ActionKind::Mine, cd),
            Gate::Struck { .. }
        ));
        assert!(matches!(
            reg.try_acquire_two_strike(USER, ActionKind::Mine, cd),
            Gate::Struck { .. }
        ));
    }

    #[test]
    fn warning_clears_once_the_action_goes_through() {
        let mut reg = CooldownRegistry::new();
        assert_eq!(
            reg.try_acquire_two_strike(USER, ActionKind::Fish, Duration::ZERO),
            Gate::Clear
        );
        // Expired immediately; the next acquire succeeds and resets the slate.
        assert_eq!(
            reg.try_acquire_two_strike(USER, ActionKind::Fish, Duration::from_secs(60)),
            Gate::Clear
        );
        assert!(matches!(
            reg.try_acquire_two_strike(USER, ActionKind::Fish, Duration::from_secs(60)),
            Gate::Warned { .. }
        ));
    }

    #[test]
    fn actions_and_users_are_independent() {
        let mut reg = CooldownRegistry::new();
        let cd = Duration::from_secs(60);
        assert_eq!(reg.try_acquire(USER, ActionKind::Mine, cd), Gate::Clear);
        assert_eq!(reg.try_acquire(USER, ActionKind::Fish, cd), Gate::Clear);
        assert_eq!(reg.try_acquire(7, ActionKind::Mine, cd), Gate::Clear);
    }

    #[test]
    fn admin_clear_unblocks() {
        let mut reg = CooldownRegistry::new();
        let cd = Duration::from_secs(600);
        assert_eq!(reg.try_acquire(USER, ActionKind::Pvp, cd), Gate::Clear);
        reg.clear(USER, ActionKind::Pvp);
        assert_eq!(reg.remaining_secs(USER, ActionKind::Pvp), None);
        assert_eq!(reg.try_acquire(USER, ActionKind::Pvp, cd), Gate::Clear);
    }
}
