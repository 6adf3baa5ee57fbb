//! The anti-automation gate. Before a gated action runs, a small random
//! chance presents a three-button icon challenge; picking wrong or letting
//! the window lapse jails the player for half an hour. The pure challenge
//! logic lives here, the Discord round-trip in `commands::run_captcha`.

use crate::constants::{CAPTCHA_CHANCE, CAPTCHA_JAIL_MINUTES};
use chrono::Utc;
use rand::seq::{IndexedRandom, SliceRandom};

pub struct CaptchaIcon {
    pub name: &'static str,
    pub emoji: &'static str,
}

pub static ICONS: &[CaptchaIcon] = &[
    CaptchaIcon { name: "Quả Táo", emoji: "🍎" },
    CaptchaIcon { name: "Quả Chuối", emoji: "🍌" },
    CaptchaIcon { name: "Nho", emoji: "🍇" },
    CaptchaIcon { name: "Dưa Hấu", emoji: "🍉" },
    CaptchaIcon { name: "Cà Rốt", emoji: "🥕" },
    CaptchaIcon { name: "Bánh Mỳ", emoji: "🍞" },
    CaptchaIcon { name: "Kẹo", emoji: "🍬" },
    CaptchaIcon { name: "Cái Rìu", emoji: "🪓" },
    CaptchaIcon { name: "Cần Câu", emoji: "🎣" },
    CaptchaIcon { name: "Kiếm", emoji: "🗡️" },
];

/// Whether this invocation draws a challenge at all.
pub fn should_challenge(roll: f64) -> bool {
    roll < CAPTCHA_CHANCE
}

/// Unix second at which a jail term starting now expires.
pub fn jail_until_from_now() -> i64 {
    Utc::now().timestamp() + CAPTCHA_JAIL_MINUTES * 60
}

/// One generated challenge: a target icon and three shuffled options.
pub struct Challenge {
    /// Index into [`ICONS`] of the icon the player must pick.
    pub target: usize,
    /// Indices into [`ICONS`]: the target and two distractors, shuffled.
    pub options: [usize; 3],
}

impl Challenge {
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let indices: Vec<usize> = (0..ICONS.len()).collect();
        let target = *indices.choose(&mut rng).unwrap_or(&0);
        let distractors: Vec<usize> = indices.into_iter().filter(|&i| i != target).collect();
        let picked: Vec<usize> = distractors.choose_multiple(&mut rng, 2).copied().collect();
        let mut options = [target, picked[0], picked[1]];
        options.shuffle(&mut rng);
        Challenge { target, options }
    }

    pub fn target_icon(&self) -> &'static CaptchaIcon {
        &ICONS[self.target]
    }

    /// Whether the option the player clicked is the target.
    pub fn verify(&self, picked_option: usize) -> bool {
        self.options
            .get(picked_option)
            .is_some_and(|&icon| icon == self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_rate_edges() {
        assert!(should_challenge(0.0));
        assert!(should_challenge(0.049));
        assert!(!should_challenge(0.05));
        assert!(!should_challenge(0.99));
    }

    #[test]
    fn generated_challenge_contains_the_target_once() {
        for _ in 0..100 {
            let challenge = Challenge::generate();
            let hits = challenge
                .options
                .iter()
                .filter(|&&o| o == challenge.target)
                .count();
            assert_eq!(hits, 1);
            // All three options are distinct icons.
            let mut opts = challenge.options;
            opts.sort_unstable();
            assert!(opts[0] != opts[1] && opts[1] != opts[2]);
        }
    }

    #[test]
    fn verify_accepts_only_the_target_slot() {
        let challenge = Challenge::generate();
        for (slot, &icon) in challenge.options.iter().enumerate() {
            assert_eq!(challenge.verify(slot), icon == challenge.target);
        }
        assert!(!challenge.verify(3));
    }
}
