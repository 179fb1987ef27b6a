//! Attack cooldown: absolute "next attack allowed at" on the motion clock.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct AttackCooldown {
    /// Motion-clock seconds
    pub next_attack_allowed_at: f64,
}

impl AttackCooldown {
    pub fn ready(&self, now: f64) -> bool {
        now >= self.next_attack_allowed_at
    }

    /// `attack_rate` is attacks per second, so the cooldown is `1 / attack_rate`.
    pub fn start(&mut self, now: f64, attack_rate: f32) {
        self.next_attack_allowed_at = if attack_rate > 0.0 {
            now + 1.0 / f64::from(attack_rate)
        } else {
            f64::INFINITY
        };
    }

    pub fn reset(&mut self) {
        self.next_attack_allowed_at = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_cooldown_is_ready() {
        assert!(AttackCooldown::default().ready(0.0));
    }

    #[test]
    fn test_cooldown_is_inverse_rate() {
        let mut cooldown = AttackCooldown::default();
        cooldown.start(2.0, 2.0);
        assert!(!cooldown.ready(2.4));
        assert!(cooldown.ready(2.5));
    }

    #[test]
    fn test_cooldown_late_in_session() {
        let mut cooldown = AttackCooldown::default();
        cooldown.start(100_000.0, 2.0);
        assert!(!cooldown.ready(100_000.49));
        assert!(cooldown.ready(100_000.5));
    }

    #[test]
    fn test_zero_rate_never_ready_again() {
        let mut cooldown = AttackCooldown::default();
        cooldown.start(0.0, 0.0);
        assert!(!cooldown.ready(1.0e6));
        cooldown.reset();
        assert!(cooldown.ready(0.0));
    }
}
