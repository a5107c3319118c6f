use crate::api::config::DamageConfig;
use crate::core::time::Cooldown;

/// Result of a single damage attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Landed inside the hurt window; nothing happened.
    Ignored,
    /// Immunity absorbed it; the hurt window restarted.
    Blocked,
    /// Health went down but is still above zero.
    Hurt { remaining: i32 },
    /// Health reached zero.
    Killed,
}

/// Hit points with a short hurt window and a longer immunity window.
#[derive(Debug, Clone)]
pub struct Health {
    current: i32,
    max: i32,
    hurt: Cooldown,
    immunity: Cooldown,
    hurt_window: f32,
    immunity_window: f32,
}

impl Health {
    pub fn new(max: i32, damage: &DamageConfig) -> Self {
        let max = max.max(1);
        Self {
            current: max,
            max,
            hurt: Cooldown::new(),
            immunity: Cooldown::new(),
            hurt_window: damage.hurt_window,
            immunity_window: damage.immunity_window,
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    /// Inside either window.
    pub fn is_invulnerable(&self) -> bool {
        self.hurt.is_running() || self.immunity.is_running()
    }

    pub fn is_hurt(&self) -> bool {
        self.hurt.is_running()
    }

    pub fn tick(&mut self, dt: f32) {
        self.hurt.tick(dt);
        self.immunity.tick(dt);
    }

    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.is_dead() || self.hurt.is_running() {
            return DamageOutcome::Ignored;
        }
        self.hurt.start(self.hurt_window);
        if self.immunity.is_running() {
            return DamageOutcome::Blocked;
        }

        self.current = (self.current - amount.max(0)).max(0);
        self.immunity.start(self.immunity_window);
        if self.current == 0 {
            DamageOutcome::Killed
        } else {
            DamageOutcome::Hurt { remaining: self.current }
        }
    }

    pub fn heal(&mut self, amount: i32) {
        if !self.is_dead() {
            self.current = (self.current + amount.max(0)).min(self.max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn health(max: i32) -> Health {
        Health::new(max, &DamageConfig::default())
    }

    #[test]
    fn three_spaced_hits_kill() {
        let mut hp = health(3);
        assert_eq!(hp.take_damage(1), DamageOutcome::Hurt { remaining: 2 });
        hp.tick(0.6);
        assert_eq!(hp.take_damage(1), DamageOutcome::Hurt { remaining: 1 });
        hp.tick(0.6);
        assert_eq!(hp.take_damage(1), DamageOutcome::Killed);
        assert!(hp.is_dead());
        assert_eq!(hp.take_damage(1), DamageOutcome::Ignored);
    }

    #[test]
    fn hits_inside_hurt_window_are_ignored() {
        let mut hp = health(3);
        hp.take_damage(1);
        hp.tick(0.05);
        assert_eq!(hp.take_damage(1), DamageOutcome::Ignored);
        assert_eq!(hp.current(), 2);
    }

    #[test]
    fn hits_during_immunity_are_blocked_and_restart_hurt() {
        let mut hp = health(3);
        hp.take_damage(1);
        hp.tick(0.2);
        assert_eq!(hp.take_damage(1), DamageOutcome::Blocked);
        assert!(hp.is_hurt());
        hp.tick(0.05);
        assert_eq!(hp.take_damage(1), DamageOutcome::Ignored);
        assert_eq!(hp.current(), 2);
    }

    #[test]
    fn heal_is_capped() {
        let mut hp = health(5);
        hp.take_damage(3);
        hp.heal(10);
        assert_eq!(hp.current(), 5);
    }
}
