//! The acting player: identity, vitals, wallet, and position.

use rust_decimal::Decimal;
use storymaker_types::{ActorId, Position, Profile, Wallet};

use crate::config::SessionConfig;

/// State of the session's actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorState {
    /// Actor identity, owner of the seeded instances.
    pub id: ActorId,
    /// Name and seed the session was started with.
    pub profile: Profile,
    /// Current health.
    pub health: u32,
    /// Health ceiling.
    pub max_health: u32,
    /// Current energy.
    pub energy: u32,
    /// Energy ceiling.
    pub max_energy: u32,
    /// Money by currency.
    pub wallet: Wallet,
    /// Current map cell.
    pub position: Position,
}

impl ActorState {
    /// A fresh actor standing at `position`.
    pub fn new(profile: Profile, config: &SessionConfig, position: Position) -> Self {
        Self {
            id: ActorId::new(),
            profile,
            health: config.starting_health,
            max_health: config.starting_health,
            energy: config.starting_energy,
            max_energy: config.starting_energy,
            wallet: config.starting_money.clone(),
            position,
        }
    }

    /// Restore health, capped at the maximum.
    pub fn heal(&mut self, points: u32) {
        self.health = self.health.saturating_add(points).min(self.max_health);
    }

    /// Lose health, floored at zero.
    pub const fn hurt(&mut self, points: u32) {
        self.health = self.health.saturating_sub(points);
    }

    /// Restore energy, capped at the maximum.
    pub fn restore_energy(&mut self, points: u32) {
        self.energy = self.energy.saturating_add(points).min(self.max_energy);
    }

    /// Spend energy, floored at zero.
    pub const fn drain_energy(&mut self, points: u32) {
        self.energy = self.energy.saturating_sub(points);
    }

    /// Whether the actor has no energy left.
    pub const fn is_exhausted(&self) -> bool {
        self.energy == 0
    }

    /// Credit the wallet.
    pub fn earn(&mut self, currency: &str, amount: Decimal) {
        let balance = self.wallet.entry(currency.to_owned()).or_insert(Decimal::ZERO);
        *balance = balance.saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn actor() -> ActorState {
        ActorState::new(
            Profile {
                name: "Ada".to_owned(),
                seed: 1,
            },
            &SessionConfig::default(),
            Position { x: 2, y: 2 },
        )
    }

    #[test]
    fn vitals_stay_within_bounds() {
        let mut actor = actor();
        actor.heal(50);
        assert_eq!(actor.health, 100);
        actor.hurt(130);
        assert_eq!(actor.health, 0);
        actor.drain_energy(250);
        assert!(actor.is_exhausted());
        actor.restore_energy(30);
        assert_eq!(actor.energy, 30);
    }

    #[test]
    fn earning_opens_new_currencies() {
        let mut actor = actor();
        actor.earn("coin", dec!(4.5));
        actor.earn("gem", dec!(1));
        assert_eq!(actor.wallet.get("coin"), Some(&dec!(14.5)));
        assert_eq!(actor.wallet.get("gem"), Some(&dec!(1)));
    }
}
