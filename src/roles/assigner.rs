use rand::Rng;

use super::Role;

/// Probability that an under-cap participant draws `ContentCreator`.
const CREATOR_PROBABILITY: f64 = 0.2;

/// The single random draw behind automatic assignment, kept behind a trait so
/// tests can force either outcome.
pub trait CreatorDraw: Send + Sync {
    fn draw_creator(&mut self) -> bool;
}

/// Production draw: 20% content creator, 80% spectator.
pub struct WeightedDraw;

impl CreatorDraw for WeightedDraw {
    fn draw_creator(&mut self) -> bool {
        rand::thread_rng().gen_bool(CREATOR_PROBABILITY)
    }
}

/// Decides the role for a first-time participant. The caller supplies the
/// current creator count so the count-then-upsert sequence stays in one place.
pub struct RoleAssigner {
    draw: Box<dyn CreatorDraw>,
}

impl RoleAssigner {
    pub fn new(draw: Box<dyn CreatorDraw>) -> Self {
        Self { draw }
    }

    /// Cap enforcement takes priority over randomness: at or over the cap the
    /// answer is `Spectator` without drawing.
    pub fn assign(&mut self, current_creator_count: usize, max_creators: usize) -> Role {
        if current_creator_count >= max_creators {
            return Role::Spectator;
        }
        if self.draw.draw_creator() {
            Role::ContentCreator
        } else {
            Role::Spectator
        }
    }
}

impl Default for RoleAssigner {
    fn default() -> Self {
        Self::new(Box::new(WeightedDraw))
    }
}

/// Test draw with a predetermined outcome.
#[cfg(test)]
pub struct FixedDraw(pub bool);

#[cfg(test)]
impl CreatorDraw for FixedDraw {
    fn draw_creator(&mut self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn under_cap_follows_the_draw() {
        let mut lucky = RoleAssigner::new(Box::new(FixedDraw(true)));
        assert_eq!(lucky.assign(0, 8), Role::ContentCreator);

        let mut unlucky = RoleAssigner::new(Box::new(FixedDraw(false)));
        assert_eq!(unlucky.assign(7, 8), Role::Spectator);
    }

    #[test]
    fn at_cap_is_spectator_even_on_a_winning_draw() {
        let mut assigner = RoleAssigner::new(Box::new(FixedDraw(true)));
        assert_eq!(assigner.assign(8, 8), Role::Spectator);
        assert_eq!(assigner.assign(9, 8), Role::Spectator);
    }

    #[test]
    fn production_draw_respects_the_cap() {
        let mut assigner = RoleAssigner::default();
        for _ in 0..100 {
            assert_eq!(assigner.assign(8, 8), Role::Spectator);
        }
    }
}
