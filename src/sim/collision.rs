//! Projectile/enemy collision resolution
//!
//! Each live enemy consumes at most one overlapping projectile per frame, and
//! each projectile is consumed at most once. Enemies are visited in arena
//! order, so when one projectile overlaps several enemies the first one wins.

use glam::DVec2;

use super::entity::{Enemy, EnemyTier, Entity, Projectile};

/// An enemy destroyed this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destroyed {
    pub id: u32,
    pub reward: u64,
    pub tier: EnemyTier,
    /// Center of the enemy when it died
    pub at: DVec2,
}

/// Result of a collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    /// Contact points, one per consumed projectile
    pub impacts: Vec<DVec2>,
    pub destroyed: Vec<Destroyed>,
}

/// Resolve hits between live enemies and live projectiles.
///
/// Consumed projectiles and destroyed enemies are tombstoned, not removed;
/// the owner purges them.
pub fn resolve(enemies: &mut [Enemy], projectiles: &mut [Projectile]) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();

    for enemy in enemies.iter_mut().filter(|e| e.is_alive()) {
        let enemy_rect = enemy.rect();

        let hit = projectiles
            .iter_mut()
            .filter(|p| p.is_alive())
            .find_map(|p| {
                let overlap = enemy_rect.intersection(&p.rect())?;
                Some((p, overlap))
            });

        let Some((projectile, overlap)) = hit else {
            continue;
        };

        projectile.body.kill();
        let contact = overlap.center();
        outcome.impacts.push(contact);

        if enemy.take_hit(projectile.damage) {
            log::trace!("enemy #{} destroyed by #{}", enemy.body.id, projectile.body.id);
            outcome.destroyed.push(Destroyed {
                id: enemy.body.id,
                reward: enemy.reward,
                tier: enemy.tier,
                at: enemy_rect.center(),
            });
        } else {
            log::trace!("enemy #{} hit, {} hp left", enemy.body.id, enemy.hp);
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Body;
    use crate::sim::fixtures;

    fn enemy(id: u32, x: f64, y: f64, hp: u32) -> Enemy {
        Enemy {
            body: Body::new(id, DVec2::new(x, y), DVec2::new(0.0, 100.0), fixtures::sprite(50.0, 50.0)),
            hp,
            reward: 100 * hp as u64,
            tier: EnemyTier::Standard,
            palette: "black".into(),
        }
    }

    /// A laser whose box is (x-5, y-20)..(x+5, y+20)
    fn laser(id: u32, x: f64, y: f64) -> Projectile {
        Projectile::new(id, DVec2::new(x, y + 20.0), DVec2::new(0.0, -400.0), fixtures::sprite(10.0, 40.0))
    }

    #[test]
    fn test_single_hit_destroys_and_consumes() {
        let mut enemies = vec![enemy(1, 100.0, 100.0, 1)];
        let mut lasers = vec![laser(2, 125.0, 140.0)];

        let outcome = resolve(&mut enemies, &mut lasers);

        assert_eq!(outcome.destroyed.len(), 1);
        assert_eq!(outcome.destroyed[0].id, 1);
        assert_eq!(outcome.destroyed[0].reward, 100);
        assert_eq!(outcome.impacts.len(), 1);
        assert!(!lasers[0].is_alive());
        assert!(!enemies[0].is_alive());
    }

    #[test]
    fn test_two_lasers_one_enemy_consumes_one() {
        let mut enemies = vec![enemy(1, 100.0, 100.0, 1)];
        let mut lasers = vec![laser(2, 110.0, 130.0), laser(3, 140.0, 130.0)];

        let outcome = resolve(&mut enemies, &mut lasers);

        assert_eq!(outcome.destroyed.len(), 1);
        assert_eq!(outcome.impacts.len(), 1);
        assert_eq!(lasers.iter().filter(|l| l.is_alive()).count(), 1);
    }

    #[test]
    fn test_one_laser_two_enemies_first_wins() {
        let mut enemies = vec![enemy(1, 100.0, 100.0, 1), enemy(2, 120.0, 100.0, 1)];
        let mut lasers = vec![laser(3, 140.0, 130.0)];

        let outcome = resolve(&mut enemies, &mut lasers);

        assert_eq!(outcome.destroyed.len(), 1);
        assert_eq!(outcome.destroyed[0].id, 1);
        assert!(enemies[1].is_alive());
    }

    #[test]
    fn test_two_hp_enemy_needs_two_hits() {
        let mut enemies = vec![enemy(1, 100.0, 100.0, 2)];

        let mut first = vec![laser(2, 125.0, 130.0)];
        let outcome = resolve(&mut enemies, &mut first);
        assert!(outcome.destroyed.is_empty());
        assert_eq!(outcome.impacts.len(), 1);
        assert_eq!(enemies[0].hp, 1);
        assert!(enemies[0].is_alive());

        let mut second = vec![laser(3, 125.0, 130.0)];
        let outcome = resolve(&mut enemies, &mut second);
        assert_eq!(outcome.destroyed.len(), 1);
        assert_eq!(outcome.destroyed[0].reward, 200);
        assert_eq!(enemies[0].hp, 0);
    }

    #[test]
    fn test_dead_entities_are_ignored() {
        let mut enemies = vec![enemy(1, 100.0, 100.0, 1)];
        let mut lasers = vec![laser(2, 125.0, 130.0)];
        lasers[0].body.kill();

        let outcome = resolve(&mut enemies, &mut lasers);
        assert_eq!(outcome, CollisionOutcome::default());

        let mut lasers = vec![laser(3, 125.0, 130.0)];
        enemies[0].body.kill();
        let outcome = resolve(&mut enemies, &mut lasers);
        assert!(outcome.impacts.is_empty());
        assert!(lasers[0].is_alive());
    }

    #[test]
    fn test_impact_at_overlap_center() {
        let mut enemies = vec![enemy(1, 100.0, 100.0, 1)];
        // Laser box (120..130, 130..170) against enemy (100..150, 100..150)
        let mut lasers = vec![laser(2, 125.0, 150.0)];
        let outcome = resolve(&mut enemies, &mut lasers);
        assert_eq!(outcome.impacts, vec![DVec2::new(125.0, 140.0)]);
    }
}
