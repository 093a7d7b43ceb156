//! The play area: sole owner of every entity collection

use std::f64::consts::TAU;

use rand::Rng;

use super::collision::{self, Destroyed};
use super::entity::{Effect, Enemy, Entity, Projectile};
use super::player::{Ability, BoundsOutcome, Player};
use super::rect::Rect;
use crate::assets::{SpriteRef, Sprites};
use crate::render::Frame;

#[derive(Debug, Clone)]
pub struct Arena {
    screen: Rect,
    /// Enemies live from well above the screen down to its bottom edge
    enemy_bounds: Rect,
    pub player: Player,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    effects: Vec<Effect>,
    next_id: u32,
}

impl Arena {
    pub fn new(screen: Rect, player: Player) -> Self {
        let next_id = player.body.id + 1;
        Self {
            screen,
            enemy_bounds: screen.extend_top(screen.size.y),
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            effects: Vec::new(),
            next_id,
        }
    }

    /// Fresh arena for the next level: same player and id sequence, no other entities
    pub fn successor(&self) -> Arena {
        let mut next = Arena::new(self.screen, self.player.clone());
        next.next_id = self.next_id;
        next
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn screen(&self) -> &Rect {
        &self.screen
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    pub fn add_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    pub fn add_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Trigger a player ability; true when its cooldown allowed it
    pub fn fire(&mut self, ability: Ability, sprites: &Sprites) -> bool {
        let Arena {
            player,
            projectiles,
            next_id,
            ..
        } = self;
        let alloc = || {
            let id = *next_id;
            *next_id += 1;
            id
        };

        let shots = match ability {
            Ability::Primary => player.fire_primary(sprites, alloc),
            Ability::Special => player.fire_special(sprites, alloc),
            Ability::Burst => return player.burst(),
        };

        let fired = !shots.is_empty();
        projectiles.extend(shots);
        fired
    }

    /// Advance every live entity by `dt`, then drop the dead
    pub fn update(&mut self, dt: f64) -> BoundsOutcome {
        let outcome = self.player.update(dt, &self.screen);

        for projectile in self.projectiles.iter_mut().filter(|p| p.is_alive()) {
            projectile.update(dt, &self.screen);
        }
        for enemy in self.enemies.iter_mut().filter(|e| e.is_alive()) {
            enemy.update(dt, &self.enemy_bounds);
        }
        for effect in self.effects.iter_mut().filter(|e| e.is_alive()) {
            effect.update(dt);
        }

        self.purge();
        outcome
    }

    /// Run the collision pass, leaving a randomly rotated spark at every impact
    pub fn resolve_collisions<R: Rng>(
        &mut self,
        spark: SpriteRef,
        spark_ttl: f64,
        rng: &mut R,
    ) -> Vec<Destroyed> {
        let outcome = collision::resolve(&mut self.enemies, &mut self.projectiles);

        for at in outcome.impacts {
            let rotation = rng.random_range(0.0..TAU);
            let id = self.next_entity_id();
            self.add_effect(Effect::new(id, at, rotation, spark, spark_ttl));
        }

        self.purge();
        outcome.destroyed
    }

    /// Remove tombstoned entities
    pub fn purge(&mut self) {
        self.enemies.retain(|e| e.is_alive());
        self.projectiles.retain(|p| p.is_alive());
        self.effects.retain(|e| e.is_alive());
    }

    /// Entities back to front: enemies, projectiles, player, effects
    pub fn draw(&self, frame: &mut Frame) {
        for enemy in self.enemies.iter().filter(|e| e.is_alive()) {
            frame.entity(enemy);
        }
        for projectile in self.projectiles.iter().filter(|p| p.is_alive()) {
            frame.entity(projectile);
        }
        frame.entity(&self.player);
        for effect in self.effects.iter().filter(|e| e.is_alive()) {
            frame.entity(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DrawCommand;
    use crate::sim::entity::{Body, EnemyTier};
    use crate::sim::fixtures;
    use glam::DVec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn enemy_at(arena: &mut Arena, x: f64, y: f64) -> u32 {
        let id = arena.next_entity_id();
        arena.add_enemy(Enemy {
            body: Body::new(id, DVec2::new(x, y), DVec2::new(0.0, 100.0), fixtures::sprite(50.0, 50.0)),
            hp: 1,
            reward: 100,
            tier: EnemyTier::Standard,
            palette: "black".into(),
        });
        id
    }

    #[test]
    fn test_fire_adds_projectiles() {
        let sprites = fixtures::assets().sprites;
        let mut arena = fixtures::arena();
        assert!(arena.fire(Ability::Primary, &sprites));
        assert_eq!(arena.projectiles().len(), 1);
        assert!(!arena.fire(Ability::Primary, &sprites));
        assert!(arena.fire(Ability::Special, &sprites));
        assert_eq!(arena.projectiles().len(), 3);
        let ids: Vec<u32> = arena.projectiles().iter().map(|p| p.body.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_enemies_live_above_screen_and_cull_below() {
        let mut arena = fixtures::arena();
        enemy_at(&mut arena, 100.0, -100.0);
        enemy_at(&mut arena, 300.0, 990.0);
        arena.update(0.2);
        // The first is still descending into view; the second left the bottom
        assert_eq!(arena.enemies().len(), 1);
        assert_eq!(arena.enemies()[0].body.pos.y, -80.0);
    }

    #[test]
    fn test_dead_entities_purged_and_not_drawn() {
        let mut arena = fixtures::arena();
        enemy_at(&mut arena, 100.0, 100.0);
        enemy_at(&mut arena, 300.0, 100.0);
        arena.enemies[0].body.kill();

        let mut frame = Frame::default();
        arena.draw(&mut frame);
        // One live enemy plus the player
        assert_eq!(frame.commands.len(), 2);

        let before = arena.enemies[0].body.pos;
        arena.update(0.1);
        assert_eq!(arena.enemies().len(), 1);
        assert_ne!(arena.enemies()[0].body.pos, before);
    }

    #[test]
    fn test_collisions_leave_sparks() {
        let assets = fixtures::assets();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut arena = fixtures::arena();
        enemy_at(&mut arena, 480.0, 500.0);
        let id = arena.next_entity_id();
        arena.add_projectile(Projectile::new(
            id,
            DVec2::new(500.0, 560.0),
            DVec2::new(0.0, -400.0),
            assets.sprites.primary_laser,
        ));

        let destroyed = arena.resolve_collisions(assets.sprites.hit_effect, 0.25, &mut rng);

        assert_eq!(destroyed.len(), 1);
        assert!(arena.enemies().is_empty());
        assert!(arena.projectiles().is_empty());
        assert_eq!(arena.effects().len(), 1);
        let rotation = arena.effects()[0].body.transform.rotation;
        assert!((0.0..TAU).contains(&rotation));
    }

    #[test]
    fn test_draw_order() {
        let sprites = fixtures::assets().sprites;
        let mut arena = fixtures::arena();
        enemy_at(&mut arena, 100.0, 100.0);
        arena.fire(Ability::Primary, &sprites);
        let id = arena.next_entity_id();
        arena.add_effect(Effect::new(id, DVec2::new(10.0, 10.0), 0.0, sprites.hit_effect, 0.25));

        let mut frame = Frame::default();
        arena.draw(&mut frame);
        let handles: Vec<_> = frame
            .commands
            .iter()
            .map(|c| match c {
                DrawCommand::Sprite { handle, .. } => *handle,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            handles,
            vec![
                fixtures::sprite(50.0, 50.0).handle,
                sprites.primary_laser.handle,
                sprites.player.handle,
                sprites.hit_effect.handle,
            ]
        );
    }

    #[test]
    fn test_successor_keeps_player_only() {
        let mut arena = fixtures::arena();
        enemy_at(&mut arena, 100.0, 100.0);
        arena.player.level = 4;
        let next = arena.successor();
        assert!(next.enemies().is_empty());
        assert_eq!(next.player.level, 4);
        assert_eq!(next.next_id, arena.next_id);
    }
}
