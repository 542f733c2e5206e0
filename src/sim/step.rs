//! Per-frame simulation step
//!
//! Advances one discrete frame of game state given the input snapshot and
//! the current wall-clock time. Called once per animation frame by the
//! host loop; scoring and spawn statistics are deliberately frame-coupled.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{GameEvent, GamePhase, Item, ItemKind, Meteor, World};
use crate::consts::*;

/// Input snapshot for a single frame. Held directions are level-triggered;
/// `start` and `restart` are one-shot signals the driver clears after the
/// step consumes them.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// "Move left" currently held (keyboard or touch)
    pub left: bool,
    /// "Move right" currently held
    pub right: bool,
    /// Start requested (from NotStarted)
    pub start: bool,
    /// Restart requested (from GameOver)
    pub restart: bool,
}

/// Advance the world by one frame.
///
/// Returns the events that occurred, in order, for the audio and
/// persistence collaborators. The world's cached high score is updated
/// here on game over; the driver persists it when it sees
/// [`GameEvent::GameOverReached`].
pub fn step(world: &mut World, input: &FrameInput, now_ms: f64, rng: &mut Pcg32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Background stars drift in every phase, forever. Past the bottom edge
    // they wrap to the top at a new random x.
    for star in &mut world.stars {
        star.pos.y += star.speed;
        if star.pos.y > BOARD_HEIGHT {
            star.pos.y = 0.0;
            star.pos.x = rng.random::<f32>() * BOARD_WIDTH;
        }
    }

    match world.phase {
        GamePhase::NotStarted => {
            if input.start {
                world.reset();
            }
            return events;
        }
        GamePhase::GameOver => {
            if input.restart {
                world.reset();
            }
            return events;
        }
        GamePhase::Running => {}
    }

    // One point per frame survived.
    world.score += 1;

    // Progressive difficulty recomputes its ramp every frame; the static
    // modes keep the scale set at reset.
    if world.difficulty == super::Difficulty::Progressive {
        world.meteor_speed_scale = world.difficulty.meteor_speed_scale(world.score);
    }

    // Player movement. Opposite inputs cancel; x stays on the board.
    let speed = PLAYER_BASE_SPEED * world.player_speed_scale;
    if input.right {
        world.player.pos.x += speed;
    }
    if input.left {
        world.player.pos.x -= speed;
    }
    world.player.pos.x = world.player.pos.x.clamp(0.0, BOARD_WIDTH - PLAYER_SIZE);

    // Meteor spawn: independent Bernoulli trial per frame.
    if rng.random::<f32>() < world.tuning.meteor_spawn_chance {
        let x = rng.random::<f32>() * (BOARD_WIDTH - METEOR_SIZE);
        let speed = rng.random_range(world.tuning.meteor_speed_min..world.tuning.meteor_speed_max);
        world.meteors.push(Meteor {
            pos: Vec2::new(x, -METEOR_SIZE),
            speed,
        });
        events.push(GameEvent::MeteorSpawned);
    }

    // Item spawn: independent trial, weighted kind pick. No event - item
    // spawns are silent.
    if rng.random::<f32>() < world.tuning.item_spawn_chance {
        let kind = if rng.random::<f32>() < world.tuning.invincible_weight {
            ItemKind::Invincible
        } else {
            ItemKind::SlowTime
        };
        let x = rng.random::<f32>() * (BOARD_WIDTH - ITEM_SIZE);
        world.items.push(Item {
            pos: Vec2::new(x, -ITEM_SIZE),
            kind,
        });
    }

    // Effect windows come fresh from the absolute timestamps each frame.
    let is_slow = world.is_slow(now_ms);
    let is_invincible = world.is_invincible(now_ms);

    // Meteor update. Lethal collisions test the inset player hitbox.
    let hitbox = world.player.hitbox();
    let mut i = 0;
    while i < world.meteors.len() {
        let mut fall = world.meteors[i].speed * world.meteor_speed_scale;
        if is_slow {
            fall *= 0.5;
        }
        world.meteors[i].pos.y += fall;

        if hitbox.overlaps(&world.meteors[i].rect()) {
            if is_invincible {
                events.push(GameEvent::PlayerHit);
                world.destroyed += 1;
                world.meteors.remove(i);
                continue;
            }

            world.phase = GamePhase::GameOver;
            events.push(GameEvent::PlayerHit);
            events.push(GameEvent::GameOverReached);

            let final_score = world.final_score();
            if final_score > world.high_score {
                world.high_score = final_score;
            }

            // The frame ends here. The killing meteor stays where it is;
            // no further frames run for this session until a restart.
            return events;
        }

        if world.meteors[i].pos.y > BOARD_HEIGHT {
            world.meteors.remove(i);
        } else {
            i += 1;
        }
    }

    // Item update. Pickups test the full, uninset player box on both
    // sides - collecting is meant to be generous.
    let player_rect = world.player.rect();
    let mut i = 0;
    while i < world.items.len() {
        world.items[i].pos.y += world.tuning.item_fall_speed;

        if player_rect.overlaps(&world.items[i].rect()) {
            events.push(GameEvent::ItemCollected);
            match world.items[i].kind {
                ItemKind::Invincible => world.invincible_until = now_ms + EFFECT_DURATION_MS,
                ItemKind::SlowTime => world.slow_until = now_ms + EFFECT_DURATION_MS,
            }
            world.items.remove(i);
            continue;
        }

        if world.items[i].pos.y > BOARD_HEIGHT {
            world.items.remove(i);
        } else {
            i += 1;
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Difficulty;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    /// Running world with all spawning disabled, so tests control every
    /// entity on the board.
    fn quiet_world(difficulty: Difficulty) -> World {
        let mut world = World::new(difficulty, 0.7, 0, &mut rng());
        world.tuning.meteor_spawn_chance = 0.0;
        world.tuning.item_spawn_chance = 0.0;
        world.reset();
        world
    }

    fn meteor_on_player(world: &World) -> Meteor {
        // Dead center of the ship, one frame of fall above it so the
        // overlap happens after movement.
        let center = world.player.pos + Vec2::splat(PLAYER_SIZE / 2.0 - METEOR_SIZE / 2.0);
        Meteor {
            pos: center - Vec2::new(0.0, 1.0),
            speed: 1.0,
        }
    }

    #[test]
    fn test_start_signal_begins_run() {
        let mut world = World::new(Difficulty::Easy, 0.7, 0, &mut rng());
        world.tuning.meteor_spawn_chance = 0.0;
        world.tuning.item_spawn_chance = 0.0;
        assert_eq!(world.phase, GamePhase::NotStarted);

        let events = step(&mut world, &FrameInput::default(), 0.0, &mut rng());
        assert_eq!(world.phase, GamePhase::NotStarted);
        assert!(events.is_empty());
        assert_eq!(world.score, 0);

        let input = FrameInput {
            start: true,
            ..Default::default()
        };
        step(&mut world, &input, 0.0, &mut rng());
        assert_eq!(world.phase, GamePhase::Running);
    }

    #[test]
    fn test_score_increments_once_per_frame() {
        let mut world = quiet_world(Difficulty::Easy);
        let mut r = rng();
        for frame in 1..=100u64 {
            step(&mut world, &FrameInput::default(), frame as f64 * 16.0, &mut r);
            assert_eq!(world.score, frame);
        }
    }

    #[test]
    fn test_player_clamps_to_board_edges() {
        let mut world = quiet_world(Difficulty::Easy);
        let mut r = rng();

        let left = FrameInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..1000 {
            step(&mut world, &left, 0.0, &mut r);
        }
        assert_eq!(world.player.pos.x, 0.0);

        let right = FrameInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..1000 {
            step(&mut world, &right, 0.0, &mut r);
        }
        assert_eq!(world.player.pos.x, BOARD_WIDTH - PLAYER_SIZE);
    }

    #[test]
    fn test_opposite_inputs_cancel() {
        let mut world = quiet_world(Difficulty::Easy);
        let x0 = world.player.pos.x;
        let both = FrameInput {
            left: true,
            right: true,
            ..Default::default()
        };
        step(&mut world, &both, 0.0, &mut rng());
        assert_eq!(world.player.pos.x, x0);
    }

    #[test]
    fn test_meteor_spawns_with_event_and_speed_range() {
        let mut world = quiet_world(Difficulty::Easy);
        world.tuning.meteor_spawn_chance = 1.0;
        let mut r = rng();

        let events = step(&mut world, &FrameInput::default(), 0.0, &mut r);
        assert!(events.contains(&GameEvent::MeteorSpawned));
        assert_eq!(world.meteors.len(), 1);

        let m = &world.meteors[0];
        assert!(m.speed >= 3.0 && m.speed < 8.0);
        assert!(m.pos.x >= 0.0 && m.pos.x <= BOARD_WIDTH - METEOR_SIZE);
    }

    #[test]
    fn test_item_spawn_is_silent_and_weighted() {
        let mut world = quiet_world(Difficulty::Easy);
        world.tuning.item_spawn_chance = 1.0;
        world.tuning.invincible_weight = 1.0;
        let mut r = rng();

        let events = step(&mut world, &FrameInput::default(), 0.0, &mut r);
        assert!(events.is_empty());
        assert_eq!(world.items.len(), 1);
        assert_eq!(world.items[0].kind, ItemKind::Invincible);

        world.items.clear();
        world.tuning.invincible_weight = 0.0;
        step(&mut world, &FrameInput::default(), 0.0, &mut r);
        assert_eq!(world.items[0].kind, ItemKind::SlowTime);
    }

    #[test]
    fn test_meteor_despawns_off_screen_without_penalty() {
        // Easy (0.6): speed 5 falls 3.0/frame. From y=-30 it needs
        // ceil((640+30)/3) = 224 frames to pass the bottom edge.
        let mut world = quiet_world(Difficulty::Easy);
        world.meteors.push(Meteor {
            pos: Vec2::new(0.0, -METEOR_SIZE),
            speed: 5.0,
        });
        let mut r = rng();

        for _ in 0..223 {
            step(&mut world, &FrameInput::default(), 0.0, &mut r);
        }
        assert_eq!(world.meteors.len(), 1);

        step(&mut world, &FrameInput::default(), 0.0, &mut r);
        assert!(world.meteors.is_empty());
        assert_eq!(world.phase, GamePhase::Running);
        assert_eq!(world.destroyed, 0);
    }

    #[test]
    fn test_lethal_collision_ends_game_once() {
        let mut world = quiet_world(Difficulty::Easy);
        world.score = 1000;
        world.destroyed = 5;
        let m = meteor_on_player(&world);
        world.meteors.push(m);
        let mut r = rng();

        let events = step(&mut world, &FrameInput::default(), 0.0, &mut r);
        assert_eq!(world.phase, GamePhase::GameOver);
        assert_eq!(
            events,
            vec![GameEvent::PlayerHit, GameEvent::GameOverReached]
        );
        // The killing meteor is not removed.
        assert_eq!(world.meteors.len(), 1);
        // base 1001 (this frame scored) + 5 * 100
        assert_eq!(world.final_score(), 1501);
        assert_eq!(world.high_score, 1501);

        // Subsequent steps are no-ops apart from the star field.
        let score = world.score;
        let meteor_y = world.meteors[0].pos.y;
        let events = step(&mut world, &FrameInput::default(), 16.0, &mut r);
        assert!(events.is_empty());
        assert_eq!(world.score, score);
        assert_eq!(world.meteors[0].pos.y, meteor_y);
    }

    #[test]
    fn test_high_score_only_overwritten_by_larger() {
        let mut world = quiet_world(Difficulty::Easy);
        world.high_score = 2000;
        let m = meteor_on_player(&world);
        world.meteors.push(m);

        step(&mut world, &FrameInput::default(), 0.0, &mut rng());
        assert_eq!(world.phase, GamePhase::GameOver);
        assert_eq!(world.high_score, 2000);
    }

    #[test]
    fn test_invincible_collision_absorbs_meteor() {
        let mut world = quiet_world(Difficulty::Easy);
        world.invincible_until = 10_000.0;
        let m = meteor_on_player(&world);
        world.meteors.push(m);

        let events = step(&mut world, &FrameInput::default(), 0.0, &mut rng());
        assert_eq!(world.phase, GamePhase::Running);
        assert_eq!(world.destroyed, 1);
        assert!(world.meteors.is_empty());
        assert_eq!(events, vec![GameEvent::PlayerHit]);
    }

    #[test]
    fn test_invincible_absorbs_each_overlapping_meteor_once() {
        let mut world = quiet_world(Difficulty::Easy);
        world.invincible_until = 10_000.0;
        for _ in 0..3 {
            let m = meteor_on_player(&world);
            world.meteors.push(m);
        }

        let events = step(&mut world, &FrameInput::default(), 0.0, &mut rng());
        assert_eq!(world.destroyed, 3);
        assert!(world.meteors.is_empty());
        assert_eq!(events.iter().filter(|e| **e == GameEvent::PlayerHit).count(), 3);
    }

    #[test]
    fn test_graze_on_inset_ring_is_not_lethal() {
        let mut world = quiet_world(Difficulty::Easy);
        // Meteor overlapping only the left 10px forgiveness ring.
        let x = world.player.pos.x - METEOR_SIZE + 5.0;
        let y = world.player.pos.y + 10.0;
        world.meteors.push(Meteor {
            pos: Vec2::new(x, y),
            speed: 0.0,
        });

        step(&mut world, &FrameInput::default(), 0.0, &mut rng());
        assert_eq!(world.phase, GamePhase::Running);
    }

    #[test]
    fn test_item_pickup_sets_absolute_expiry() {
        let mut world = quiet_world(Difficulty::Easy);
        let pos = world.player.pos + Vec2::new(10.0, -world.tuning.item_fall_speed);
        world.items.push(Item {
            pos,
            kind: ItemKind::SlowTime,
        });

        let events = step(&mut world, &FrameInput::default(), 1000.0, &mut rng());
        assert_eq!(events, vec![GameEvent::ItemCollected]);
        assert!(world.items.is_empty());
        assert_eq!(world.slow_until, 6000.0);
        assert!(world.is_slow(5999.0));
        assert!(!world.is_slow(6000.0));
    }

    #[test]
    fn test_slow_motion_halves_meteor_fall() {
        let mut world = quiet_world(Difficulty::Hard);
        world.slow_until = 10_000.0;
        world.meteors.push(Meteor {
            pos: Vec2::new(0.0, 0.0),
            speed: 4.0,
        });

        // Hard scale 1.0, halved: 2.0 per frame while slow is active.
        step(&mut world, &FrameInput::default(), 0.0, &mut rng());
        assert_eq!(world.meteors[0].pos.y, 2.0);

        // Window expired: full speed again.
        step(&mut world, &FrameInput::default(), 10_000.0, &mut rng());
        assert_eq!(world.meteors[0].pos.y, 6.0);
    }

    #[test]
    fn test_item_fall_ignores_difficulty_and_slow() {
        let mut world = quiet_world(Difficulty::Hard);
        world.slow_until = 10_000.0;
        world.items.push(Item {
            pos: Vec2::new(0.0, 0.0),
            kind: ItemKind::Invincible,
        });

        step(&mut world, &FrameInput::default(), 0.0, &mut rng());
        assert_eq!(world.items[0].pos.y, world.tuning.item_fall_speed);
    }

    #[test]
    fn test_item_pickup_uses_full_player_box() {
        let mut world = quiet_world(Difficulty::Easy);
        // Clipping only the forgiveness ring: lethal box misses it, but
        // the pickup box does not.
        let x = world.player.pos.x - ITEM_SIZE + 5.0;
        let y = world.player.pos.y + 10.0 - world.tuning.item_fall_speed;
        world.items.push(Item {
            pos: Vec2::new(x, y),
            kind: ItemKind::Invincible,
        });

        let events = step(&mut world, &FrameInput::default(), 2000.0, &mut rng());
        assert_eq!(events, vec![GameEvent::ItemCollected]);
        assert_eq!(world.invincible_until, 7000.0);
    }

    #[test]
    fn test_stars_animate_after_game_over() {
        let mut world = quiet_world(Difficulty::Easy);
        world.phase = GamePhase::GameOver;
        let before: Vec<f32> = world.stars.iter().map(|s| s.pos.y).collect();

        step(&mut world, &FrameInput::default(), 0.0, &mut rng());
        let moved = world
            .stars
            .iter()
            .zip(&before)
            .any(|(s, y0)| s.pos.y != *y0);
        assert!(moved);
    }

    #[test]
    fn test_star_wraps_to_top_at_new_x() {
        let mut world = quiet_world(Difficulty::Easy);
        world.stars[0].pos = Vec2::new(123.0, BOARD_HEIGHT + 1.0);
        world.stars[0].speed = 0.5;

        step(&mut world, &FrameInput::default(), 0.0, &mut rng());
        assert_eq!(world.stars[0].pos.y, 0.0);
        assert!(world.stars[0].pos.x >= 0.0 && world.stars[0].pos.x < BOARD_WIDTH);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut world = quiet_world(Difficulty::Easy);
        world.score = 500;
        let m = meteor_on_player(&world);
        world.meteors.push(m);
        let mut r = rng();
        step(&mut world, &FrameInput::default(), 0.0, &mut r);
        assert_eq!(world.phase, GamePhase::GameOver);
        let high = world.high_score;

        let input = FrameInput {
            restart: true,
            ..Default::default()
        };
        step(&mut world, &input, 16.0, &mut r);
        assert_eq!(world.phase, GamePhase::Running);
        assert_eq!(world.score, 0);
        assert_eq!(world.destroyed, 0);
        assert!(world.meteors.is_empty());
        assert_eq!(world.high_score, high);
    }

    #[test]
    fn test_progressive_scale_tracks_score() {
        let mut world = quiet_world(Difficulty::Progressive);
        world.score = 498;
        let mut r = rng();

        step(&mut world, &FrameInput::default(), 0.0, &mut r); // score 499
        assert_eq!(world.meteor_speed_scale, 0.7);
        step(&mut world, &FrameInput::default(), 0.0, &mut r); // score 500
        assert_eq!(world.meteor_speed_scale, 0.75);
    }

    #[test]
    fn test_determinism() {
        let mut r1 = Pcg32::seed_from_u64(99);
        let mut r2 = Pcg32::seed_from_u64(99);
        let mut w1 = World::new(Difficulty::Normal, 0.7, 0, &mut r1);
        let mut w2 = World::new(Difficulty::Normal, 0.7, 0, &mut r2);
        w1.reset();
        w2.reset();

        let inputs = [
            FrameInput {
                right: true,
                ..Default::default()
            },
            FrameInput::default(),
            FrameInput {
                left: true,
                ..Default::default()
            },
        ];
        for frame in 0..600 {
            let input = &inputs[frame % inputs.len()];
            let now = frame as f64 * 16.0;
            let e1 = step(&mut w1, input, now, &mut r1);
            let e2 = step(&mut w2, input, now, &mut r2);
            assert_eq!(e1, e2);
        }
        assert_eq!(w1.score, w2.score);
        assert_eq!(w1.meteors.len(), w2.meteors.len());
        assert_eq!(w1.player.pos.x, w2.player.pos.x);
    }

    proptest! {
        #[test]
        fn prop_player_x_stays_in_bounds(
            seed in any::<u64>(),
            scale in 0.1f32..2.0,
            moves in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..200),
        ) {
            let mut r = Pcg32::seed_from_u64(seed);
            let mut world = World::new(Difficulty::Normal, scale, 0, &mut r);
            world.tuning.item_spawn_chance = 0.0;
            world.reset();

            for (frame, (left, right)) in moves.into_iter().enumerate() {
                let input = FrameInput { left, right, ..Default::default() };
                step(&mut world, &input, frame as f64 * 16.0, &mut r);
                prop_assert!(world.player.pos.x >= 0.0);
                prop_assert!(world.player.pos.x <= BOARD_WIDTH - PLAYER_SIZE);
            }
        }
    }
}
