//! Input intents and the fixed-timestep tick
//!
//! `apply_intents` runs once per rendered frame with that frame's sampled
//! input; `fixed_step` advances the world by one fixed tick:
//! gravity -> platform resolution -> enemies and projectiles ->
//! hazard/pickup/win checks. Both are no-ops once the run is won or lost;
//! only `restart` brings the world back.

use super::aabb::overlaps;
use super::collision::{Contact, SweepInput, resolve_vertical};
use super::patrol::update_patrols;
use super::player::DamageOutcome;
use super::projectile::{fire, update_projectiles};
use super::state::{GameEvent, GamePhase, GameState, LossCause};
use crate::axis_sign;
use crate::consts::OVERLAP_EPSILON;

/// One frame's worth of sampled input (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Intent {
    /// Left/right axis in [-1, 1]
    pub horizontal: f32,
    /// Toward/away from the camera in [-1, 1]
    pub depth: f32,
    /// Jump pressed this frame (edge)
    pub jump: bool,
    /// Fire pressed this frame (edge)
    pub fire: bool,
    /// Restart pressed this frame (edge)
    pub restart: bool,
}

/// Apply one frame of input: facing, walking, jump, fire, restart
pub fn apply_intents(state: &mut GameState, intent: &Intent, dt: f32) {
    if intent.restart {
        restart(state);
        return;
    }
    if state.phase.is_over() {
        return;
    }

    let horizontal = intent.horizontal.clamp(-1.0, 1.0);
    let depth = intent.depth.clamp(-1.0, 1.0);

    if let Some(sign) = axis_sign(horizontal) {
        state.player.facing = sign;
    }

    // X and Z are tried separately so blocking on one axis still lets the
    // player slide along the other.
    let step = state.settings.physics.move_speed * dt;
    try_walk(state, glam::Vec3::new(horizontal * step, 0.0, 0.0));
    try_walk(state, glam::Vec3::new(0.0, 0.0, depth * step));

    if intent.jump && state.player.grounded {
        state.player.velocity.y = state.settings.physics.jump_velocity;
        state.player.grounded = false;
        state.player.collided_this_frame = false;
    }

    if intent.fire {
        let projectile_id = fire(
            &mut state.registry,
            &state.player,
            &state.settings.projectile,
        );
        state.events.push(GameEvent::Fired { projectile_id });
    }
}

/// Move the player by `delta` unless that would push it into a standable obstacle
fn try_walk(state: &mut GameState, delta: glam::Vec3) {
    if delta == glam::Vec3::ZERO {
        return;
    }
    let moved = state.player.aabb().at(state.player.position + delta);
    let blocked = state
        .registry
        .obstacles
        .iter()
        .filter(|o| o.is_standable())
        .any(|o| overlaps(&moved, &o.aabb(), OVERLAP_EPSILON));
    if !blocked {
        state.player.position += delta;
    }
}

/// Advance the world by one fixed timestep
pub fn fixed_step(state: &mut GameState, dt: f32) {
    if state.phase.is_over() {
        return;
    }

    state.time_ticks += 1;
    state.elapsed += dt;

    // --- Gravity ---
    let physics = &state.settings.physics;
    let player = &mut state.player;
    player.collided_this_frame = false;
    player.velocity.y = (player.velocity.y + physics.gravity * dt).max(physics.terminal_velocity);

    // --- Platform / obstacle resolution ---
    let sweep = SweepInput {
        position: player.position,
        next: player.position + player.velocity * dt,
        velocity: player.velocity,
        half_extents: player.half_extents,
    };
    let resolution = resolve_vertical(&sweep, &state.platform, &state.registry.obstacles);
    player.apply_resolution(&resolution);
    match resolution.contact {
        Contact::Landed(surface) => state.events.push(GameEvent::Landed { surface }),
        Contact::Ceiling(surface) => state.events.push(GameEvent::BumpedHead { surface }),
        Contact::None | Contact::Resting(_) => {}
    }

    state.player.tick_invincibility(dt);

    // --- Enemies and projectiles (horizontal only) ---
    update_patrols(&mut state.registry.enemies, &state.registry.obstacles, dt);
    let world_bound = state.settings.physics.world_bound;
    for hit in update_projectiles(&mut state.registry, world_bound, dt) {
        log::debug!("Fireball {} killed enemy {}", hit.projectile_id, hit.enemy_id);
        state.events.push(GameEvent::EnemyKilled {
            enemy_id: hit.enemy_id,
            projectile_id: hit.projectile_id,
        });
    }

    state.advance_spin(dt);

    // --- Rules against the settled player position ---
    check_hazards(state);
}

/// Falls, spikes, lethal obstacles, enemy contact, pickups, then the win check
///
/// Stops at the first death: after a respawn or a loss the remaining checks
/// would be testing a position the player no longer occupies.
fn check_hazards(state: &mut GameState) {
    let player_box = state.player.aabb();

    if state.player.position.y < state.settings.physics.fall_floor_y {
        log::debug!("Player fell below the world floor");
        let hp = state.player.hp;
        if damage_player(state, hp) {
            return;
        }
    }

    let hazard_box = player_box.expanded(state.settings.rules.hazard_skin);
    let touched_spike = state
        .registry
        .obstacles
        .iter()
        .filter(|o| o.is_spike())
        .find(|o| overlaps(&hazard_box, &o.aabb(), OVERLAP_EPSILON))
        .map(|o| o.id);
    if let Some(obstacle_id) = touched_spike {
        log::debug!("Player touched spike {obstacle_id}");
        state.finish(
            GamePhase::Lost,
            GameEvent::Lost {
                cause: LossCause::Spike { obstacle_id },
            },
        );
        return;
    }

    let touched_lethal = state
        .registry
        .obstacles
        .iter()
        .filter(|o| o.is_instakill() && !o.is_spike())
        .any(|o| overlaps(&hazard_box, &o.aabb(), OVERLAP_EPSILON));
    if touched_lethal {
        let hp = state.player.hp;
        if damage_player(state, hp) {
            return;
        }
    }

    let enemy_contact = state
        .registry
        .live_enemies()
        .any(|e| overlaps(&player_box, &e.aabb(), OVERLAP_EPSILON));
    if enemy_contact {
        let damage = state.settings.player.contact_damage;
        if damage_player(state, damage) {
            return;
        }
    }

    for pickup in state.registry.collectibles.iter_mut().filter(|c| !c.collected) {
        if overlaps(&player_box, &pickup.aabb(), OVERLAP_EPSILON) {
            pickup.collected = true;
            state.player.heal(pickup.heal_amount);
            state.events.push(GameEvent::Healed {
                collectible_id: pickup.id,
                hp: state.player.hp,
            });
        }
    }

    if state.settings.rules.win_at_edges {
        let margin = state.settings.rules.win_edge_margin;
        let x = state.player.position.x;
        if x <= state.platform.left_x() + margin || x >= state.platform.right_x() - margin {
            state.finish(GamePhase::Won, GameEvent::Won);
        }
    }
}

/// Run the damage state machine and translate its outcome into events
///
/// Returns true when the player died (respawned or ran out of lives).
fn damage_player(state: &mut GameState, amount: u32) -> bool {
    match state.player.take_damage(amount, &state.settings.player) {
        DamageOutcome::Ignored => false,
        DamageOutcome::Hurt { hp } => {
            log::debug!("Player hit for {amount}, hp now {hp}");
            state.events.push(GameEvent::Damaged { amount, hp });
            false
        }
        DamageOutcome::Respawned { lives } => {
            state.events.push(GameEvent::Damaged { amount, hp: 0 });
            state.events.push(GameEvent::Respawned { lives });
            true
        }
        DamageOutcome::OutOfLives => {
            state.events.push(GameEvent::Damaged { amount, hp: 0 });
            state.finish(
                GamePhase::Lost,
                GameEvent::Lost {
                    cause: LossCause::OutOfLives,
                },
            );
            true
        }
    }
}

/// Rebuild the world from its settings
pub fn restart(state: &mut GameState) {
    log::info!("Restarting run");
    state.initialize_from_config();
    state.events.push(GameEvent::Restarted);
}
