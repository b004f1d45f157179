//! Round flow: spawning, scoring, collision, reset

use std::cell::Cell;

use lockstep_engine::prelude::*;

use crate::actors::{HitBox, Hopper, Pillar};
use crate::config::GameConfig;
use crate::input::ControlScheme;

/// Half extent of the hopper's collision box
const HOPPER_HALF_EXTENT: f32 = 20.0;

/// Cross-round results, shared with the outside world as an engine context
#[derive(Debug, Default)]
pub struct Scoreboard {
    /// Best score across all rounds
    pub best: Cell<u32>,
    /// Rounds restarted after a game over
    pub rounds: Cell<u32>,
}

impl EngineContext for Scoreboard {}

/// Scene-level rules: pillar spawning, scoring, collision, and restarts
pub struct FlowSystem {
    config: GameConfig,
    binder: ActionBinder,
    hop_tag: String,
    hopper: Option<ActorKey>,
    spawn_timer: f32,
    score: u32,
    game_over: bool,
}

impl FlowSystem {
    /// Create the flow system for one scene
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            binder: ActionBinder::new(crate::input::CONTROLS_SOURCE),
            hop_tag: "Hop".into(),
            hopper: None,
            spawn_timer: 0.0,
            score: 0,
            game_over: false,
        }
    }

    /// Current round score
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Whether the round has ended
    pub fn game_over(&self) -> bool {
        self.game_over
    }

    fn spawn_pillar_pair(&mut self, cx: &mut SceneScope<'_>) {
        let config = &self.config;
        let center = cx
            .scene
            .rng()
            .next_range(-config.gap_center_range, config.gap_center_range);
        let offset = config.gap_height * 0.5 + config.pillar_height * 0.5;
        let despawn_x = -config.spawn_x;

        for (scoring, y) in [(true, center + offset), (false, center - offset)] {
            cx.spawn_actor(
                Actor::with_behavior(
                    "Pillar",
                    Pillar::new(config.scroll_speed, despawn_x, scoring),
                )
                .at(Vec3::new(config.spawn_x, y, 0.0))
                .with_component(HitBox::new(
                    config.pillar_width * 0.5,
                    config.pillar_height * 0.5,
                )),
            );
        }
    }

    fn reset_round(&mut self, cx: &mut SceneScope<'_>) {
        let pillars: Vec<ActorKey> = cx
            .scene
            .actors()
            .filter(|(_, actor)| actor.behavior_as::<Pillar>().is_some())
            .map(|(key, _)| key)
            .collect();
        for key in pillars {
            cx.destroy_actor(key);
        }

        if let Some(key) = self.hopper {
            if let Some(actor) = cx.scene.actor_mut(key) {
                actor.transform_mut().position = Vec3::new(self.config.hopper_x, 0.0, 0.0);
                actor.transform_mut().rotation.z = 0.0;
                if let Some(hopper) = actor.behavior_as_mut::<Hopper>() {
                    hopper.revive();
                }
            }
        }

        self.score = 0;
        self.spawn_timer = 0.0;
        self.game_over = false;
        if let Some(scoreboard) = cx.context::<Scoreboard>() {
            scoreboard.rounds.set(scoreboard.rounds.get() + 1);
        }
        log::info!("round restarted");
    }

    fn publish_best(&self, cx: &SceneScope<'_>) {
        if let Some(scoreboard) = cx.context::<Scoreboard>() {
            scoreboard.best.set(scoreboard.best.get().max(self.score));
        }
    }
}

impl GameSystem for FlowSystem {
    fn begin_play(&mut self, cx: &mut SceneScope<'_>) {
        if let Some(scheme) = cx.context::<ControlScheme>() {
            self.hop_tag = scheme.hop_action.clone();
        }
        self.hopper = cx.scene.find_actor("Hopper");
        self.spawn_timer = 0.0;
        self.score = 0;
        self.game_over = false;
        if self.hopper.is_none() {
            log::warn!("flow system found no hopper in the scene");
        }
    }

    fn tick(&mut self, cx: &mut SceneScope<'_>, dt: f32) {
        if self.game_over {
            if self.binder.is_action_just_pressed(cx.input(), &self.hop_tag) {
                self.reset_round(cx);
            }
            return;
        }

        self.spawn_timer += dt;
        if self.spawn_timer >= self.config.spawn_interval {
            self.spawn_timer = 0.0;
            self.spawn_pillar_pair(cx);
        }
    }

    fn post_tick(&mut self, cx: &mut SceneScope<'_>, _dt: f32) {
        if self.game_over {
            return;
        }
        let Some(hopper_key) = self.hopper else {
            return;
        };

        let Some((hopper_bounds, hopper_x, hopper_alive)) =
            cx.scene.actor(hopper_key).map(|actor| {
                (
                    actor.bounds(),
                    actor.transform().position.x,
                    actor.behavior_as::<Hopper>().is_some_and(Hopper::is_alive),
                )
            })
        else {
            self.game_over = true;
            return;
        };

        let mut hit = false;
        let mut scored = 0;
        let mut newly_passed = Vec::new();
        for (key, actor) in cx.scene.actors() {
            let Some(pillar) = actor.behavior_as::<Pillar>() else {
                continue;
            };
            if actor.bounds().intersects(&hopper_bounds) {
                hit = true;
            }
            let trailing_edge = actor.transform().position.x + self.config.pillar_width * 0.5;
            if !pillar.passed && trailing_edge < hopper_x {
                newly_passed.push(key);
                if pillar.scoring {
                    scored += 1;
                }
            }
        }

        for key in newly_passed {
            if let Some(pillar) = cx
                .scene
                .actor_mut(key)
                .and_then(|actor| actor.behavior_as_mut::<Pillar>())
            {
                pillar.passed = true;
            }
        }
        if scored > 0 {
            self.score += scored;
            log::info!("score: {}", self.score);
        }

        if hit {
            if let Some(hopper) = cx
                .scene
                .actor_mut(hopper_key)
                .and_then(|actor| actor.behavior_as_mut::<Hopper>())
            {
                hopper.kill();
            }
        }
        if hit || !hopper_alive {
            self.game_over = true;
            self.publish_best(cx);
            log::info!("game over, final score {}", self.score);
        }
    }

    fn render(&mut self, _cx: &mut SceneScope<'_>, _dt: f32) {
        log::trace!("score {}, game_over {}", self.score, self.game_over);
    }

    fn end_play(&mut self, cx: &mut SceneScope<'_>) {
        self.publish_best(cx);
    }
}

/// Build one round's scene from a config
pub fn build_scene(config: &GameConfig) -> Scene {
    let mut scene = Scene::with_seed(config.seed);
    scene.add_system(FlowSystem::new(config.clone()));
    scene.add_actor(
        Actor::with_behavior("Hopper", Hopper::new(config))
            .at(Vec3::new(config.hopper_x, 0.0, 0.0))
            .with_component(HitBox::new(HOPPER_HALF_EXTENT, HOPPER_HALF_EXTENT)),
    );
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScriptedControls;
    use lockstep_engine::GameEngine;

    fn assemble(config: &GameConfig, hops: Vec<u64>) -> GameEngine {
        let mut engine = GameEngine::new();
        engine.add_context(Scoreboard::default());
        engine.add_context(ControlScheme::default());
        engine.add_editor_system(ScriptedControls::new(hops));
        let config = config.clone();
        engine.set_scene_with(move || build_scene(&config));
        engine
    }

    fn run(engine: &mut GameEngine, ticks: u32) {
        for _ in 0..ticks {
            engine.tick(FrameInput::new(1.0 / 60.0));
        }
    }

    fn hopper_position(engine: &GameEngine) -> Vec3 {
        let scene = engine.scene().unwrap();
        let key = scene.find_actor("Hopper").unwrap();
        scene.actor(key).unwrap().transform().position
    }

    /// Wide-open gaps: pillars can never be touched.
    fn open_config() -> GameConfig {
        GameConfig {
            scroll_speed: 1000.0,
            spawn_interval: 0.5,
            gap_height: 4000.0,
            gap_center_range: 0.0,
            spawn_x: 300.0,
            ..GameConfig::default()
        }
    }

    /// A solid wall across the whole playfield every quarter second.
    fn wall_config() -> GameConfig {
        GameConfig {
            scroll_speed: 1500.0,
            spawn_interval: 0.25,
            gap_height: 0.0,
            gap_center_range: 0.0,
            pillar_height: 1300.0,
            spawn_x: 300.0,
            ..GameConfig::default()
        }
    }

    fn every_25_ticks() -> Vec<u64> {
        (0..600).step_by(25).collect()
    }

    #[test]
    fn identical_scripts_replay_identically() {
        let config = open_config();
        let mut a = assemble(&config, every_25_ticks());
        let mut b = assemble(&config, every_25_ticks());
        run(&mut a, 180);
        run(&mut b, 180);

        assert_eq!(
            a.system::<FlowSystem>().unwrap().score(),
            b.system::<FlowSystem>().unwrap().score()
        );
        assert_eq!(hopper_position(&a), hopper_position(&b));
        assert_eq!(a.game_time(), b.game_time());
    }

    #[test]
    fn surviving_hopper_scores_passed_pillars() {
        let mut engine = assemble(&open_config(), every_25_ticks());
        run(&mut engine, 180);

        let flow = engine.system::<FlowSystem>().unwrap();
        assert!(!flow.game_over());
        assert!(flow.score() >= 2, "score was {}", flow.score());
    }

    #[test]
    fn hitting_a_pillar_ends_the_round_and_a_hop_restarts_it() {
        let mut engine = assemble(&wall_config(), vec![0, 50]);
        run(&mut engine, 40);
        assert!(engine.system::<FlowSystem>().unwrap().game_over());

        run(&mut engine, 20);
        let flow = engine.system::<FlowSystem>().unwrap();
        assert!(!flow.game_over());
        assert_eq!(flow.score(), 0);

        let scoreboard = engine.context::<Scoreboard>().unwrap();
        assert_eq!(scoreboard.rounds.get(), 1);
        assert_eq!(hopper_position(&engine).x, wall_config().hopper_x);
    }

    #[test]
    fn reload_through_the_bridge_restarts_the_match() {
        let mut engine = assemble(&open_config(), every_25_ticks());
        run(&mut engine, 120);
        let mid_score = engine.system::<FlowSystem>().unwrap().score();

        let bridge = engine.current_bridge();
        bridge.reload_scene(&mut engine).unwrap();
        assert!(!bridge.is_valid(&engine));

        run(&mut engine, 120);
        assert_eq!(engine.system::<FlowSystem>().unwrap().score(), mid_score);
    }
}
