use std::time::Duration;

use bevy::{prelude::*, time::TimeUpdateStrategy};
use glider::{
    components::Player,
    plugins::{CameraPlugin, EnvironmentPlugin, FlightPlugin, GamePlugin},
    resources::{GameConfig, InputAction, InputState},
    state::{GameStateId, GameStateMachine},
};

/// Builder for a headless app running on manual time, one physics step per update
pub struct TestAppBuilder {
    config: GameConfig,
    game_flow: bool,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        let mut config = GameConfig::default();
        // Calm air keeps the numbers reproducible
        config.atmosphere.turbulence_amplitude = 0.0;
        Self {
            config,
            game_flow: true,
        }
    }
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Only the flight simulation; bodies are spawned by the test
    pub fn without_game_flow(mut self) -> Self {
        self.game_flow = false;
        self
    }

    pub fn build(self) -> TestApp {
        let timestep = self.config.physics.timestep;
        let mut app = App::new();

        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
                timestep,
            )))
            .add_plugins(EnvironmentPlugin::with_config(
                self.config.atmosphere.clone(),
                self.config.ground.clone(),
            ))
            .add_plugins(FlightPlugin::with_config(self.config.physics.clone()));

        if self.game_flow {
            app.add_plugins(CameraPlugin)
                .add_plugins(GamePlugin::with_config(self.config.clone()));
        }

        // Run an initial update to initialize everything
        app.update();

        TestApp { app, timestep }
    }
}

pub struct TestApp {
    pub app: App,
    pub timestep: f64,
}

impl TestApp {
    pub fn run_steps(&mut self, steps: usize) {
        for _ in 0..steps {
            self.app.update();
        }
    }

    pub fn run_seconds(&mut self, seconds: f64) {
        let steps = (seconds / self.timestep).ceil() as usize;
        self.run_steps(steps);
    }

    pub fn press(&mut self, action: InputAction) {
        self.app
            .world_mut()
            .resource_mut::<InputState>()
            .press(action);
    }

    pub fn release(&mut self, action: InputAction) {
        self.app
            .world_mut()
            .resource_mut::<InputState>()
            .release(action);
    }

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn resource_mut<T: Resource>(&mut self) -> Mut<T> {
        self.app.world_mut().resource_mut::<T>()
    }

    pub fn current_state(&self) -> Option<GameStateId> {
        self.resource::<GameStateMachine>().current()
    }

    pub fn spawn<B: Bundle>(&mut self, bundle: B) -> Entity {
        self.app.world_mut().spawn(bundle).id()
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.app.world().get::<T>(entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<Mut<T>> {
        self.app.world_mut().get_mut::<T>(entity)
    }

    pub fn query_single<T: Component>(&mut self) -> Option<&T> {
        let world = self.app.world_mut();
        let mut query = world.query::<&T>();
        query.get_single(world).ok()
    }

    pub fn count<T: Component>(&mut self) -> usize {
        let world = self.app.world_mut();
        let mut query = world.query::<&T>();
        query.iter(world).count()
    }

    pub fn player(&mut self) -> Option<(Entity, Player)> {
        let world = self.app.world_mut();
        let mut query = world.query::<(Entity, &Player)>();
        let players: Vec<_> = query.iter(world).map(|(e, p)| (e, *p)).collect();
        match players.as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }
}
