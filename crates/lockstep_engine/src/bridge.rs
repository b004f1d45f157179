//! Revocable capability handle into the engine
//!
//! External collaborators never hold references into the engine; they hold
//! a [`ScopedGameBridge`], a small token minted at scene install. Every
//! bridge operation takes the engine borrow explicitly and first proves
//! the token is still live. Installing a new scene bumps the engine's
//! epoch, which revokes every outstanding token at once; a revoked token
//! can never become valid again. This is the defense against stale
//! cross-scene references: a collaborator that kept handles from the old
//! scene starts failing loudly instead of mutating the wrong world.

use std::rc::Rc;
use thiserror::Error;

use crate::context::EngineContext;
use crate::engine::GameEngine;
use crate::input::FrameInput;
use crate::scene::system::GameSystem;

/// Why a bridge operation was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The bridge was revoked by a scene change; resolve a fresh one from
    /// the current scene's initialization
    #[error("stale game bridge: revoked by a scene change")]
    Revoked,

    /// The bridge belongs to a different engine instance
    #[error("game bridge is bound to a different engine instance")]
    ForeignEngine,
}

/// Capability token scoped to one scene of one engine
///
/// Copyable; all copies share the same validity and are revoked together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopedGameBridge {
    engine_id: u64,
    epoch: u64,
}

impl ScopedGameBridge {
    pub(crate) fn new(engine_id: u64, epoch: u64) -> Self {
        Self { engine_id, epoch }
    }

    /// Whether this bridge is still the live one for `engine`
    pub fn is_valid(&self, engine: &GameEngine) -> bool {
        self.ensure_valid(engine).is_ok()
    }

    fn ensure_valid(&self, engine: &GameEngine) -> Result<(), BridgeError> {
        if self.engine_id != engine.instance_id() {
            return Err(BridgeError::ForeignEngine);
        }
        if self.epoch != engine.bridge_epoch() {
            return Err(BridgeError::Revoked);
        }
        Ok(())
    }

    /// Look up an engine context by type
    pub fn context<T: EngineContext>(
        &self,
        engine: &GameEngine,
    ) -> Result<Option<Rc<T>>, BridgeError> {
        self.ensure_valid(engine)?;
        Ok(engine.context::<T>())
    }

    /// Look up a game system of the active scene by type
    pub fn system<'e, S: GameSystem>(
        &self,
        engine: &'e GameEngine,
    ) -> Result<Option<&'e S>, BridgeError> {
        self.ensure_valid(engine)?;
        Ok(engine.system::<S>())
    }

    /// Run one deterministic simulation step
    ///
    /// The network-catchup entry point: callable several times before the
    /// next render.
    pub fn simulate(&self, engine: &mut GameEngine, input: FrameInput) -> Result<(), BridgeError> {
        self.ensure_valid(engine)?;
        engine.simulate(input);
        Ok(())
    }

    /// Rebuild the scene from its retained factory
    ///
    /// Succeeds as a logged no-op when the scene was installed directly
    /// rather than through a factory. On an actual reload this bridge is
    /// revoked by the time the call returns.
    pub fn reload_scene(&self, engine: &mut GameEngine) -> Result<(), BridgeError> {
        self.ensure_valid(engine)?;
        engine.reload_scene();
        Ok(())
    }
}
