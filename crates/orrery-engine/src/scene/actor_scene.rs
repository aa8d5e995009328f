use anyhow::{Result, bail};
use glam::Mat4;

use crate::core::{DrawCtx, UpdateCtx};
use crate::render::Camera3D;

use super::actor::{Actor, ActorCtx, ActorId, Snapshot};
use super::lifecycle::Scene;

/// Scene made of actors.
///
/// Actors update and draw in insertion order. A child's world transform is its
/// parent's world transform times its own local one, refreshed before and after
/// each update. UI actors live in a separate list driven by `update_ui` and
/// `draw_ui`; they have no parents and draw with their local transform.
#[derive(Default)]
pub struct ActorScene {
    actors: Vec<Box<dyn Actor>>,
    parents: Vec<Option<ActorId>>,
    world: Vec<Mat4>,
    started: Vec<bool>,

    ui: Vec<Box<dyn Actor>>,
    ui_local: Vec<Mat4>,
    ui_started: Vec<bool>,
}

impl ActorScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an actor. Actors added after the scene started are started at the
    /// beginning of the next update.
    pub fn add_actor<A>(&mut self, actor: A) -> ActorId
    where
        A: Actor + 'static,
    {
        let id = ActorId::world(self.actors.len());
        self.world.push(actor.transform().matrix());
        self.actors.push(Box::new(actor));
        self.parents.push(None);
        self.started.push(false);
        id
    }

    pub fn add_ui<A>(&mut self, actor: A) -> ActorId
    where
        A: Actor + 'static,
    {
        let id = ActorId::ui(self.ui.len());
        self.ui_local.push(actor.transform().matrix());
        self.ui.push(Box::new(actor));
        self.ui_started.push(false);
        id
    }

    /// Makes `child` follow `parent`. Both must be world actors.
    pub fn add_child(&mut self, parent: ActorId, child: ActorId) -> Result<()> {
        let Some(p) = self.slot(parent) else {
            bail!("unknown parent actor {parent:?}");
        };
        let Some(c) = self.slot(child) else {
            bail!("unknown child actor {child:?}");
        };

        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                bail!(
                    "attaching {} under {} would create a cycle",
                    self.actors[c].name(),
                    self.actors[p].name()
                );
            }
            cursor = self.parents[id.index()];
        }

        self.parents[c] = Some(parent);
        self.refresh_world();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn actor(&self, id: ActorId) -> Option<&dyn Actor> {
        if id.is_ui() {
            self.ui.get(id.index()).map(|a| a.as_ref())
        } else {
            self.actors.get(id.index()).map(|a| a.as_ref())
        }
    }

    pub fn parent_of(&self, id: ActorId) -> Option<ActorId> {
        self.slot(id).and_then(|i| self.parents[i])
    }

    /// World transform of a world actor, or the local transform of a UI actor.
    pub fn world_transform(&self, id: ActorId) -> Option<Mat4> {
        if id.is_ui() {
            self.ui.get(id.index()).map(|a| a.transform().matrix())
        } else {
            self.world.get(id.index()).copied()
        }
    }

    fn slot(&self, id: ActorId) -> Option<usize> {
        (!id.is_ui() && id.index() < self.actors.len()).then_some(id.index())
    }

    fn refresh_world(&mut self) {
        let mut chain = Vec::new();
        for i in 0..self.actors.len() {
            chain.clear();
            let mut cursor = Some(i);
            while let Some(j) = cursor {
                chain.push(j);
                cursor = self.parents[j].map(ActorId::index);
            }

            self.world[i] = chain
                .iter()
                .rev()
                .fold(Mat4::IDENTITY, |acc, &j| acc * self.actors[j].transform().matrix());
        }
    }

    fn refresh_ui(&mut self) {
        for (local, actor) in self.ui_local.iter_mut().zip(&self.ui) {
            *local = actor.transform().matrix();
        }
    }

    fn start_pending(&mut self) -> Result<()> {
        for (actor, started) in self.actors.iter_mut().zip(self.started.iter_mut()) {
            if !*started {
                actor.start()?;
                *started = true;
            }
        }
        for (actor, started) in self.ui.iter_mut().zip(self.ui_started.iter_mut()) {
            if !*started {
                actor.start()?;
                *started = true;
            }
        }
        Ok(())
    }
}

impl Scene for ActorScene {
    fn start(&mut self) -> Result<()> {
        self.refresh_world();
        self.start_pending()
    }

    fn update(&mut self, ctx: &mut UpdateCtx<'_>) -> Result<()> {
        self.start_pending()?;
        self.refresh_world();
        self.refresh_ui();

        let snapshot = Snapshot {
            world: &self.world,
            ui: &self.ui_local,
        };
        for (i, actor) in self.actors.iter_mut().enumerate() {
            let mut actor_ctx = ActorCtx::new(ctx, ActorId::world(i), snapshot);
            actor.update(&mut actor_ctx)?;
        }

        self.refresh_world();
        Ok(())
    }

    fn update_ui(&mut self, ctx: &mut UpdateCtx<'_>) -> Result<()> {
        self.refresh_ui();

        let snapshot = Snapshot {
            world: &self.world,
            ui: &self.ui_local,
        };
        for (i, actor) in self.ui.iter_mut().enumerate() {
            let mut actor_ctx = ActorCtx::new(ctx, ActorId::ui(i), snapshot);
            actor.update(&mut actor_ctx)?;
        }
        Ok(())
    }

    fn draw(&self, ctx: &mut DrawCtx<'_>) -> Result<()> {
        for (actor, world) in self.actors.iter().zip(&self.world) {
            actor.draw(world, ctx);
        }
        Ok(())
    }

    fn draw_ui(&self, ctx: &mut DrawCtx<'_>) -> Result<()> {
        for actor in &self.ui {
            actor.draw(&actor.transform().matrix(), ctx);
        }
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        for actor in self.actors.iter_mut().chain(self.ui.iter_mut()) {
            actor.end()?;
        }
        Ok(())
    }

    fn camera(&self) -> Option<Camera3D> {
        self.actors
            .iter()
            .zip(&self.world)
            .find_map(|(actor, world)| actor.camera(world))
    }
}
