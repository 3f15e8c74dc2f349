//! Progressive-accumulation render loop state machine (§4.7).
//!
//! This module owns only the tick algorithm and its `dirty`/`moving`/
//! `active`/`resScale`/`pingpong` bookkeeping; the actual draw passes are a
//! GPU concern, expressed here as the [`FramePresenter`] seam so the state
//! machine can be driven and tested without a GPU device.

/// The three draw passes a tick drives, in strict order: camera → tracer →
/// present. Grounded in the teacher's `update_camera` → `dispatch` → `blit`
/// sequence (`compute.rs::PathTraceCompute`).
pub trait FramePresenter {
    /// Write per-pixel ray origin/direction textures for this tick.
    fn draw_camera(&mut self);
    /// Accumulate one sample into ping-pong target `pingpong % 2`.
    fn draw_tracer(&mut self, pingpong: u32, res_scale: f32);
    /// Tone-map the latest accumulator to the presentation surface.
    fn draw_quad(&mut self, pingpong: u32, res_scale: f32);
    /// Zero both accumulator targets (called when `dirty && !moving`).
    fn clear_accumulators(&mut self);
}

/// Render loop state (§4.7).
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderLoop {
    pub pingpong: u32,
    pub dirty: bool,
    pub moving: bool,
    pub active: bool,
    pub res_scale: f32,
    /// Sample budget; `None` means unbounded (no `frame` index set).
    pub max: Option<u32>,
}

/// What a tick did, for callers (e.g. the CLI runner) deciding whether to
/// schedule another tick or present the final frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep scheduling ticks.
    Continue,
    /// `pingpong >= max` and a frame index is set: upload/save and stop.
    Done,
}

impl RenderLoop {
    pub fn new(max: Option<u32>) -> Self {
        Self {
            pingpong: 0,
            dirty: false,
            moving: false,
            active: true,
            res_scale: 1.0,
            max,
        }
    }

    /// Mark the accumulator dirty: invalidated by camera pose, lens, FOV, or
    /// env-rotation changes (§4.7 invalidation sources).
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Run one tick of the five-step algorithm (§4.7).
    pub fn tick(&mut self, presenter: &mut dyn FramePresenter, frame_index_set: bool) -> TickOutcome {
        // Step 1.
        self.res_scale = if self.moving { 0.25 } else { 1.0 };

        // Step 2.
        if let Some(max) = self.max {
            if self.pingpong <= max && self.active {
                presenter.draw_camera();
                presenter.draw_tracer(self.pingpong, self.res_scale);
                self.pingpong += 1;
            }
        }

        // Step 3.
        presenter.draw_quad(self.pingpong, self.res_scale);

        // Step 4. Clearing while moving is skipped; the 0.25x-resolution
        // overwrite on the next still frame supersedes it (§9 open question).
        if self.dirty {
            if !self.moving {
                presenter.clear_accumulators();
                self.pingpong = 0;
            }
            self.dirty = false;
        }

        // Step 5.
        match self.max {
            Some(max) if self.pingpong >= max && frame_index_set => TickOutcome::Done,
            _ => TickOutcome::Continue,
        }
    }
}
