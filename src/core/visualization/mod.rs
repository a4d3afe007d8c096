//! Oscilloscope render loop driven by the display refresh

use crate::core::analyzer::{Analyzer, SampleFrame, FRAME_SIZE, SILENCE_BYTE};
use crate::core::oscillator::Waveform;

/// Default drawable size in pixels
pub const DEFAULT_SURFACE_SIZE: [f32; 2] = [800.0, 200.0];

/// A fixed-size 2D region the loop draws into
pub trait Surface {
    /// Width and height in pixels
    fn size(&self) -> [f32; 2];
    fn clear(&mut self);
    /// Stroke one connected line through `points`, given in surface pixels
    fn stroke_polyline(&mut self, points: &[[f32; 2]]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// What the host should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Request another tick at the next display refresh
    NextFrame,
    Done,
}

/// Map a frame onto a polyline spanning `width` x `height`.
///
/// Sample `i` sits at `x = i * width / len`; amplitude byte `b` at
/// `y = b / 255 * height`, so silence is a flat line through the middle.
pub fn trace_points(frame: &[u8], width: f32, height: f32, points: &mut Vec<[f32; 2]>) {
    points.clear();
    if frame.is_empty() {
        return;
    }
    let step = width / frame.len() as f32;
    points.extend(
        frame
            .iter()
            .enumerate()
            .map(|(i, byte)| [i as f32 * step, *byte as f32 / 255.0 * height]),
    );
}

/// Static preview of a waveform shape over `cycles` periods, as (phase, amplitude)
pub fn waveform_preview(waveform: Waveform, cycles: f32, points: usize) -> Vec<[f32; 2]> {
    (0..points)
        .map(|i| {
            let x = i as f32 / points as f32;
            [x, waveform.sample((x * cycles) % 1.0)]
        })
        .collect()
}

/// Perpetual sampling task: every tick reads the analyzer and redraws the
/// trace. It never stops on its own.
pub struct RenderLoop {
    state: LoopState,
    frame: SampleFrame,
    points: Vec<[f32; 2]>,
    ticks: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Running,
            frame: vec![SILENCE_BYTE; FRAME_SIZE],
            points: Vec::with_capacity(FRAME_SIZE),
            ticks: 0,
        }
    }

    /// Run one iteration: sample, clear, draw, reschedule
    pub fn tick<S: Surface>(&mut self, analyzer: &Analyzer, surface: &mut S) -> Schedule {
        if self.state == LoopState::Stopped {
            return Schedule::Done;
        }

        analyzer.fill_frame(&mut self.frame);
        surface.clear();

        let [width, height] = surface.size();
        trace_points(&self.frame, width, height, &mut self.points);
        surface.stroke_polyline(&self.points);

        self.ticks += 1;
        Schedule::NextFrame
    }

    /// Cancel the loop; later ticks draw nothing
    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
    }

    #[cfg(test)]
    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The frame sampled on the most recent tick
    #[cfg(test)]
    pub fn last_frame(&self) -> &[u8] {
        &self.frame
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}
