pub mod easing;

use std::time::Duration;

use cgmath::{Matrix2, SquareMatrix};
use easing::{Easing, RateFunc};

use crate::error::RenderError;
use crate::request::TransformMatrix;
use crate::scene::{DrawableVector, SceneBackend, SceneOptions};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Moves everything from `from` to `to`, where `to = matrix * from`.
    ApplyMatrix {
        matrix: TransformMatrix,
        from: Matrix2<f32>,
        to: Matrix2<f32>,
        run_time: f32,
        rate_func: RateFunc,
    },
    Wait { duration: f32 },
}

impl Segment {
    pub fn duration(&self) -> f32 {
        match self {
            Segment::ApplyMatrix { run_time, .. } => *run_time,
            Segment::Wait { duration } => *duration,
        }
    }

    /// Matrix at local time `t`, in seconds since the segment started.
    fn matrix_at(&self, t: f32, held: Matrix2<f32>) -> Matrix2<f32> {
        match *self {
            Segment::ApplyMatrix {
                from,
                to,
                run_time,
                rate_func,
                ..
            } => {
                let progress = if run_time > 0.0 { t / run_time } else { 1.0 };
                let alpha = rate_func.ease(progress);
                from + (to - from) * alpha
            }
            Segment::Wait { .. } => held,
        }
    }

    /// Matrix left on screen once the segment is over. Rate functions that
    /// return to the start, like `there_and_back`, end on `from`.
    pub fn end_matrix(&self, held: Matrix2<f32>) -> Matrix2<f32> {
        self.matrix_at(self.duration(), held)
    }
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub index: usize,
    pub time: f32,
    pub matrix: Matrix2<f32>,
}

/// A recorded scene: its options, its vectors, and what happens to them.
#[derive(Debug, Clone)]
pub struct Timeline {
    options: SceneOptions,
    configured: bool,
    vectors: Vec<DrawableVector>,
    segments: Vec<Segment>,
    current: Matrix2<f32>,
    transform_run_time: f32,
    rate_func: RateFunc,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(1.0, RateFunc::default())
    }
}

impl Timeline {
    pub fn new(transform_run_time: f32, rate_func: RateFunc) -> Self {
        Self {
            options: SceneOptions::default(),
            configured: false,
            vectors: Vec::new(),
            segments: Vec::new(),
            current: Matrix2::identity(),
            transform_run_time,
            rate_func,
        }
    }

    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn vectors(&self) -> &[DrawableVector] {
        &self.vectors
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True until anything at all has been recorded.
    pub fn is_empty(&self) -> bool {
        !self.configured && self.vectors.is_empty() && self.segments.is_empty()
    }

    /// The transforms requested so far, in order.
    pub fn requested_transforms(&self) -> impl Iterator<Item = &TransformMatrix> {
        self.segments.iter().filter_map(|s| match s {
            Segment::ApplyMatrix { matrix, .. } => Some(matrix),
            Segment::Wait { .. } => None,
        })
    }

    /// The matrix the timeline ends on.
    pub fn final_matrix(&self) -> Matrix2<f32> {
        self.current
    }

    pub fn duration(&self) -> f32 {
        self.segments.iter().map(Segment::duration).sum()
    }

    pub fn frame_count(&self, fps: u32) -> usize {
        ((self.duration() * fps as f32).ceil() as usize).max(1)
    }

    /// Matrix at time `t`. Times past the end clamp to the final state.
    pub fn sample(&self, t: f32) -> Matrix2<f32> {
        let mut start = 0.0;
        let mut held = Matrix2::identity();
        for segment in &self.segments {
            let end = start + segment.duration();
            if t < end {
                return segment.matrix_at((t - start).max(0.0), held);
            }
            held = segment.end_matrix(held);
            start = end;
        }
        held
    }

    pub fn frames(&self, fps: u32) -> impl Iterator<Item = FrameState> + '_ {
        let fps = fps.max(1);
        (0..self.frame_count(fps)).map(move |index| {
            let time = index as f32 / fps as f32;
            FrameState {
                index,
                time,
                matrix: self.sample(time),
            }
        })
    }

    pub fn last_frame(&self, fps: u32) -> FrameState {
        let index = self.frame_count(fps) - 1;
        let time = self.duration();
        FrameState {
            index,
            time,
            matrix: self.sample(time),
        }
    }
}

impl SceneBackend for Timeline {
    fn configure(&mut self, options: &SceneOptions) {
        self.options = *options;
        self.configured = true;
    }

    fn register_vector(&mut self, vector: DrawableVector) {
        self.vectors.push(vector);
    }

    fn apply_transform(&mut self, matrix: &TransformMatrix) {
        let from = self.current;
        let segment = Segment::ApplyMatrix {
            matrix: *matrix,
            from,
            to: matrix.to_cgmath() * from,
            run_time: self.transform_run_time,
            rate_func: self.rate_func,
        };
        self.current = segment.end_matrix(from);
        self.segments.push(segment);
    }

    fn hold(&mut self, duration: Duration) {
        self.segments.push(Segment::Wait {
            duration: duration.as_secs_f32(),
        });
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        log::debug!(
            "timeline recorded: {} vector(s), {} segment(s), {:.2}s",
            self.vectors.len(),
            self.segments.len(),
            self.duration()
        );
        Ok(())
    }
}
