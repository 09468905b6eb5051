//! The frame loop: a two-state machine that drains input, advances the
//! animation angle and draws one triangle per iteration.

use log::{debug, info};

use crate::error::HarnessError;
use crate::math::Mat4x4;
use crate::system::{IoEvents, Key};

/// Angle added to [`FrameState`] on every drawn frame, in radians.
pub const ROTATION_STEP: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Terminal.
    Stopped,
}

/// Per-frame animation state. Only the loop advances it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameState {
    angle: f64,
    frames: u64,
}

impl FrameState {
    fn advance(&mut self, step: f64) {
        self.angle += step;
        self.frames += 1;
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Computes the transform uploaded before each draw.
pub type TransformHook = Box<dyn FnMut(&FrameState) -> Mat4x4>;

/// Rotation about Z by the current angle.
pub fn z_rotation() -> TransformHook {
    Box::new(|frame: &FrameState| Mat4x4::rotation_z(frame.angle() as f32))
}

/// What the loop drives each iteration: an input source and a surface
/// that can draw the triangle.
pub trait FrameBackend {
    /// Every event pending right now. Must not block.
    fn poll_events(&mut self) -> Vec<IoEvents>;
    fn clear(&mut self);
    fn upload_transform(&mut self, transform: &Mat4x4) -> Result<(), HarnessError>;
    fn draw_triangle(&mut self) -> Result<(), HarnessError>;
    fn present(&mut self);
}

pub struct FrameLoop {
    state: LoopState,
    frame: FrameState,
    step: f64,
    transform: Option<TransformHook>,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(ROTATION_STEP)
    }
}

impl FrameLoop {
    pub fn new(step: f64) -> FrameLoop {
        debug_assert!(step > 0.0);
        FrameLoop {
            state: LoopState::Running,
            frame: FrameState::default(),
            step,
            transform: None,
        }
    }

    pub fn with_transform(mut self, hook: TransformHook) -> FrameLoop {
        self.transform = Some(hook);
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frame(&self) -> &FrameState {
        &self.frame
    }

    /// Applies one input event. Quit and Escape stop the loop; everything
    /// else is ignored.
    pub fn handle_event(&mut self, event: &IoEvents) {
        match event {
            IoEvents::Quit | IoEvents::KeyDown(Key::Escape) => {
                if self.state == LoopState::Running {
                    debug!("stop requested by {event:?}");
                }
                self.state = LoopState::Stopped;
            }
            _ => {}
        }
    }

    /// Runs one iteration. Once stopped, the backend is never touched again.
    pub fn step<B: FrameBackend>(&mut self, backend: &mut B) -> Result<LoopState, HarnessError> {
        if self.state == LoopState::Stopped {
            return Ok(LoopState::Stopped);
        }

        for event in backend.poll_events() {
            self.handle_event(&event);
        }
        if self.state == LoopState::Stopped {
            return Ok(LoopState::Stopped);
        }

        self.frame.advance(self.step);
        if let Some(hook) = self.transform.as_mut() {
            let transform = hook(&self.frame);
            backend.upload_transform(&transform)?;
        }

        backend.clear();
        backend.draw_triangle()?;
        backend.present();

        Ok(self.state)
    }

    /// Steps until stopped. Returns the number of frames drawn.
    pub fn run<B: FrameBackend>(&mut self, backend: &mut B) -> Result<u64, HarnessError> {
        info!("entering frame loop");
        while self.step(backend)? == LoopState::Running {}
        info!(
            "frame loop stopped after {} frames (angle {:.3})",
            self.frame.frames(),
            self.frame.angle()
        );
        Ok(self.frame.frames())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Poll,
        Clear,
        Upload(Mat4x4),
        Draw,
        Present,
    }

    /// Replays one batch of events per poll; an exhausted script polls empty.
    #[derive(Default)]
    struct ScriptedBackend {
        script: VecDeque<Vec<IoEvents>>,
        calls: Vec<Call>,
    }

    impl ScriptedBackend {
        fn new(script: Vec<Vec<IoEvents>>) -> Self {
            ScriptedBackend {
                script: script.into(),
                calls: Vec::new(),
            }
        }

        fn count(&self, call: &Call) -> usize {
            self.calls.iter().filter(|c| *c == call).count()
        }

        fn uploads(&self) -> Vec<Mat4x4> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Upload(m) => Some(*m),
                    _ => None,
                })
                .collect()
        }
    }

    impl FrameBackend for ScriptedBackend {
        fn poll_events(&mut self) -> Vec<IoEvents> {
            self.calls.push(Call::Poll);
            self.script.pop_front().unwrap_or_default()
        }

        fn clear(&mut self) {
            self.calls.push(Call::Clear);
        }

        fn upload_transform(&mut self, transform: &Mat4x4) -> Result<(), HarnessError> {
            self.calls.push(Call::Upload(*transform));
            Ok(())
        }

        fn draw_triangle(&mut self) -> Result<(), HarnessError> {
            self.calls.push(Call::Draw);
            Ok(())
        }

        fn present(&mut self) {
            self.calls.push(Call::Present);
        }
    }

    fn quiet_frames(n: usize) -> Vec<Vec<IoEvents>> {
        vec![Vec::new(); n]
    }

    #[test]
    fn frame_without_hook_draws_and_presents() {
        let mut backend = ScriptedBackend::default();
        let mut frame_loop = FrameLoop::default();

        assert_eq!(frame_loop.step(&mut backend).unwrap(), LoopState::Running);
        assert_eq!(
            backend.calls,
            vec![Call::Poll, Call::Clear, Call::Draw, Call::Present]
        );
    }

    #[test]
    fn hook_uploads_transform_before_drawing() {
        let mut backend = ScriptedBackend::default();
        let mut frame_loop = FrameLoop::new(0.5).with_transform(z_rotation());

        frame_loop.step(&mut backend).unwrap();
        assert_eq!(
            backend.calls,
            vec![
                Call::Poll,
                Call::Upload(Mat4x4::rotation_z(0.5)),
                Call::Clear,
                Call::Draw,
                Call::Present
            ]
        );
    }

    #[test]
    fn quit_stops_within_the_same_iteration() {
        let mut script = quiet_frames(3);
        script.push(vec![IoEvents::Quit]);
        let mut backend = ScriptedBackend::new(script);
        let mut frame_loop = FrameLoop::default();

        let frames = frame_loop.run(&mut backend).unwrap();

        assert_eq!(frames, 3);
        assert_eq!(frame_loop.state(), LoopState::Stopped);
        assert_eq!(backend.count(&Call::Draw), 3);
        assert_eq!(backend.calls.last(), Some(&Call::Poll));
    }

    #[test]
    fn escape_behaves_like_quit() {
        let mut script = quiet_frames(2);
        script.push(vec![IoEvents::KeyDown(Key::Escape)]);
        let mut backend = ScriptedBackend::new(script);

        let frames = FrameLoop::default().run(&mut backend).unwrap();

        assert_eq!(frames, 2);
        assert_eq!(backend.count(&Call::Draw), 2);
    }

    #[test]
    fn other_events_are_ignored() {
        let script = vec![
            vec![
                IoEvents::KeyDown(Key::Other),
                IoEvents::KeyUp(Key::Escape),
                IoEvents::Other,
            ],
            vec![IoEvents::Quit],
        ];
        let mut backend = ScriptedBackend::new(script);

        let frames = FrameLoop::default().run(&mut backend).unwrap();
        assert_eq!(frames, 1);
    }

    #[test]
    fn whole_queue_is_drained_before_rendering() {
        let script = vec![vec![
            IoEvents::Other,
            IoEvents::Quit,
            IoEvents::KeyDown(Key::Other),
        ]];
        let mut backend = ScriptedBackend::new(script);

        let frames = FrameLoop::default().run(&mut backend).unwrap();
        assert_eq!(frames, 0);
        assert_eq!(backend.calls, vec![Call::Poll]);
    }

    #[test]
    fn stopped_loop_never_touches_backend() {
        let mut backend = ScriptedBackend::new(vec![vec![IoEvents::Quit]]);
        let mut frame_loop = FrameLoop::default();
        frame_loop.run(&mut backend).unwrap();
        let calls = backend.calls.len();

        for _ in 0..5 {
            assert_eq!(frame_loop.step(&mut backend).unwrap(), LoopState::Stopped);
        }
        assert_eq!(backend.calls.len(), calls);
    }

    #[test]
    fn uploaded_angles_follow_frame_state() {
        let mut script = quiet_frames(3);
        script.push(vec![IoEvents::Quit]);
        let mut backend = ScriptedBackend::new(script);
        let mut frame_loop = FrameLoop::new(0.25).with_transform(z_rotation());

        frame_loop.run(&mut backend).unwrap();

        let expected: Vec<Mat4x4> = [0.25f32, 0.5, 0.75]
            .iter()
            .map(|a| Mat4x4::rotation_z(*a))
            .collect();
        assert_eq!(backend.uploads(), expected);
    }

    #[test]
    fn draw_error_propagates() {
        struct Broken;
        impl FrameBackend for Broken {
            fn poll_events(&mut self) -> Vec<IoEvents> {
                Vec::new()
            }
            fn clear(&mut self) {}
            fn upload_transform(&mut self, _: &Mat4x4) -> Result<(), HarnessError> {
                Ok(())
            }
            fn draw_triangle(&mut self) -> Result<(), HarnessError> {
                Err(HarnessError::Gl {
                    code: 0x0502,
                    context: "glDrawArrays",
                })
            }
            fn present(&mut self) {}
        }

        let err = FrameLoop::default().run(&mut Broken).unwrap_err();
        assert!(matches!(err, HarnessError::Gl { code: 0x0502, .. }));
    }

    proptest! {
        #[test]
        fn angle_strictly_increases_by_step(step in 1e-4f64..1.0, frames in 1usize..200) {
            let mut script = quiet_frames(frames);
            script.push(vec![IoEvents::Quit]);
            let mut backend = ScriptedBackend::new(script);
            let mut frame_loop = FrameLoop::new(step);

            let mut previous = frame_loop.frame().angle();
            while frame_loop.step(&mut backend).unwrap() == LoopState::Running {
                let angle = frame_loop.frame().angle();
                prop_assert!(angle > previous);
                prop_assert!((angle - previous - step).abs() < 1e-9);
                previous = angle;
            }
            prop_assert_eq!(frame_loop.frame().frames(), frames as u64);
        }
    }
}
