use std::time::Duration;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use tracing::info;

use smoothscroll_core::{
    engine::{Anchor, AnchorPosition, Axis, DivisorClass},
    AppConfig, ScrollEngine, ScrollRequest, StepPolicy, Surface, SurfaceHost, SurfaceId,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    Divided,
    Capped,
}

impl From<PolicyArg> for StepPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Divided => StepPolicy::Divided,
            PolicyArg::Capped => StepPolicy::Capped,
        }
    }
}

pub struct SimulateOptions {
    pub distance: f64,
    pub divisor: Option<f64>,
    pub policy: Option<PolicyArg>,
    pub cap: Option<f64>,
    pub bound: Option<f64>,
    pub json: bool,
    pub realtime: bool,
}

/// One animation frame as printed by the simulator
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    pub frame: usize,
    pub step: f64,
    pub offset: f64,
    pub pending: f64,
}

/// Vertical-only surface with no renderer behind it
struct HeadlessSurface {
    id: SurfaceId,
    offset: f64,
    bound: Option<f64>,
    ended: bool,
}

impl HeadlessSurface {
    fn new(bound: Option<f64>) -> Self {
        Self {
            id: SurfaceId::new(),
            offset: 0.0,
            bound,
            ended: false,
        }
    }
}

impl Surface for HeadlessSurface {
    fn scroll_offset(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Y => self.offset,
            Axis::X => 0.0,
        }
    }

    fn set_scroll_offset(&mut self, axis: Axis, value: f64) -> smoothscroll_core::Result<bool> {
        if axis == Axis::X {
            return Ok(false);
        }
        let upper = self.bound.unwrap_or(f64::INFINITY);
        let clamped = value.clamp(0.0, upper.max(0.0));
        let changed = clamped != self.offset;
        self.offset = clamped;
        Ok(changed)
    }

    fn request_visual_update(&mut self) {}

    fn measure_anchor(&self, anchor: Anchor) -> AnchorPosition {
        AnchorPosition {
            top: anchor.row as f64 * self.line_height(),
        }
    }

    fn viewport_height(&self) -> f64 {
        600.0
    }

    fn line_height(&self) -> f64 {
        16.0
    }

    fn autoscroll_margin(&self) -> f64 {
        2.0
    }

    fn on_animation_ended(&mut self) {
        self.ended = true;
    }
}

impl SurfaceHost for HeadlessSurface {
    fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut dyn Surface> {
        if id == self.id {
            Some(self)
        } else {
            None
        }
    }
}

/// Drive one request to completion, handing each frame to `emit`
async fn drive<F>(
    config: &AppConfig,
    options: &SimulateOptions,
    mut emit: F,
) -> Result<(usize, HeadlessSurface)>
where
    F: FnMut(&FrameRecord) -> Result<()>,
{
    let mut scroll = config.scroll.clone();
    if let Some(policy) = options.policy {
        scroll.step_policy = policy.into();
    }
    if let Some(cap) = options.cap {
        scroll.max_step = cap;
    }
    scroll.validate()?;

    let mut engine = ScrollEngine::new(scroll);
    let mut surface = HeadlessSurface::new(options.bound);
    let id = surface.id;

    let mut request = ScrollRequest::relative_y(options.distance);
    if let Some(divisor) = options.divisor {
        request = request.with_divisor(DivisorClass::Explicit(divisor));
    }
    engine.submit(&mut surface, id, request)?;

    let mut ticker = options.realtime.then(|| {
        let fps = config.ui.animation_fps.max(1) as u64;
        tokio::time::interval(Duration::from_millis((1000 / fps).max(1)))
    });

    let mut frames = 0;
    while engine.needs_update() {
        if let Some(ticker) = ticker.as_mut() {
            ticker.tick().await;
        }
        let before = surface.offset;
        engine.pump(&mut surface);
        frames += 1;
        emit(&FrameRecord {
            frame: frames,
            step: surface.offset - before,
            offset: surface.offset,
            pending: engine.pending(id, Axis::Y),
        })?;
    }

    Ok((frames, surface))
}

pub async fn run(config: &AppConfig, options: SimulateOptions) -> Result<()> {
    let json = options.json;
    let (frames, surface) = drive(config, &options, |record| {
        if json {
            println!("{}", serde_json::to_string(record)?);
        } else {
            println!(
                "frame {:>4}  step {:>8.0}  offset {:>8.0}  pending {:>8.0}",
                record.frame, record.step, record.offset, record.pending
            );
        }
        Ok(())
    })
    .await?;

    info!(frames, offset = surface.offset, "Simulation finished");
    if !json {
        println!(
            "\n{} frames, final offset {:.0} of {:.0} requested{}",
            frames,
            surface.offset,
            options.distance,
            if surface.ended { "" } else { " (no animation ran)" }
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(distance: f64) -> SimulateOptions {
        SimulateOptions {
            distance,
            divisor: None,
            policy: None,
            cap: None,
            bound: None,
            json: false,
            realtime: false,
        }
    }

    async fn collect(options: SimulateOptions) -> (Vec<FrameRecord>, HeadlessSurface) {
        let config = AppConfig::default();
        let mut records = Vec::new();
        let (_, surface) = drive(&config, &options, |r| {
            records.push(r.clone());
            Ok(())
        })
        .await
        .unwrap();
        (records, surface)
    }

    #[tokio::test]
    async fn test_divided_run_converges() {
        let (records, surface) = collect(options(700.0)).await;
        assert_eq!(records[0].step, 100.0);
        assert!(records.windows(2).all(|w| w[1].step <= w[0].step));
        // Starting from rest adds the divisor - 1 bonus
        assert!(surface.offset > 699.0 && surface.offset <= 706.0);
        assert!(surface.ended);
        assert_eq!(records.last().unwrap().pending, 0.0);
    }

    #[tokio::test]
    async fn test_capped_policy_limits_steps() {
        let mut opts = options(1000.0);
        opts.policy = Some(PolicyArg::Capped);
        opts.cap = Some(36.0);
        let (records, surface) = collect(opts).await;
        assert!(records.iter().all(|r| r.step.abs() <= 36.0));
        assert!(surface.offset > 993.0);
    }

    #[tokio::test]
    async fn test_bound_stops_early() {
        let mut opts = options(1000.0);
        opts.bound = Some(150.0);
        let (records, surface) = collect(opts).await;
        assert_eq!(surface.offset, 150.0);
        assert_eq!(records.last().unwrap().step, 0.0);
        assert!(records.len() < 10);
    }

    #[tokio::test]
    async fn test_invalid_divisor_is_rejected() {
        let mut opts = options(100.0);
        opts.divisor = Some(0.5);
        let config = AppConfig::default();
        assert!(drive(&config, &opts, |_| Ok(())).await.is_err());
    }

    #[tokio::test]
    async fn test_non_finite_distance_is_rejected() {
        let config = AppConfig::default();
        for distance in [f64::INFINITY, f64::NAN] {
            let mut frames = 0;
            let result = drive(&config, &options(distance), |_| {
                frames += 1;
                Ok(())
            })
            .await;
            assert!(result.is_err());
            assert_eq!(frames, 0);
        }
    }

    #[test]
    fn test_frame_record_json() {
        let record = FrameRecord {
            frame: 1,
            step: 100.0,
            offset: 100.0,
            pending: 600.0,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"frame":1,"step":100.0,"offset":100.0,"pending":600.0}"#);
    }
}
