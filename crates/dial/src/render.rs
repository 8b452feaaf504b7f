//! Backend-agnostic drawing of the dial.
//!
//! Angles are in degrees on a y-down surface: 0° points along +x and positive sweeps run
//! clockwise, which is what cairo and most canvas APIs expect.

use crate::control::{FULL_TURN_DEG, SelectionState, TRACK_OFFSET_DEG};
use crate::geometry::{DialStyle, Point};
use palette::Srgba;

/// The hole punched into the thumb is this many times smaller than the thumb.
const THUMB_HOLE_RATIO: f64 = 2.5;

#[derive(Debug, Clone, Copy)]
pub enum DrawCommand {
    Arc {
        center: Point,
        radius: f64,
        start_deg: f64,
        sweep_deg: f64,
        stroke: f64,
        color: Srgba<f64>,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Srgba<f64>,
        /// Erase instead of paint.
        clear: bool,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct DialPalette {
    pub track: Srgba<f64>,
    pub progress: Srgba<f64>,
    pub thumb: Srgba<f64>,
}

impl Default for DialPalette {
    fn default() -> Self {
        let accent = Srgba::new(0.4, 0.314, 0.643, 1.0);
        Self {
            track: Srgba::new(1.0, 1.0, 1.0, 0.25),
            progress: accent,
            thumb: accent,
        }
    }
}

pub fn dial(state: &SelectionState, style: &DialStyle, palette: &DialPalette) -> Vec<DrawCommand> {
    let geometry = &state.geometry;
    let thumb = state.thumb_center();

    vec![
        DrawCommand::Arc {
            center: geometry.center,
            radius: geometry.radius,
            start_deg: TRACK_OFFSET_DEG,
            sweep_deg: FULL_TURN_DEG,
            stroke: style.stroke,
            color: palette.track,
        },
        DrawCommand::Arc {
            center: geometry.center,
            radius: geometry.radius,
            start_deg: TRACK_OFFSET_DEG,
            sweep_deg: state.applied_angle,
            stroke: style.stroke,
            color: palette.progress,
        },
        DrawCommand::Circle {
            center: thumb,
            radius: style.thumb_size,
            color: palette.thumb,
            clear: false,
        },
        DrawCommand::Circle {
            center: thumb,
            radius: style.thumb_size / THUMB_HOLE_RATIO,
            color: palette.thumb,
            clear: true,
        },
    ]
}
