use cairo::{Context, LineCap, Operator};
use dial::render::DrawCommand;
use palette::Srgba;
use std::f64::consts::PI;

/// Paints the dial. Everything goes through a group so the thumb hole only erases the dial,
/// not whatever the widget sits on.
pub fn draw(cr: &Context, commands: &[DrawCommand]) -> Result<(), cairo::Error> {
    cr.push_group();
    cr.set_line_cap(LineCap::Round);
    for command in commands {
        execute(cr, command)?;
    }
    cr.pop_group_to_source()?;
    cr.paint()
}

fn execute(cr: &Context, command: &DrawCommand) -> Result<(), cairo::Error> {
    match *command {
        DrawCommand::Arc {
            center,
            radius,
            start_deg,
            sweep_deg,
            stroke,
            color,
        } => {
            // cairo turns an empty arc with round caps into a dot
            if sweep_deg <= 0.0 || radius <= 0.0 {
                return Ok(());
            }
            set_source(cr, color);
            cr.set_line_width(stroke);
            cr.new_path();
            cr.arc(
                center.x,
                center.y,
                radius,
                start_deg.to_radians(),
                (start_deg + sweep_deg).to_radians(),
            );
            cr.stroke()
        }
        DrawCommand::Circle {
            center,
            radius,
            color,
            clear,
        } => {
            cr.save()?;
            if clear {
                cr.set_operator(Operator::Clear);
            } else {
                set_source(cr, color);
            }
            cr.new_path();
            cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
            cr.fill()?;
            cr.restore()
        }
    }
}

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

#[cfg(test)]
mod tests {
    use super::*;
    use dial::control::DialControl;
    use dial::geometry::{Bounds, DialStyle};
    use dial::render::DialPalette;

    fn alpha_at(surface: &mut cairo::ImageSurface, x: usize, y: usize) -> u32 {
        surface.flush();
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let offset = y * stride + x * 4;
        let pixel = u32::from_ne_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]);
        pixel >> 24
    }

    #[test]
    fn test_thumb_hole_is_transparent() {
        let mut control = DialControl::new(0.0, DialStyle::default());
        control.resize(Bounds::new(200.0, 200.0));
        let commands = control.draw_commands(&DialPalette::default());

        let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 200, 200).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            draw(&cr, &commands).unwrap();
        }

        // radius 50 around (100, 100), thumb at the bottom
        assert_eq!(alpha_at(&mut surface, 100, 150), 0);
        assert!(alpha_at(&mut surface, 100, 166) > 200);
        assert!(alpha_at(&mut surface, 100, 50) > 0);
        assert_eq!(alpha_at(&mut surface, 5, 5), 0);
    }
}
