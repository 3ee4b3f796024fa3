use crate::config::ClipOptions;
use crate::points::{Point, Size};
use crate::surface::PathSink;
use serde::{Deserialize, Serialize};

/// Shape the rendered image is clipped to.
///
/// Named shapes are laid out relative to the canvas; polygons use the
/// coordinates they were given, in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipShape {
    /// Circle centred on the canvas, diameter = shorter canvas side
    Circle,
    /// Apex at top-centre, base along the bottom edge
    Triangle,
    /// Rhombus through the midpoints of the four canvas edges
    Diamond,
    /// Closed polygon, first point is the move target
    Polygon(Vec<Point>),
}

impl ClipShape {
    /// Resolve user-facing clip options. Unknown names and empty point lists mean no clip.
    pub fn resolve(options: &ClipOptions) -> Option<ClipShape> {
        match options {
            ClipOptions::Named(name) => match name.as_str() {
                "circle" => Some(ClipShape::Circle),
                "triangle" => Some(ClipShape::Triangle),
                "diamond" => Some(ClipShape::Diamond),
                other => {
                    log::warn!("Unknown clip shape '{}', clipping disabled", other);
                    None
                }
            },
            ClipOptions::Points(points) if points.is_empty() => None,
            ClipOptions::Points(points) => Some(ClipShape::Polygon(
                points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            )),
        }
    }

    /// Issue the path commands for this shape on a canvas of `canvas` size.
    pub fn trace<P: PathSink + ?Sized>(&self, canvas: Size, sink: &mut P) -> Result<(), P::Error> {
        let (w, h) = (canvas.width, canvas.height);
        match self {
            ClipShape::Circle => {
                sink.circle(canvas.center(), canvas.min_side() / 2.0)?;
                sink.close_path();
            }
            ClipShape::Triangle => polygon(
                sink,
                &[Point::new(w / 2.0, 0.0), Point::new(w, h), Point::new(0.0, h)],
            ),
            ClipShape::Diamond => polygon(
                sink,
                &[
                    Point::new(w / 2.0, 0.0),
                    Point::new(w, h / 2.0),
                    Point::new(w / 2.0, h),
                    Point::new(0.0, h / 2.0),
                ],
            ),
            ClipShape::Polygon(points) => polygon(sink, points),
        }
        Ok(())
    }
}

fn polygon<P: PathSink + ?Sized>(sink: &mut P, points: &[Point]) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    sink.move_to(*first);
    for point in rest {
        sink.line_to(*point);
    }
    sink.close_path();
}
