use egui::{Color32, Painter, Pos2, Rect, Sense, Stroke, Ui, Vec2};

use crate::core::analyzer::Analyzer;
use crate::core::visualization::{RenderLoop, Schedule, Surface};

/// Adapts an egui painter region to the render loop's drawing surface
pub struct PainterSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
    stroke: Stroke,
    background: Color32,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self {
            painter,
            rect,
            stroke: Stroke::new(1.5, Color32::from_rgb(0, 188, 212)),
            background: Color32::from_gray(18),
        }
    }
}

impl Surface for PainterSurface<'_> {
    fn size(&self) -> [f32; 2] {
        [self.rect.width(), self.rect.height()]
    }

    fn clear(&mut self) {
        self.painter.rect_filled(self.rect, 4.0, self.background);
    }

    fn stroke_polyline(&mut self, points: &[[f32; 2]]) {
        let origin = self.rect.min;
        let path: Vec<Pos2> = points
            .iter()
            .map(|[x, y]| origin + Vec2::new(*x, *y))
            .collect();
        self.painter.line(path, self.stroke);
    }
}

/// Draw one oscilloscope tick into a fixed-size region
pub fn show_oscilloscope(
    ui: &mut Ui,
    size: [f32; 2],
    render_loop: &mut RenderLoop,
    analyzer: &Analyzer,
) -> Schedule {
    let (response, painter) = ui.allocate_painter(Vec2::new(size[0], size[1]), Sense::hover());
    let mut surface = PainterSurface::new(&painter, response.rect);
    render_loop.tick(analyzer, &mut surface)
}
