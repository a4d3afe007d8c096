use egui::{Color32, Response, Ui};
use egui_plot::{Line, Plot, PlotPoints};

const LINE_COLOR: Color32 = Color32::from_rgb(0, 188, 212);

/// Small non-interactive line plot, used for the waveform shape preview
pub struct WaveformPlot {
    points: Vec<[f32; 2]>,
    height: f32,
}

impl WaveformPlot {
    pub fn new(points: Vec<[f32; 2]>) -> Self {
        Self {
            points,
            height: 100.0,
        }
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn show(self, ui: &mut Ui, id_source: impl std::hash::Hash) -> Response {
        let plot = Plot::new(id_source)
            .height(self.height)
            .show_x(false)
            .show_y(false)
            .show_axes(false)
            .include_y(-1.1)
            .include_y(1.1)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false);

        plot.show(ui, |plot_ui| {
            let plot_points = PlotPoints::from_iter(
                self.points.iter().map(|[x, y]| [*x as f64, *y as f64])
            );

            plot_ui.line(Line::new(plot_points).color(LINE_COLOR));
        })
        .response
    }
}
