// Pushes the occupancy window to the chart widget
use crate::application::surfaces::ChartSurface;
use crate::domain::time_series::Series;
use std::sync::Arc;

#[derive(Clone)]
pub struct ChartRenderer {
    surface: Option<Arc<dyn ChartSurface>>,
}

impl ChartRenderer {
    pub fn new(surface: Option<Arc<dyn ChartSurface>>) -> Self {
        Self { surface }
    }

    /// Replace the displayed series and redraw. Does nothing on pages without a chart.
    pub fn render(&self, series: &Series) {
        if let Some(chart) = &self.surface {
            chart.replace_series(series);
            chart.redraw();
        }
    }
}
