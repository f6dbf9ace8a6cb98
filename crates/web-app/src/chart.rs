use plotters::{
    chart::ChartBuilder,
    prelude::{Circle, IntoDrawingArea, SVGBackend},
    series::LineSeries,
    style::{Color, IntoFont, Palette, Palette99, RGBColor, TextStyle, WHITE},
};
use repbook_domain::{Metric, Time};

use crate::Theme;

pub const COLOR_REPS: usize = 4;
pub const COLOR_WEIGHT: usize = 8;
pub const COLOR_TIME: usize = 5;

pub const OPACITY_LINE: f64 = 0.9;
pub const OPACITY_POINT: f64 = 1.0;

pub const WIDTH_LINE: u32 = 2;
pub const SIZE_POINT: u32 = 3;

pub const HEIGHT: u32 = 200;

pub const FONT: (&str, u32) = ("Roboto", 11);

#[derive(Clone, Copy, Debug, PartialEq)]
struct Bounds {
    min: f32,
    max: f32,
}

impl Bounds {
    fn from_values(values: &[(usize, f32)]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(Self {
            min: values.iter().map(|(_, v)| *v).fold(f32::MAX, f32::min),
            max: values.iter().map(|(_, v)| *v).fold(f32::MIN, f32::max),
        })
    }

    fn min_with_margin(self) -> f32 {
        if self.min <= f32::EPSILON {
            return self.min;
        }
        f32::max(self.min - self.margin(), 0.0)
    }

    fn max_with_margin(self) -> f32 {
        self.max + self.margin()
    }

    fn margin(self) -> f32 {
        if (self.max - self.min).abs() > f32::EPSILON {
            return (self.max - self.min) * 0.1;
        }
        if self.max.abs() > f32::EPSILON {
            return self.max.abs() * 0.1;
        }
        0.1
    }
}

/// Plot the progress of a metric as line with point markers.
///
/// The series consists of (index, value) pairs in storage order, with times
/// given in seconds. Values of time series are labeled as `m:ss`. Returns
/// `None` if the series is empty.
#[allow(clippy::missing_errors_doc)]
pub fn plot_progress(
    metric: Metric,
    series: impl IntoIterator<Item = (usize, f32)>,
    width: u32,
    theme: &Theme,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let values = series.into_iter().collect::<Vec<_>>();

    let Some(bounds) = Bounds::from_values(&values) else {
        return Ok(None);
    };

    let last_index = values.iter().map(|(i, _)| *i).max().unwrap_or_default();
    let series_color = Palette99::pick(metric_color(metric));
    let mut result = String::new();

    {
        let root = SVGBackend::with_string(&mut result, (width, HEIGHT)).into_drawing_area();
        let (color, background_color) = colors(theme);

        root.fill(&background_color)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10f32)
            .x_label_area_size(30f32)
            .y_label_area_size(40f32)
            .build_cartesian_2d(
                0..usize::max(last_index, 1),
                bounds.min_with_margin()..bounds.max_with_margin(),
            )?;

        let y_label_formatter = |y: &f32| y_label(metric, *y);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .set_all_tick_mark_size(3u32)
            .axis_style(color.mix(0.3))
            .bold_line_style(color.mix(0.05))
            .light_line_style(color.mix(0.0))
            .label_style(TextStyle::from(FONT.into_font()).color(&color))
            .x_labels(usize::min(values.len(), 10))
            .x_label_formatter(&|x| format!("{}", x + 1))
            .y_labels(6)
            .y_label_formatter(&y_label_formatter)
            .draw()?;

        chart.draw_series(LineSeries::new(
            values.iter().copied(),
            series_color.mix(OPACITY_LINE).stroke_width(WIDTH_LINE),
        ))?;

        chart.draw_series(values.iter().map(|(x, y)| {
            Circle::new(
                (*x, *y),
                SIZE_POINT,
                series_color.mix(OPACITY_POINT).filled(),
            )
        }))?;

        root.present()?;
    }

    Ok(Some(result))
}

fn metric_color(metric: Metric) -> usize {
    match metric {
        Metric::Reps => COLOR_REPS,
        Metric::Weight => COLOR_WEIGHT,
        Metric::Time => COLOR_TIME,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn y_label(metric: Metric, value: f32) -> String {
    match metric {
        Metric::Time => Time::from_seconds(value.max(0.0).round() as u32).to_string(),
        Metric::Reps | Metric::Weight => format!("{value}"),
    }
}

fn colors(theme: &Theme) -> (RGBColor, RGBColor) {
    let dark = RGBColor(20, 22, 26);
    match theme {
        Theme::System | Theme::Light => (dark, WHITE),
        Theme::Dark => (WHITE, dark),
    }
}
