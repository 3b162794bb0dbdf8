use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex};

use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, ImageEncoder};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, register_font};
use sdg_core::{GOAL_COUNT, GOALS, Goal, Prediction};
use tracing::{debug, info, warn};

use crate::{CHART_TITLE, ChartError};

const TITLE_HEIGHT: i32 = 60;
const MARGIN: i32 = 20;
const Y_LABEL_AREA: i32 = 70;
/// Room under the x-axis for the goal icons.
const ICON_AREA: i32 = 150;
const ICON_GAP: i32 = 10;
/// Fraction of each goal's slot covered by its bar.
const BAR_WIDTH: f64 = 0.8;
const BAR_OPACITY: f64 = 0.8;
const Y_TICKS: usize = 5;

/// Fonts tried when none is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Font path → family name registered with plotters.
static FONT_FAMILIES: LazyLock<Mutex<HashMap<PathBuf, String>>> =
    LazyLock::new(Default::default);

#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Directory holding `E_SDG_icons-NN.jpg`. Without it bars get text labels.
    pub icons_dir: Option<PathBuf>,
    /// TrueType/OpenType font for titles and labels. Without one the chart
    /// is drawn with bars, baseline and icons only.
    pub font_path: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            icons_dir: None,
            font_path: None,
            width: 1500,
            height: 800,
        }
    }
}

impl ChartOptions {
    pub fn with_icons_dir(icons_dir: Option<PathBuf>) -> Self {
        Self {
            icons_dir,
            ..Self::default()
        }
    }

    pub fn with_font(mut self, font_path: Option<PathBuf>) -> Self {
        self.font_path = font_path;
        self
    }
}

/// First well-known system font present on this machine.
pub fn find_system_font() -> Option<PathBuf> {
    SYSTEM_FONTS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Scores in canonical goal order; goals absent from `predictions` are 0.
///
/// Negative and non-finite scores are drawn as 0.
pub fn goal_values(predictions: &[Prediction]) -> Result<[f32; GOAL_COUNT], ChartError> {
    let mut values = [0.0f32; GOAL_COUNT];
    for p in predictions {
        let goal = p.goal()?;
        let score = if p.prediction.is_finite() {
            p.prediction.max(0.0)
        } else {
            0.0
        };
        values[goal.number as usize - 1] = score;
    }
    Ok(values)
}

/// Render the predictions as a PNG bar chart.
pub fn render_png(
    predictions: &[Prediction],
    options: &ChartOptions,
) -> Result<Vec<u8>, ChartError> {
    let (width, height) = (options.width, options.height);
    let min_width = 2 * MARGIN + Y_LABEL_AREA + 4 * GOAL_COUNT as i32;
    let min_height = TITLE_HEIGHT + ICON_AREA + 2 * MARGIN + 40;
    if (width as i64) < min_width as i64 || (height as i64) < min_height as i64 {
        return Err(ChartError::TooSmall { width, height });
    }

    let values = goal_values(predictions)?;
    let family = options.font_path.as_deref().map(font_family).transpose()?;

    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        draw_chart(&root, &values, options, family.as_deref())?;
        root.present()?;
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(&pixels, width, height, ExtendedColorType::Rgb8)?;
    debug!(bytes = png.len(), with_text = family.is_some(), "rendered SDG chart");
    Ok(png)
}

fn draw_chart(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    values: &[f32; GOAL_COUNT],
    options: &ChartOptions,
    family: Option<&str>,
) -> Result<(), ChartError> {
    root.fill(&WHITE)?;
    let (title_area, body) = root.split_vertically(TITLE_HEIGHT);

    if let Some(family) = family {
        let style = TextStyle::from((family, 26).into_font())
            .pos(Pos::new(HPos::Center, VPos::Center));
        let (w, h) = title_area.dim_in_pixel();
        title_area.draw_text(CHART_TITLE, &style, (w as i32 / 2, h as i32 / 2))?;
    }

    let y_max = values.iter().copied().fold(1.0f32, f32::max) as f64;
    let mut chart = ChartBuilder::on(&body)
        .margin(MARGIN)
        .x_label_area_size(ICON_AREA)
        .y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d(0f64..GOAL_COUNT as f64, 0f64..y_max)?;

    if let Some(family) = family {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_| String::new())
            .y_labels(Y_TICKS + 1)
            .y_label_formatter(&|v| format!("{v:.1}"))
            .y_desc("Prediction Score")
            .label_style((family, 14).into_font())
            .axis_desc_style((family, 16).into_font())
            .draw()?;
    }

    chart.draw_series(
        values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0.0)
            .map(|(i, &v)| {
                let (r, g, b) = GOALS[i].rgb();
                let x0 = i as f64 + (1.0 - BAR_WIDTH) / 2.0;
                Rectangle::new(
                    [(x0, 0.0), (x0 + BAR_WIDTH, v as f64)],
                    RGBColor(r, g, b).mix(BAR_OPACITY).filled(),
                )
            }),
    )?;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, 0.0), (GOAL_COUNT as f64, 0.0)],
        BLACK.stroke_width(1),
    )))?;

    if let Some(family) = family {
        let value_style =
            TextStyle::from((family, 13).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
            Text::new(
                format!("{v:.2}"),
                (i as f64 + 0.5, v as f64),
                value_style.clone(),
            )
        }))?;
    }

    // Icons sit in pixel space under the x-axis, one per slot.
    let label_style = family
        .map(|f| TextStyle::from((f, 14).into_font()).pos(Pos::new(HPos::Center, VPos::Top)));
    for (i, goal) in GOALS.iter().enumerate() {
        let (left, baseline) = chart.backend_coord(&(i as f64 + (1.0 - BAR_WIDTH) / 2.0, 0.0));
        let (right, _) = chart.backend_coord(&(i as f64 + (1.0 + BAR_WIDTH) / 2.0, 0.0));
        let size = (right - left).clamp(1, ICON_AREA - 2 * ICON_GAP) as u32;
        let centre = (left + right) / 2;
        let top = baseline + ICON_GAP;

        let icon = options
            .icons_dir
            .as_deref()
            .and_then(|dir| load_icon(dir, goal, size));
        match (icon, &label_style) {
            (Some(pixels), _) => blit(root, &pixels, size, (centre - size as i32 / 2, top))?,
            (None, Some(style)) => {
                root.draw_text(&format!("SDG {}", goal.number), style, (centre, top))?
            }
            (None, None) => {}
        }
    }

    Ok(())
}

/// Copy a square RGB buffer onto the canvas with its top-left corner at `origin`.
fn blit(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    pixels: &[u8],
    size: u32,
    origin: (i32, i32),
) -> Result<(), ChartError> {
    for (i, rgb) in pixels.chunks_exact(3).enumerate() {
        let (x, y) = ((i as u32 % size) as i32, (i as u32 / size) as i32);
        root.draw_pixel((origin.0 + x, origin.1 + y), &RGBColor(rgb[0], rgb[1], rgb[2]))?;
    }
    Ok(())
}

/// Icon resized to `size`×`size` RGB pixels, or `None` (with a warning) if unreadable.
fn load_icon(dir: &Path, goal: &Goal, size: u32) -> Option<Vec<u8>> {
    let path = dir.join(goal.icon_file_name());
    match image::open(&path) {
        Ok(img) => Some(
            img.resize_exact(size, size, FilterType::Triangle)
                .to_rgb8()
                .into_raw(),
        ),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load SDG icon");
            None
        }
    }
}

/// Register the font at `path` with plotters once and return its family name.
fn font_family(path: &Path) -> Result<String, ChartError> {
    let font_error = |message: String| ChartError::Font {
        path: path.to_path_buf(),
        message,
    };

    let mut families = FONT_FAMILIES
        .lock()
        .map_err(|_| font_error("font registry lock poisoned".into()))?;
    if let Some(family) = families.get(path) {
        return Ok(family.clone());
    }

    let bytes = std::fs::read(path).map_err(|e| font_error(e.to_string()))?;
    let family = format!("sdg-chart-{}", families.len());
    // plotters keeps registered fonts for the life of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(&family, FontStyle::Normal, bytes)
        .map_err(|_| font_error("not a TrueType/OpenType font".into()))?;

    info!(path = %path.display(), %family, "registered chart font");
    families.insert(path.to_path_buf(), family.clone());
    Ok(family)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use sdg_core::CoreError;

    const BLUE: [u8; 3] = [0, 0, 255];

    fn predictions(scores: &[(u8, f32)]) -> Vec<Prediction> {
        scores
            .iter()
            .map(|&(n, s)| Prediction::new(Goal::from_number(n).unwrap(), s))
            .collect()
    }

    fn small() -> ChartOptions {
        ChartOptions {
            width: 680,
            height: 420,
            ..ChartOptions::default()
        }
    }

    fn decode(png: &[u8]) -> RgbImage {
        image::load_from_memory(png).unwrap().to_rgb8()
    }

    /// Goal colour as drawn: blended over the white background.
    fn bar_colour(number: u8) -> [u8; 3] {
        let (r, g, b) = Goal::from_number(number).unwrap().rgb();
        [r, g, b].map(|c| (c as f64 * BAR_OPACITY + 255.0 * (1.0 - BAR_OPACITY)).round() as u8)
    }

    fn pixels_near(img: &RgbImage, target: [u8; 3], tolerance: u8) -> Vec<(u32, u32)> {
        img.enumerate_pixels()
            .filter(|(_, _, p)| {
                p.0.iter()
                    .zip(target)
                    .all(|(&a, b)| a.abs_diff(b) <= tolerance)
            })
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    fn mean_x(pixels: &[(u32, u32)]) -> f64 {
        pixels.iter().map(|&(x, _)| x as f64).sum::<f64>() / pixels.len() as f64
    }

    #[test]
    fn values_follow_canonical_order() {
        // Ranked output (descending by score) still lands on goal slots.
        let values = goal_values(&predictions(&[(7, 0.9), (13, 0.4), (1, 0.1)])).unwrap();
        assert_eq!(values[6], 0.9);
        assert_eq!(values[12], 0.4);
        assert_eq!(values[0], 0.1);
        assert_eq!(values[1], 0.0);
    }

    #[test]
    fn unknown_goal_is_rejected() {
        let mut preds = predictions(&[(1, 0.5)]);
        preds[0].sdg.code = "42".into();
        assert!(matches!(
            goal_values(&preds),
            Err(ChartError::Core(CoreError::UnknownGoal(_)))
        ));
    }

    #[test]
    fn renders_png_of_requested_size() {
        let png = render_png(&predictions(&[(7, 0.9)]), &small()).unwrap();
        assert!(png.starts_with(b"\x89PNG"));
        let img = decode(&png);
        assert_eq!(img.dimensions(), (680, 420));
    }

    #[test]
    fn bars_follow_goal_order_not_score_order() {
        let png = render_png(&predictions(&[(13, 0.9), (7, 0.4)]), &small()).unwrap();
        let img = decode(&png);

        let goal7 = pixels_near(&img, bar_colour(7), 4);
        let goal13 = pixels_near(&img, bar_colour(13), 4);
        assert!(!goal7.is_empty() && !goal13.is_empty());
        assert!(mean_x(&goal7) < mean_x(&goal13));
        assert!(goal13.len() > goal7.len());
        // Goals without a score get no bar.
        assert!(pixels_near(&img, bar_colour(1), 4).is_empty());
    }

    #[test]
    fn scores_above_one_rescale_axis() {
        let png = render_png(&predictions(&[(1, 2.0), (2, 1.0)]), &small()).unwrap();
        let img = decode(&png);
        let ratio = pixels_near(&img, bar_colour(1), 4).len() as f64
            / pixels_near(&img, bar_colour(2), 4).len() as f64;
        assert!((1.85..2.15).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn embeds_available_icons_under_their_bar() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(64, 64, Rgb(BLUE))
            .save(dir.path().join("E_SDG_icons-07.jpg"))
            .unwrap();

        let options = ChartOptions {
            icons_dir: Some(dir.path().to_path_buf()),
            ..small()
        };
        let img = decode(&render_png(&predictions(&[(7, 0.9)]), &options).unwrap());

        let icon = pixels_near(&img, BLUE, 24);
        let bar = pixels_near(&img, bar_colour(7), 4);
        assert!(!icon.is_empty() && !bar.is_empty());
        let bar_bottom = bar.iter().map(|&(_, y)| y).max().unwrap();
        assert!(icon.iter().all(|&(_, y)| y > bar_bottom));
        assert!((mean_x(&icon) - mean_x(&bar)).abs() < 5.0);
    }

    #[test]
    fn missing_icons_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("E_SDG_icons-03.jpg"), b"not a jpeg").unwrap();

        let goal = Goal::from_number(3).unwrap();
        assert!(load_icon(dir.path(), goal, 32).is_none());
        assert!(load_icon(dir.path(), Goal::from_number(4).unwrap(), 32).is_none());

        let options = ChartOptions {
            icons_dir: Some(dir.path().to_path_buf()),
            ..small()
        };
        let img = decode(&render_png(&predictions(&[(3, 0.5)]), &options).unwrap());
        assert!(pixels_near(&img, BLUE, 24).is_empty());
    }

    #[test]
    fn loaded_icon_has_requested_size() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(80, 80, Rgb(BLUE))
            .save(dir.path().join("E_SDG_icons-12.jpg"))
            .unwrap();
        let pixels = load_icon(dir.path(), Goal::from_number(12).unwrap(), 30).unwrap();
        assert_eq!(pixels.len(), 30 * 30 * 3);
    }

    #[test]
    fn tiny_canvas_is_rejected() {
        let options = ChartOptions {
            width: 50,
            height: 50,
            ..ChartOptions::default()
        };
        assert!(matches!(
            render_png(&[], &options),
            Err(ChartError::TooSmall { .. })
        ));
    }

    #[test]
    fn unreadable_font_is_reported() {
        let options = small().with_font(Some(PathBuf::from("/nonexistent/font.ttf")));
        assert!(matches!(
            render_png(&[], &options),
            Err(ChartError::Font { .. })
        ));
    }

    #[test]
    fn draws_title_with_system_font() {
        let Some(font) = find_system_font() else {
            return;
        };
        let options = small().with_font(Some(font));
        let img = decode(&render_png(&predictions(&[(7, 0.9)]), &options).unwrap());
        let dark_in_title = img
            .enumerate_pixels()
            .filter(|(_, y, p)| (*y as i32) < TITLE_HEIGHT && p.0.iter().all(|&c| c < 96))
            .count();
        assert!(dark_in_title > 0);
    }
}
