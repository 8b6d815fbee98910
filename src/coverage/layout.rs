//! Geometry for coverage area charts

/// Total chart height including margins
pub const CHART_HEIGHT: f64 = 200.0;

/// References longer than this are drawn at one pixel per five bases
pub const COMPRESS_ABOVE: u64 = 800;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    /// Chart margins, widened on the left to make room for a y axis
    pub fn for_chart(show_y_axis: bool) -> Self {
        Self {
            top: 10.0,
            right: 10.0,
            bottom: 50.0,
            left: if show_y_axis { 45.0 } else { 15.0 },
        }
    }
}

/// Maps a numeric domain linearly onto a pixel range
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Project a domain value; a zero-width domain maps to the middle of the range
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;

        let t = if span == 0.0 { 0.5 } else { (value - d0) / span };
        r0 + t * (r1 - r0)
    }
}

/// Plot area of a coverage chart for a reference of `length` bases
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    pub margin: Margin,
    /// Plot width, margins excluded
    pub width: f64,
    /// Plot height, margins excluded
    pub height: f64,
    pub length: u64,
}

impl ChartLayout {
    /// Size a chart to fit its reference and at least `min_width` of container
    pub fn new(length: u64, min_width: f64, show_y_axis: bool) -> Self {
        let margin = Margin::for_chart(show_y_axis);

        let mut width = if length > COMPRESS_ABOVE {
            length as f64 / 5.0
        } else {
            length as f64
        };

        if width < min_width {
            width = min_width;
        }

        Self {
            margin,
            width: width - (margin.left + margin.right),
            height: CHART_HEIGHT - margin.top - margin.bottom,
            length,
        }
    }

    pub fn outer_width(&self) -> f64 {
        self.width + self.margin.left + self.margin.right
    }

    pub fn outer_height(&self) -> f64 {
        self.height + self.margin.top + self.margin.bottom
    }

    /// Base position to horizontal pixel
    pub fn x_scale(&self) -> LinearScale {
        LinearScale::new((0.0, self.length as f64), (0.0, self.width))
    }

    /// Depth to vertical pixel, zero at the bottom
    pub fn y_scale(&self, y_max: f64) -> LinearScale {
        LinearScale::new((0.0, y_max), (self.height, 0.0))
    }

    /// Pixel coordinates for a chart series
    pub fn project(&self, series: &[(u64, f64)], y_max: f64) -> Vec<(f64, f64)> {
        let x = self.x_scale();
        let y = self.y_scale(y_max);

        series
            .iter()
            .map(|&(position, value)| (x.map(position as f64), y.map(value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_reference_uses_container_width() {
        let layout = ChartLayout::new(300, 600.0, true);

        assert_eq!(layout.height, 140.0);
        assert_eq!(layout.width, 600.0 - 55.0);
        assert_eq!(layout.outer_width(), 600.0);
        assert_eq!(layout.outer_height(), 200.0);
    }

    #[test]
    fn test_long_reference_is_compressed() {
        let layout = ChartLayout::new(10_000, 500.0, false);

        assert_eq!(layout.width, 2000.0 - 25.0);
    }

    #[test]
    fn test_scales() {
        let layout = ChartLayout::new(1000, 100.0, false);
        let x = layout.x_scale();
        let y = layout.y_scale(50.0);

        assert_eq!(x.map(0.0), 0.0);
        assert_eq!(x.map(1000.0), layout.width);
        assert_eq!(y.map(0.0), layout.height);
        assert_eq!(y.map(50.0), 0.0);
        assert_eq!(y.map(25.0), layout.height / 2.0);
    }

    #[test]
    fn test_degenerate_domain() {
        let scale = LinearScale::new((0.0, 0.0), (140.0, 0.0));
        assert_eq!(scale.map(3.0), 70.0);
    }

    #[test]
    fn test_project() {
        let layout = ChartLayout::new(100, 125.0, false);

        let pixels = layout.project(&[(0, 0.0), (100, 10.0)], 10.0);

        assert_eq!(pixels, vec![(0.0, 140.0), (100.0, 0.0)]);
    }
}
