use image::RgbImage;

/// A point in pixel coordinates
pub type Point = (f64, f64);

/// Axis-aligned bounding box with a top-left origin.
///
/// Boxes are built fresh per detection per frame and never mutated after
/// construction; the builder-style helpers consume and return a new box.
#[derive(Debug, Clone, PartialEq)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    crop: Option<RgbImage>,
}

impl BBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            crop: None,
        }
    }

    /// Builds a box from two opposite corners given in any order
    pub fn from_corners(p0: Point, p1: Point) -> Self {
        let x = p0.0.min(p1.0);
        let y = p0.1.min(p1.1);
        Self::new(x, y, (p1.0 - p0.0).abs(), (p1.1 - p0.1).abs())
    }

    /// Area of the box, zero for degenerate boxes
    pub fn area(&self) -> f64 {
        (self.width * self.height).max(0.0)
    }

    /// Rounded corners `[(x1, y1), (x2, y2)]`
    pub fn points(&self) -> [(i64, i64); 2] {
        [
            (self.x.round() as i64, self.y.round() as i64),
            (
                (self.x + self.width).round() as i64,
                (self.y + self.height).round() as i64,
            ),
        ]
    }

    /// Corners without rounding
    pub fn corners(&self) -> [Point; 2] {
        [
            (self.x, self.y),
            (self.x + self.width, self.y + self.height),
        ]
    }

    pub fn center(&self) -> Point {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Intersection over union with another box.
    ///
    /// Returns 0.0 when the boxes do not overlap or the union is empty, so
    /// degenerate boxes never produce negative or NaN ratios.
    pub fn iou(&self, other: &BBox) -> f64 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        if x2 <= x1 || y2 <= y1 {
            return 0.0;
        }

        let intersection = (x2 - x1) * (y2 - y1);
        let union = self.area() + other.area() - intersection;

        if union > 0.0 { intersection / union } else { 0.0 }
    }

    /// Clamps the box to the bounds of a `frame_width` x `frame_height` frame
    pub fn clamp_to(&self, frame_width: u32, frame_height: u32) -> Self {
        let max_x = frame_width as f64;
        let max_y = frame_height as f64;
        let x1 = self.x.clamp(0.0, max_x);
        let y1 = self.y.clamp(0.0, max_y);
        let x2 = (self.x + self.width).clamp(0.0, max_x);
        let y2 = (self.y + self.height).clamp(0.0, max_y);
        Self::new(x1, y1, (x2 - x1).max(0.0), (y2 - y1).max(0.0))
    }

    /// Cuts the region covered by `points` out of `image`.
    ///
    /// The box must already lie inside the image; see [`BBox::clamp_to`].
    pub fn cut(&self, image: &RgbImage) -> RgbImage {
        let [(x1, y1), (x2, y2)] = self.points();
        image::imageops::crop_imm(
            image,
            x1 as u32,
            y1 as u32,
            (x2 - x1).max(0) as u32,
            (y2 - y1).max(0) as u32,
        )
        .to_image()
    }

    /// Attaches an owned copy of the region this box covers in `frame`
    pub fn with_crop(mut self, frame: &RgbImage) -> Self {
        let clamped = self.clamp_to(frame.width(), frame.height());
        self.crop = Some(clamped.cut(frame));
        self
    }

    pub fn crop(&self) -> Option<&RgbImage> {
        self.crop.as_ref()
    }

    /// True when every coordinate is a finite number
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

impl AsRef<BBox> for BBox {
    fn as_ref(&self) -> &BBox {
        self
    }
}
