use detaug_image::Image;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box with its class.
///
/// The box is stored as `[x1, y1, x2, y2]` in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// the box corners `[x1, y1, x2, y2]`.
    pub bbox: [f32; 4],
    /// the class identifier.
    pub class_id: u32,
}

impl Annotation {
    /// Create a new annotation from its corners and class.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, class_id: u32) -> Self {
        Self {
            bbox: [x1, y1, x2, y2],
            class_id,
        }
    }

    /// The width of the box.
    pub fn width(&self) -> f32 {
        self.bbox[2] - self.bbox[0]
    }

    /// The height of the box.
    pub fn height(&self) -> f32 {
        self.bbox[3] - self.bbox[1]
    }

    /// The area of the box.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Scale the box by `scale` and then shift it by `(padw, padh)`.
    pub fn scaled(&self, scale: f32, padw: f32, padh: f32) -> Self {
        let [x1, y1, x2, y2] = self.bbox;
        Self::new(
            scale * x1 + padw,
            scale * y1 + padh,
            scale * x2 + padw,
            scale * y2 + padh,
            self.class_id,
        )
    }

    /// Clamp the box to `[0, width] x [0, height]`.
    pub fn clipped(&self, width: f32, height: f32) -> Self {
        let [x1, y1, x2, y2] = self.bbox;
        Self::new(
            x1.clamp(0.0, width),
            y1.clamp(0.0, height),
            x2.clamp(0.0, width),
            y2.clamp(0.0, height),
            self.class_id,
        )
    }

    /// Mirror the box around the vertical axis of an image of the given width.
    pub fn hflipped(&self, width: f32) -> Self {
        let [x1, y1, x2, y2] = self.bbox;
        Self::new(width - x2, y1, width - x1, y2, self.class_id)
    }
}

/// An RGB image with its box annotations.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedImage {
    /// the image pixels.
    pub image: Image<u8, 3>,
    /// the boxes in image pixel coordinates.
    pub labels: Vec<Annotation>,
}

impl AnnotatedImage {
    /// Create a new annotated image.
    pub fn new(image: Image<u8, 3>, labels: Vec<Annotation>) -> Self {
        Self { image, labels }
    }
}

#[cfg(test)]
mod tests {
    use super::Annotation;

    #[test]
    fn annotation_geometry() {
        let a = Annotation::new(10.0, 20.0, 30.0, 60.0, 3);
        assert_eq!(a.width(), 20.0);
        assert_eq!(a.height(), 40.0);
        assert_eq!(a.area(), 800.0);
    }

    #[test]
    fn annotation_scaled_and_clipped() {
        let a = Annotation::new(10.0, 20.0, 30.0, 60.0, 1);
        let b = a.scaled(2.0, -25.0, 5.0);
        assert_eq!(b.bbox, [-5.0, 45.0, 35.0, 125.0]);
        assert_eq!(b.clipped(30.0, 100.0).bbox, [0.0, 45.0, 30.0, 100.0]);
        assert_eq!(b.class_id, 1);
    }

    #[test]
    fn annotation_hflipped() {
        let a = Annotation::new(10.0, 20.0, 30.0, 60.0, 0);
        assert_eq!(a.hflipped(100.0).bbox, [70.0, 20.0, 90.0, 60.0]);
    }

    #[test]
    fn annotation_serde() -> Result<(), serde_json::Error> {
        let a = Annotation::new(1.0, 2.0, 3.0, 4.0, 7);
        let json = serde_json::to_string(&a)?;
        assert_eq!(json, r#"{"bbox":[1.0,2.0,3.0,4.0],"class_id":7}"#);
        Ok(())
    }
}
