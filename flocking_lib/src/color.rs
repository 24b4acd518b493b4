use rand::Rng;
use serde::{Deserialize, Serialize};

/// A colour in hue/saturation/value form.
///
/// `hue` is in degrees `[0, 360)`, `saturation` and `value` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl Hsv {
    pub fn new(hue: f32, saturation: f32, value: f32) -> Self {
        Hsv {
            hue,
            saturation,
            value,
        }
    }

    /// Same saturation and value, different hue.
    pub fn with_hue(&self, hue: f32) -> Self {
        Hsv { hue, ..*self }
    }

    /// Converts to linear `[r, g, b]`, each component in `[0, 1]`.
    pub fn to_rgb(&self) -> [f32; 3] {
        let h = self.hue.rem_euclid(360.) / 60.;
        let c = self.value * self.saturation;
        let x = c * (1. - (h % 2. - 1.).abs());
        let m = self.value - c;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.),
            1 => (x, c, 0.),
            2 => (0., c, x),
            3 => (0., x, c),
            4 => (x, 0., c),
            _ => (c, 0., x),
        };

        [r + m, g + m, b + m]
    }

    pub fn from_rgb(rgb: [f32; 3]) -> Self {
        let [r, g, b] = rgb;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta <= 0. {
            0.
        } else if max == r {
            60. * ((g - b) / delta).rem_euclid(6.)
        } else if max == g {
            60. * ((b - r) / delta + 2.)
        } else {
            60. * ((r - g) / delta + 4.)
        };

        let saturation = if max <= 0. { 0. } else { delta / max };

        Hsv {
            hue,
            saturation,
            value: max,
        }
    }
}

/// Random hue in `[0, 360)` with the given saturation and value.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R, saturation: f32, value: f32) -> Hsv {
    Hsv::new(rng.gen_range(0.0..360.0), saturation, value)
}
