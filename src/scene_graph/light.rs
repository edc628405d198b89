use super::material::rgb_to_linear;

/// Omnidirectional light with a hard cutoff distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: [f32; 3],
    pub intensity: f32,
    /// Distance at which the contribution reaches zero
    pub range: f32,
}

impl PointLight {
    pub fn new(rgb: u32, intensity: f32, range: f32) -> Self {
        let [r, g, b, _] = rgb_to_linear(rgb);
        Self {
            color: [r, g, b],
            intensity,
            range,
        }
    }

    /// Inverse-square falloff windowed to zero at `range`
    pub fn attenuation(&self, distance: f32) -> f32 {
        if distance >= self.range {
            return 0.0;
        }
        let ratio = distance / self.range;
        let window = (1.0 - ratio.powi(4)).clamp(0.0, 1.0).powi(2);
        window / distance.max(0.01).powi(2)
    }
}

/// Uniform light added to every surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(rgb: u32, intensity: f32) -> Self {
        let [r, g, b, _] = rgb_to_linear(rgb);
        Self {
            color: [r, g, b],
            intensity,
        }
    }

    pub fn radiance(&self) -> [f32; 3] {
        self.color.map(|c| c * self.intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attenuation_reaches_zero_at_range() {
        let light = PointLight::new(0xffa500, 500.0, 80.0);
        assert_eq!(light.attenuation(80.0), 0.0);
        assert_eq!(light.attenuation(120.0), 0.0);
        assert!(light.attenuation(10.0) > light.attenuation(40.0));
    }

    #[test]
    fn ambient_radiance_scales_color() {
        let ambient = AmbientLight::new(0xffffff, 0.1);
        let radiance = ambient.radiance();
        assert!((radiance[0] - 0.1).abs() < 1e-5);
    }
}
