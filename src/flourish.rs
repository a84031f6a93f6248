//! Decorative motion for the hero: particle layers, scroll parallax,
//! pointer tilt and the loading overlay.

pub const LOADING_HOLD_MS: u32 = 1_500;
pub const LOADING_FADE_MS: u32 = 500;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleProfile {
    pub count: usize,
    pub class: &'static str,
    pub animation: &'static str,
    pub min_size: f64,
    pub size_spread: f64,
    pub min_duration_s: f64,
    pub duration_spread_s: f64,
    pub max_delay_s: f64,
    pub opacity: f64,
    pub glow: bool,
}

pub const FLOAT_PARTICLES: ParticleProfile = ParticleProfile {
    count: 20,
    class: "particle",
    animation: "floatParticle",
    min_size: 2.0,
    size_spread: 4.0,
    min_duration_s: 10.0,
    duration_spread_s: 20.0,
    max_delay_s: 0.0,
    opacity: 0.3,
    glow: false,
};

pub const TRAIL_PARTICLES: ParticleProfile = ParticleProfile {
    count: 30,
    class: "advanced-particle",
    animation: "matrix",
    min_size: 2.0,
    size_spread: 6.0,
    min_duration_s: 20.0,
    duration_spread_s: 30.0,
    max_delay_s: 5.0,
    opacity: 0.4,
    glow: true,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: u32,
    pub size: f64,
    pub x: f64,
    pub y: f64,
    pub duration_s: f64,
    pub delay_s: f64,
}

impl Particle {
    /// Lifetime after which the particle is removed from the layer.
    pub fn lifetime_ms(&self) -> u32 {
        ((self.duration_s + self.delay_s) * 1_000.0).round() as u32
    }

    pub fn style(&self, profile: &ParticleProfile) -> String {
        let mut style = format!(
            "position: absolute; width: {size:.2}px; height: {size:.2}px; \
             background: linear-gradient(45deg, #2563eb, #06b6d4); border-radius: 50%; \
             left: {x:.2}px; top: {y:.2}px; opacity: {opacity}; \
             animation: {animation} {duration:.2}s linear infinite;",
            size = self.size,
            x = self.x,
            y = self.y,
            opacity = profile.opacity,
            animation = profile.animation,
            duration = self.duration_s,
        );
        if self.delay_s > 0.0 {
            style.push_str(&format!(" animation-delay: {:.2}s;", self.delay_s));
        }
        if profile.glow {
            style.push_str(" box-shadow: 0 0 10px rgba(37, 99, 235, 0.5);");
        }
        style
    }
}

/// Places `profile.count` particles inside the viewport. `random` must
/// return values in `[0, 1)`.
pub fn scatter(
    profile: &ParticleProfile,
    viewport: (f64, f64),
    first_id: u32,
    random: &mut impl FnMut() -> f64,
) -> Vec<Particle> {
    (0..profile.count)
        .zip(first_id..)
        .map(|(_, id)| {
            let size = random() * profile.size_spread + profile.min_size;
            let x = random() * viewport.0;
            let y = random() * viewport.1;
            let duration_s = random() * profile.duration_spread_s + profile.min_duration_s;
            let delay_s = if profile.max_delay_s > 0.0 {
                random() * profile.max_delay_s
            } else {
                0.0
            };
            Particle {
                id,
                size,
                x,
                y,
                duration_s,
                delay_s,
            }
        })
        .collect()
}

pub fn shape_parallax(index: usize, scroll_y: f64) -> String {
    let speed = 0.3 + index as f64 * 0.05;
    let rotation = scroll_y * 0.1;
    format!(
        "transform: translateY({:.2}px) rotate({rotation:.2}deg);",
        scroll_y * speed
    )
}

pub fn chart_parallax(index: usize, scroll_y: f64) -> String {
    let speed = 0.2 + index as f64 * 0.03;
    format!("transform: translateY({:.2}px);", scroll_y * speed)
}

/// Pointer position relative to the viewport centre, each axis in `[-0.5, 0.5]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerRatio {
    pub x: f64,
    pub y: f64,
}

impl PointerRatio {
    pub fn from_client(client: (f64, f64), viewport: (f64, f64)) -> Self {
        let axis = |position: f64, extent: f64| {
            if extent > 0.0 {
                (position / extent).clamp(0.0, 1.0) - 0.5
            } else {
                0.0
            }
        };
        Self {
            x: axis(client.0, viewport.0),
            y: axis(client.1, viewport.1),
        }
    }
}

pub fn shape_tilt(index: usize, pointer: PointerRatio) -> String {
    let speed = (index as f64 + 1.0) * 0.1;
    format!(
        "transform: translate({:.2}px, {:.2}px) rotateX({:.2}deg) rotateY({:.2}deg);",
        pointer.x * speed * 50.0,
        pointer.y * speed * 50.0,
        pointer.y * 10.0,
        pointer.x * 10.0,
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadingPhase {
    Shown,
    Fading,
    Gone,
}

impl LoadingPhase {
    pub fn hold_ms(self) -> Option<u32> {
        match self {
            Self::Shown => Some(LOADING_HOLD_MS),
            Self::Fading => Some(LOADING_FADE_MS),
            Self::Gone => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Shown => Self::Fading,
            Self::Fading | Self::Gone => Self::Gone,
        }
    }

    pub fn opacity(self) -> &'static str {
        match self {
            Self::Shown => "1",
            Self::Fading | Self::Gone => "0",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(values: &[f64]) -> impl FnMut() -> f64 + '_ {
        let mut index = 0;
        move || {
            let value = values[index % values.len()];
            index += 1;
            value
        }
    }

    #[test]
    fn float_particles_stay_inside_profile_ranges() {
        let mut random = sequence(&[0.0, 0.5, 0.999]);
        let particles = scatter(&FLOAT_PARTICLES, (1280.0, 720.0), 7, &mut random);

        assert_eq!(particles.len(), 20);
        assert_eq!(particles[0].id, 7);
        assert_eq!(particles[19].id, 26);
        for particle in &particles {
            assert!((2.0..6.0).contains(&particle.size));
            assert!((0.0..1280.0).contains(&particle.x));
            assert!((0.0..720.0).contains(&particle.y));
            assert!((10.0..30.0).contains(&particle.duration_s));
            assert_eq!(particle.delay_s, 0.0);
        }
    }

    #[test]
    fn trail_particles_live_for_duration_plus_delay() {
        let mut random = sequence(&[0.5]);
        let particles = scatter(&TRAIL_PARTICLES, (1000.0, 500.0), 0, &mut random);
        let first = &particles[0];

        assert_eq!(first.size, 5.0);
        assert_eq!((first.x, first.y), (500.0, 250.0));
        assert_eq!(first.duration_s, 35.0);
        assert_eq!(first.delay_s, 2.5);
        assert_eq!(first.lifetime_ms(), 37_500);

        let style = first.style(&TRAIL_PARTICLES);
        assert!(style.contains("animation: matrix 35.00s linear infinite;"));
        assert!(style.contains("animation-delay: 2.50s;"));
        assert!(style.contains("box-shadow"));
    }

    #[test]
    fn parallax_speeds_grow_with_index() {
        assert_eq!(
            shape_parallax(0, 100.0),
            "transform: translateY(30.00px) rotate(10.00deg);"
        );
        assert_eq!(
            shape_parallax(2, 100.0),
            "transform: translateY(40.00px) rotate(10.00deg);"
        );
        assert_eq!(chart_parallax(1, 100.0), "transform: translateY(23.00px);");
    }

    #[test]
    fn tilt_follows_pointer_offset_from_centre() {
        let pointer = PointerRatio::from_client((1000.0, 250.0), (1000.0, 500.0));
        assert_eq!(pointer, PointerRatio { x: 0.5, y: 0.0 });

        assert_eq!(
            shape_tilt(1, pointer),
            "transform: translate(5.00px, 0.00px) rotateX(0.00deg) rotateY(5.00deg);"
        );
        assert_eq!(
            PointerRatio::from_client((10.0, 10.0), (0.0, 0.0)),
            PointerRatio { x: 0.0, y: 0.0 }
        );
    }

    #[test]
    fn loading_overlay_fades_then_disappears() {
        assert_eq!(LoadingPhase::Shown.hold_ms(), Some(1_500));
        assert_eq!(LoadingPhase::Shown.next(), LoadingPhase::Fading);
        assert_eq!(LoadingPhase::Fading.hold_ms(), Some(500));
        assert_eq!(LoadingPhase::Fading.next().hold_ms(), None);
        assert_eq!(LoadingPhase::Fading.opacity(), "0");
    }
}
